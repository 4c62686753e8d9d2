use std::collections::BTreeMap;
use std::sync::Arc;

pub const TRACE_ID_KEY: &str = "trace_id";

/// 沿调用链传递的不可变 key/value 上下文。
///
/// clone 共享同一份数据；`with_value` 复制出新实例，交给其他任务的 context 不会被修改。
#[derive(Clone, Debug, Default)]
pub struct Context {
    values: Arc<BTreeMap<String, String>>,
}

impl Context {
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_value<K: Into<String>, V: Into<String>>(&self, key: K, value: V) -> Self {
        let mut values = (*self.values).clone();
        values.insert(key.into(), value.into());
        Self {
            values: Arc::new(values),
        }
    }

    pub fn with_trace_id<V: Into<String>>(&self, trace_id: V) -> Self {
        self.with_value(TRACE_ID_KEY, trace_id)
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn trace_id(&self) -> Option<&str> {
        self.value(TRACE_ID_KEY)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 两者是否为同一个 context 实例
    pub fn ptr_eq(a: &Context, b: &Context) -> bool {
        Arc::ptr_eq(&a.values, &b.values)
    }
}
