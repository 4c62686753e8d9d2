use chrono::{DateTime, TimeDelta, Utc};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

// 有符号耗时，start 在未来时为负数，不做截断
pub fn elapsed_since(start: DateTime<Utc>) -> TimeDelta {
    Utc::now().signed_duration_since(start)
}
