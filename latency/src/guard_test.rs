#[cfg(test)]
mod tests {
    use crate::{Context, LatencyTracker, log_fn};
    use chrono::Utc;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::mpsc::unbounded_channel;
    use tokio::time::{sleep, timeout};

    #[tokio::test(flavor = "multi_thread")]
    async fn test_guard_emits_on_drop() {
        let (tx, mut rx) = unbounded_channel();
        let tracker = LatencyTracker::builder()
            .logger(move |_, args| {
                let _ = tx.send(args.to_string());
            })
            .build();

        {
            let guard = tracker.guard(&Context::background(), "scoped");
            assert_eq!(guard.name(), "scoped");
            assert!(guard.start() <= Utc::now());
            sleep(Duration::from_millis(20)).await;
            // 作用域内不应有输出
            assert!(rx.try_recv().is_err());
        }

        let line = timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(line.starts_with("[Latency] Name=scoped, Duration="));
        assert!(line.ends_with("Status=completed"));
        assert!(!line.contains("Duration=-"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_guard_with_logger_override() {
        let (configured_tx, mut configured_rx) = unbounded_channel::<String>();
        let (tx, mut rx) = unbounded_channel();
        let tracker = LatencyTracker::builder()
            .logger(move |_, args| {
                let _ = configured_tx.send(args.to_string());
            })
            .build();

        drop(
            tracker
                .guard(&Context::background(), "override")
                .with_logger(log_fn(move |_, args| {
                    let _ = tx.send(args.to_string());
                })),
        );

        let line = timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(line.contains("Name=override"));
        assert!(!matches!(
            timeout(Duration::from_millis(100), configured_rx.recv()).await,
            Ok(Some(_))
        ));
    }

    #[test]
    fn test_guard_dropped_with_runtime() {
        let (tx, rx) = std::sync::mpsc::channel();
        let tracker = Arc::new(
            LatencyTracker::builder()
                .logger(move |_, args| {
                    let _ = tx.send(args.to_string());
                })
                .build(),
        );
        let rt = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .unwrap();
        let (started_tx, started_rx) = std::sync::mpsc::channel();

        let in_flight = tracker.clone();
        rt.spawn(async move {
            let _guard = in_flight.guard(&Context::background(), "in-flight");
            let _ = started_tx.send(());
            std::future::pending::<()>().await;
        });
        started_rx.recv_timeout(Duration::from_secs(5)).unwrap();

        // runtime 关闭时任务被丢弃，guard 随之释放
        drop(rt);

        let line = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(line.starts_with("[Latency] Name=in-flight, Duration="));
        assert!(line.ends_with("Status=completed"));
    }
}
