#[cfg(test)]
mod tests {
    use crate::{
        Context, LatencyError, LatencyTracker, default_tracker, guard, install_default, log_fn,
        track,
    };
    use chrono::{TimeDelta, Utc};
    use std::time::Duration;
    use tokio::sync::mpsc::unbounded_channel;
    use tokio::time::timeout;

    #[test]
    fn test_default_tracker_is_shared() {
        let a = default_tracker() as *const LatencyTracker;
        let b = default_tracker() as *const LatencyTracker;
        assert_eq!(a, b);
    }

    #[test]
    fn test_install_after_first_use_fails() {
        let _ = default_tracker();
        let result = install_default(LatencyTracker::new());
        assert!(matches!(result, Err(LatencyError::AlreadyInitialized)));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_free_track_with_logger() {
        let (tx, mut rx) = unbounded_channel();
        let logger = log_fn(move |ctx, args| {
            let _ = tx.send((ctx.clone(), args.to_string()));
        });

        let start = Utc::now() - TimeDelta::milliseconds(150);
        let ctx = Context::background().with_trace_id("trace-1");
        track(&ctx, start, "fetchUser", Some(logger));

        let (logged_ctx, line) = timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(line.starts_with("[Latency] Name=fetchUser, Duration="));
        assert!(line.ends_with("Status=completed"));
        // 默认 enhancer 丢弃调用方 context
        assert_eq!(logged_ctx.trace_id(), None);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_free_guard_with_logger() {
        let (tx, mut rx) = unbounded_channel();
        {
            let _guard = guard(&Context::background(), "global-scope").with_logger(log_fn(
                move |_, args| {
                    let _ = tx.send(args.to_string());
                },
            ));
        }
        let line = timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(line.contains("Name=global-scope"));
    }
}
