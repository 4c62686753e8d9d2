use chrono::{TimeDelta, Utc};
use latency::{Context, LatencyError, LatencyTracker, default_tracker, install_default, track};
use std::sync::mpsc;
use std::time::Duration;

// 独立的测试进程，全局 tracker 尚未初始化
#[test]
fn test_install_default_then_track() {
    let (tx, rx) = mpsc::channel();
    let tracker = LatencyTracker::builder()
        .logger(move |ctx, args| {
            let _ = tx.send((ctx.trace_id().map(str::to_string), args.to_string()));
        })
        .enhancer(latency::keep_context())
        .build();

    install_default(tracker).unwrap();
    assert!(matches!(
        install_default(LatencyTracker::new()),
        Err(LatencyError::AlreadyInitialized)
    ));

    let ctx = Context::background().with_trace_id("trace-42");
    track(&ctx, Utc::now() - TimeDelta::milliseconds(5), "installed", None);

    let (trace_id, line) = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(trace_id.as_deref(), Some("trace-42"));
    assert!(line.starts_with("[Latency] Name=installed, Duration="));
    assert!(line.ends_with("Status=completed"));

    let _ = default_tracker();
}
