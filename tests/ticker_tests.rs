use hackertracker::ticker::spawn_ticker;
use std::time::Duration;

#[tokio::test]
async fn test_ticker_fires_immediately_and_repeats() {
    let (mut rx, handle) = spawn_ticker(Duration::from_millis(10));

    let first = rx.recv().await.expect("first tick");
    let second = rx.recv().await.expect("second tick");
    assert!(second >= first);

    drop(rx);
    // The task notices the closed channel on its next send.
    tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("ticker should stop")
        .expect("ticker task panicked");
}
