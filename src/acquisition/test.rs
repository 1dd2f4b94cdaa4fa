use crate::acquisition::Acquisition;
use crate::fix::Fix;
use crate::live_view::ViewerSlot;
use crate::nmea::LineSource;
use crate::FixReceiver;
use crate::LineSender;

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::sleep;

const SENTENCE: &str = "$GNRMC,123519.00,A,4807.038,N,01131.000,E,0.013,43.7,230394,,,A*7D";
const STALE_SENTENCE: &str = "$GNRMC,123459.00,A,4806.000,N,01130.000,E,0.013,43.7,230394,,,A*7D";

struct Harness {
    line_tx: LineSender,
    viewer_rx: FixReceiver,
    ingest_rx: FixReceiver,
    acquisition: Acquisition,
}

fn harness(read_timeout: Duration) -> Harness {
    let (line_tx, line_rx) = mpsc::channel(20);
    let (viewer_tx, viewer_rx) = mpsc::channel(5);
    let (ingest_tx, ingest_rx) = mpsc::channel(5);

    let viewers = ViewerSlot::new();
    viewers.register(viewer_tx);

    let acquisition = Acquisition::new(
        LineSource::new(line_rx),
        viewers,
        ingest_tx,
        Duration::from_secs(20),
        read_timeout,
    );

    Harness {
        line_tx,
        viewer_rx,
        ingest_rx,
        acquisition,
    }
}

// Lines buffered before an attempt begins are stale; deliver after
// the attempt has started waiting.
fn send_soon(tx: LineSender, line: &str) {
    let line = line.to_string();

    tokio::spawn(async move {
        sleep(Duration::from_millis(5)).await;
        tx.send(line).await.unwrap();
    });
}

#[tokio::test]
async fn test_acquire_dispatches_to_both_sinks() {
    let mut h = harness(Duration::from_secs(1));

    send_soon(h.line_tx.clone(), SENTENCE);

    h.acquisition.acquire().await;

    let expected = Fix {
        latitude: 48.0 + 7.038 / 60.0,
        longitude: 11.0 + 31.0 / 60.0,
    };

    assert_eq!(expected, h.viewer_rx.try_recv().unwrap());
    assert_eq!(expected, h.ingest_rx.try_recv().unwrap());
    assert_eq!(Some(expected), h.acquisition.last_fix());
}

#[tokio::test]
async fn test_acquire_timeout_dispatches_nothing() {
    let mut h = harness(Duration::from_millis(20));

    h.acquisition.acquire().await;

    assert!(h.viewer_rx.try_recv().is_err());
    assert!(h.ingest_rx.try_recv().is_err());
    assert_eq!(None, h.acquisition.last_fix());
}

#[tokio::test]
async fn test_acquire_undecodable_line_dispatches_nothing() {
    let mut h = harness(Duration::from_secs(1));

    send_soon(h.line_tx.clone(), "$GPGSV,3,1,11,03,03,111,00*74");

    h.acquisition.acquire().await;

    assert!(h.viewer_rx.try_recv().is_err());
    assert!(h.ingest_rx.try_recv().is_err());
    assert_eq!(None, h.acquisition.last_fix());
}

#[tokio::test]
async fn test_acquire_without_viewer_still_ingests() {
    let (line_tx, line_rx) = mpsc::channel(20);
    let (ingest_tx, mut ingest_rx) = mpsc::channel(5);

    let mut acquisition = Acquisition::new(
        LineSource::new(line_rx),
        ViewerSlot::new(),
        ingest_tx,
        Duration::from_secs(20),
        Duration::from_secs(1),
    );

    send_soon(line_tx.clone(), SENTENCE);

    acquisition.acquire().await;

    assert!(ingest_rx.try_recv().is_ok());
    assert!(acquisition.last_fix().is_some());
}

#[tokio::test]
async fn test_acquire_with_departed_ingest_still_pushes() {
    let mut h = harness(Duration::from_secs(1));

    drop(h.ingest_rx);

    send_soon(h.line_tx.clone(), SENTENCE);

    h.acquisition.acquire().await;

    assert!(h.viewer_rx.try_recv().is_ok());
    assert!(h.acquisition.last_fix().is_some());
}

#[tokio::test]
async fn test_acquire_skips_stale_lines() {
    let mut h = harness(Duration::from_secs(1));

    h.line_tx.send(STALE_SENTENCE.to_string()).await.unwrap();
    send_soon(h.line_tx.clone(), SENTENCE);

    h.acquisition.acquire().await;

    let fix = h.viewer_rx.try_recv().unwrap();

    assert_approx_eq!(48.1173, fix.latitude, 0.0001);
    assert!(h.viewer_rx.try_recv().is_err());
}
