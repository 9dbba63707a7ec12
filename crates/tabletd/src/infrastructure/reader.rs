//! Report reader threads and their subscriber fan-out.
//!
//! One [`ReportReader`] owns one endpoint stream: a dedicated thread
//! consumes raw samples from the source channel, runs them through the
//! endpoint's [`ReportParser`], and hands every parsed report to the
//! current subscribers in subscription order, synchronously, on the
//! reader thread itself.  A slow subscriber therefore delays the stream
//! rather than dropping reports; samples queue in the source channel in
//! the meantime.
//!
//! Subscribers added while a report is being delivered see the *next*
//! report: delivery iterates over a snapshot of the subscriber list taken
//! when the report arrives.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    mpsc::Receiver,
    Arc, Mutex,
};
use std::thread::{self, JoinHandle};

use tablet_core::Report;
use tracing::{debug, trace};

use super::device::{DeviceError, RawSample, SampleSource};
use super::report_parser::ReportParser;

/// A callback receiving every parsed report from one endpoint.
pub type ReportSubscriber = Arc<dyn Fn(&Report) + Send + Sync>;

/// Identifies one subscription for later removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionHandle(u64);

/// Reads one endpoint stream and fans parsed reports out to subscribers.
pub struct ReportReader {
    subscribers: Arc<Mutex<Vec<(u64, ReportSubscriber)>>>,
    next_id: AtomicU64,
    source: Box<dyn SampleSource>,
    thread: Mutex<Option<JoinHandle<()>>>,
}

impl ReportReader {
    /// Starts the source and spawns the reader thread.
    ///
    /// The thread runs until the source channel closes, which happens when
    /// [`ReportReader::stop`] stops the source (or the source fails on its
    /// own).
    pub fn start(
        source: Box<dyn SampleSource>,
        parser: Arc<dyn ReportParser>,
        label: &str,
    ) -> Result<Arc<Self>, DeviceError> {
        let receiver = source.start()?;
        let subscribers: Arc<Mutex<Vec<(u64, ReportSubscriber)>>> =
            Arc::new(Mutex::new(Vec::new()));

        let thread_subscribers = Arc::clone(&subscribers);
        let thread_label = label.to_string();
        let handle = thread::Builder::new()
            .name(format!("reader-{label}"))
            .spawn(move || {
                run_loop(receiver, parser, thread_subscribers, &thread_label);
            })
            .map_err(|e| DeviceError::Transport(format!("failed to spawn reader thread: {e}")))?;

        Ok(Arc::new(Self {
            subscribers,
            next_id: AtomicU64::new(1),
            source,
            thread: Mutex::new(Some(handle)),
        }))
    }

    /// Registers a subscriber and returns a handle for removal.
    pub fn subscribe(&self, subscriber: ReportSubscriber) -> SubscriptionHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.subscribers
            .lock()
            .expect("lock poisoned")
            .push((id, subscriber));
        SubscriptionHandle(id)
    }

    /// Removes a subscription.  Returns `false` when the handle was
    /// already removed (or never belonged to this reader).
    pub fn unsubscribe(&self, handle: SubscriptionHandle) -> bool {
        let mut subscribers = self.subscribers.lock().expect("lock poisoned");
        let before = subscribers.len();
        subscribers.retain(|(id, _)| *id != handle.0);
        subscribers.len() != before
    }

    /// Number of active subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().expect("lock poisoned").len()
    }

    /// Stops the source, joins the reader thread, and drops all
    /// subscriptions.  Safe to call more than once.
    pub fn stop(&self) {
        self.source.stop();
        if let Some(handle) = self.thread.lock().expect("lock poisoned").take() {
            if handle.join().is_err() {
                debug!("reader thread panicked before join");
            }
        }
        self.subscribers.lock().expect("lock poisoned").clear();
    }
}

impl Drop for ReportReader {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_loop(
    receiver: Receiver<RawSample>,
    parser: Arc<dyn ReportParser>,
    subscribers: Arc<Mutex<Vec<(u64, ReportSubscriber)>>>,
    label: &str,
) {
    while let Ok(sample) = receiver.recv() {
        let Some(report) = parser.parse(&sample) else {
            continue;
        };
        trace!(
            stream = label,
            timestamp_us = report.timestamp_us,
            "report parsed"
        );

        // Snapshot the list so delivery never holds the lock; additions
        // made during delivery take effect from the next report.
        let snapshot: Vec<ReportSubscriber> = subscribers
            .lock()
            .expect("lock poisoned")
            .iter()
            .map(|(_, s)| Arc::clone(s))
            .collect();
        for subscriber in snapshot {
            subscriber(&report);
        }
    }
    debug!(stream = label, "sample channel closed, reader thread exiting");
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::time::Duration;

    use super::*;
    use crate::infrastructure::device::mock::MockSampleSource;
    use crate::infrastructure::report_parser::StructuredReportParser;
    use tablet_core::TabletDescriptor;

    fn descriptor() -> TabletDescriptor {
        TabletDescriptor {
            name: "Test Tablet S".to_string(),
            vendor_id: 0x056A,
            product_id: 0x030E,
            width: 152.0,
            height: 95.0,
            max_x: 15200,
            max_y: 9500,
            max_pressure: 2047,
            pen_buttons: 2,
            aux_buttons: 0,
            report_id: 0x01,
            aux_report_id: 0x02,
        }
    }

    fn start_reader(source: &MockSampleSource) -> Arc<ReportReader> {
        let parser = Arc::new(StructuredReportParser::new(&descriptor()));
        ReportReader::start(Box::new(source.clone()), parser, "tablet")
            .expect("reader should start")
    }

    #[test]
    fn test_subscriber_receives_parsed_reports() {
        // Arrange
        let source = MockSampleSource::new();
        let reader = start_reader(&source);
        let (tx, rx) = mpsc::channel();
        reader.subscribe(Arc::new(move |report: &Report| {
            tx.send(*report).expect("test channel should be open");
        }));

        // Act
        source.inject_pen(0x01, 10, 7600, 4750, 512, 0);

        // Assert
        let report = rx
            .recv_timeout(Duration::from_secs(1))
            .expect("report should arrive");
        assert_eq!(report.x, 7600.0);
        assert_eq!(report.pressure, 512);

        reader.stop();
    }

    #[test]
    fn test_reports_arrive_in_injection_order() {
        let source = MockSampleSource::new();
        let reader = start_reader(&source);
        let (tx, rx) = mpsc::channel();
        reader.subscribe(Arc::new(move |report: &Report| {
            tx.send(report.timestamp_us).expect("test channel should be open");
        }));

        for t in 1..=5u64 {
            source.inject_pen(0x01, t, 0, 0, 0, 0);
        }

        let received: Vec<u64> = (0..5)
            .map(|_| rx.recv_timeout(Duration::from_secs(1)).unwrap())
            .collect();
        assert_eq!(received, vec![1, 2, 3, 4, 5]);

        reader.stop();
    }

    #[test]
    fn test_unparseable_samples_are_skipped() {
        let source = MockSampleSource::new();
        let reader = start_reader(&source);
        let (tx, rx) = mpsc::channel();
        reader.subscribe(Arc::new(move |report: &Report| {
            tx.send(report.timestamp_us).expect("test channel should be open");
        }));

        // Foreign ID, then short sample, then a valid one
        source.inject_pen(0x7F, 1, 0, 0, 0, 0);
        source.inject(crate::infrastructure::device::RawSample {
            timestamp_us: 2,
            data: vec![0x01],
        });
        source.inject_pen(0x01, 3, 0, 0, 0, 0);

        assert_eq!(rx.recv_timeout(Duration::from_secs(1)).unwrap(), 3);

        reader.stop();
    }

    #[test]
    fn test_unsubscribed_callback_no_longer_fires() {
        let source = MockSampleSource::new();
        let reader = start_reader(&source);
        let (tx, rx) = mpsc::channel();
        let handle = reader.subscribe(Arc::new(move |report: &Report| {
            tx.send(report.timestamp_us).expect("test channel should be open");
        }));

        source.inject_pen(0x01, 1, 0, 0, 0, 0);
        assert_eq!(rx.recv_timeout(Duration::from_secs(1)).unwrap(), 1);

        assert!(reader.unsubscribe(handle));
        assert!(!reader.unsubscribe(handle), "second removal should report false");

        source.inject_pen(0x01, 2, 0, 0, 0, 0);
        assert!(
            rx.recv_timeout(Duration::from_millis(100)).is_err(),
            "removed subscriber should not receive further reports"
        );

        reader.stop();
    }

    #[test]
    fn test_stop_clears_subscriptions_and_ends_thread() {
        let source = MockSampleSource::new();
        let reader = start_reader(&source);
        reader.subscribe(Arc::new(|_report: &Report| {}));
        assert_eq!(reader.subscriber_count(), 1);

        reader.stop();

        assert_eq!(reader.subscriber_count(), 0);
        assert!(!source.is_started(), "source should be stopped");
        // Idempotent
        reader.stop();
    }
}
