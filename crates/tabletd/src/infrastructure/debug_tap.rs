//! Diagnostic report taps.
//!
//! A tap mirrors every report from one endpoint stream to a diagnostic
//! channel for external inspection, without disturbing the pipeline: the
//! tap is just another reader subscriber, so the pipeline keeps its place
//! in delivery order and channel failures never stall report handling.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tablet_core::Report;
use tracing::{info, warn};

use super::reader::{ReportReader, SubscriptionHandle};

/// Which endpoint stream a tap mirrors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapStream {
    /// The pen report stream.
    Tablet,
    /// The auxiliary (express-key) stream.
    Aux,
}

impl TapStream {
    pub fn as_str(&self) -> &'static str {
        match self {
            TapStream::Tablet => "tablet",
            TapStream::Aux => "aux",
        }
    }
}

/// Error type for diagnostic channel operations.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("channel I/O failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("report encoding failure: {0}")]
    Encode(#[from] bincode::Error),
}

/// A sink for mirrored reports.
pub trait DiagnosticChannel: Send {
    /// Writes one report to the channel.
    fn send(&mut self, report: &Report) -> Result<(), ChannelError>;
    /// Flushes and closes the channel.
    fn close(&mut self);
}

/// Creates diagnostic channels on demand, one per tap attachment.
pub trait DiagnosticChannelFactory: Send {
    fn open(&self, stream: TapStream) -> Result<Box<dyn DiagnosticChannel>, ChannelError>;
}

/// Attach/detach state for one endpoint's diagnostic tap.
pub struct DebugTap {
    stream: TapStream,
    active: Option<ActiveTap>,
}

struct ActiveTap {
    handle: SubscriptionHandle,
    channel: Arc<Mutex<Box<dyn DiagnosticChannel>>>,
}

impl DebugTap {
    pub fn new(stream: TapStream) -> Self {
        Self {
            stream,
            active: None,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.active.is_some()
    }

    /// Subscribes `channel` to `reader`.  Attaching while already attached
    /// is a no-op: the offered channel is closed and `false` is returned.
    pub fn attach(&mut self, reader: &ReportReader, mut channel: Box<dyn DiagnosticChannel>) -> bool {
        if self.active.is_some() {
            channel.close();
            return false;
        }

        let shared = Arc::new(Mutex::new(channel));
        let forward = Arc::clone(&shared);
        let stream = self.stream;
        let handle = reader.subscribe(Arc::new(move |report: &Report| {
            let mut channel = forward.lock().expect("lock poisoned");
            if let Err(e) = channel.send(report) {
                warn!(stream = stream.as_str(), error = %e, "diagnostic channel send failed");
            }
        }));

        info!(stream = self.stream.as_str(), "diagnostic tap attached");
        self.active = Some(ActiveTap {
            handle,
            channel: shared,
        });
        true
    }

    /// Removes the subscription and closes the channel.  Detaching while
    /// detached is a no-op and returns `false`.
    pub fn detach(&mut self, reader: &ReportReader) -> bool {
        let Some(active) = self.active.take() else {
            return false;
        };
        reader.unsubscribe(active.handle);
        active.channel.lock().expect("lock poisoned").close();
        info!(stream = self.stream.as_str(), "diagnostic tap detached");
        true
    }
}

/// A [`DiagnosticChannel`] writing length-prefixed `bincode` frames.
///
/// Each frame is a little-endian `u32` byte count followed by the encoded
/// [`Report`], so a consumer can re-synchronize on frame boundaries when
/// reading the stream back.
pub struct FramedWriterChannel<W: Write + Send> {
    writer: W,
}

impl<W: Write + Send> FramedWriterChannel<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write + Send> DiagnosticChannel for FramedWriterChannel<W> {
    fn send(&mut self, report: &Report) -> Result<(), ChannelError> {
        let bytes = bincode::serialize(report)?;
        let len = bytes.len() as u32;
        self.writer.write_all(&len.to_le_bytes())?;
        self.writer.write_all(&bytes)?;
        Ok(())
    }

    fn close(&mut self) {
        if let Err(e) = self.writer.flush() {
            warn!(error = %e, "failed to flush diagnostic channel on close");
        }
    }
}

/// Factory producing file-backed framed channels under one directory.
///
/// Each attachment truncates and rewrites `tap-<stream>.bin`.
pub struct FileChannelFactory {
    dir: PathBuf,
}

impl FileChannelFactory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DiagnosticChannelFactory for FileChannelFactory {
    fn open(&self, stream: TapStream) -> Result<Box<dyn DiagnosticChannel>, ChannelError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(format!("tap-{}.bin", stream.as_str()));
        let file = File::create(&path)?;
        info!(path = %path.display(), "opened diagnostic tap file");
        Ok(Box::new(FramedWriterChannel::new(BufWriter::new(file))))
    }
}
