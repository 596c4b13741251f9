// LogcatLens - app/feed.rs
//
// Live feed: moves lines from a device stream into a `LogSession`, one line
// fully processed before the next.
//
// Architecture:
//   - A `LineSource` yields raw lines. Blocking reads stay in the source;
//     `spawn_reader` moves them to a background thread and hands back the
//     channel end.
//   - `LiveFeed::pump` drains a source on the caller's thread, trimming
//     lines and skipping blank ones, and reports every outcome to a callback
//     before taking the next line.
//   - Shared `AtomicBool` flags pause (lines are dropped) and cancel (pump
//     returns) the feed from another thread.

use crate::app::session::{LineOutcome, LogSession};
use std::io::{self, BufRead};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::JoinHandle;

// =============================================================================
// Line sources
// =============================================================================

/// Anything that produces log lines one at a time.
pub trait LineSource {
    /// Next raw line, `None` at end of stream.
    fn next_line(&mut self) -> Option<io::Result<String>>;
}

/// Line source over a buffered reader (stdin, a pipe, a file).
pub struct ReaderSource<R> {
    reader: R,
}

impl<R: BufRead> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineSource for ReaderSource<R> {
    fn next_line(&mut self) -> Option<io::Result<String>> {
        let mut buf = Vec::new();
        match self.reader.read_until(b'\n', &mut buf) {
            Ok(0) => None,
            Ok(_) => Some(Ok(String::from_utf8_lossy(&buf).into_owned())),
            Err(e) => Some(Err(e)),
        }
    }
}

impl LineSource for mpsc::Receiver<String> {
    fn next_line(&mut self) -> Option<io::Result<String>> {
        self.recv().ok().map(Ok)
    }
}

/// Read `reader` on a background thread, sending each line down a channel.
///
/// The thread ends at end of stream, on a read error, or once the receiver
/// is dropped.
pub fn spawn_reader<R>(reader: R) -> (mpsc::Receiver<String>, JoinHandle<()>)
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    let handle = std::thread::spawn(move || {
        let mut source = ReaderSource::new(reader);
        while let Some(line) = source.next_line() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        tracing::debug!("Feed receiver dropped, stopping reader");
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Line source read failed");
                    break;
                }
            }
        }
    });
    (rx, handle)
}

// =============================================================================
// LiveFeed
// =============================================================================

/// Per-pump line counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct FeedStats {
    pub visible: usize,
    pub hidden: usize,
    pub rejected: usize,
    /// Lines dropped while paused.
    pub dropped: usize,
}

impl FeedStats {
    fn count(&mut self, outcome: LineOutcome) {
        match outcome {
            LineOutcome::Visible { .. } => self.visible += 1,
            LineOutcome::Hidden => self.hidden += 1,
            LineOutcome::Rejected => self.rejected += 1,
        }
    }
}

#[derive(Debug, Default)]
pub struct LiveFeed {
    paused: Arc<AtomicBool>,
    cancel: Arc<AtomicBool>,
}

impl LiveFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Relaxed)
    }

    pub fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::Relaxed);
        tracing::info!(paused, "Live feed pause changed");
    }

    /// Flip pause; returns the new state.
    pub fn toggle_pause(&self) -> bool {
        let paused = !self.paused.fetch_xor(true, Ordering::Relaxed);
        tracing::info!(paused, "Live feed pause changed");
        paused
    }

    /// Shared pause flag for another thread.
    pub fn pause_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.paused)
    }

    /// Shared cancel flag; setting it makes `pump` return before the next line.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Drain `source` into `session` until end of stream or cancel.
    ///
    /// Each line is trimmed; blank lines are skipped without a callback.
    /// `on_event` sees the session right after each line is processed.
    /// A read error stops the pump and is returned.
    pub fn pump<S, F>(
        &self,
        session: &mut LogSession,
        source: &mut S,
        mut on_event: F,
    ) -> io::Result<FeedStats>
    where
        S: LineSource + ?Sized,
        F: FnMut(&LogSession, LineOutcome),
    {
        let mut stats = FeedStats::default();

        while !self.cancel.load(Ordering::Relaxed) {
            let Some(line) = source.next_line() else {
                break;
            };
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if self.is_paused() {
                stats.dropped += 1;
                continue;
            }

            let outcome = session.ingest_line(line);
            stats.count(outcome);
            on_event(session, outcome);
        }

        tracing::info!(
            visible = stats.visible,
            hidden = stats.hidden,
            rejected = stats.rejected,
            dropped = stats.dropped,
            "Live feed ended"
        );
        Ok(stats)
    }
}
