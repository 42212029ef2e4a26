//! A small stderr spinner shown while the engine is working.

use std::io::Write;
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Braille spinner frames.
const FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Frame interval.
const INTERVAL: Duration = Duration::from_millis(80);

/// A terminal spinner that runs in a background task and shows how long
/// it has been spinning.
///
/// Writes to stderr so the chat transcript on stdout stays clean.
pub struct Spinner {
    handle: JoinHandle<()>,
    cancel: watch::Sender<bool>,
}

impl Spinner {
    /// Start a spinner labelled `message` (e.g. `"thinking"`).
    pub fn start(message: &str) -> Self {
        let (cancel_tx, mut cancel_rx) = watch::channel(false);
        let message = message.to_string();

        let handle = tokio::spawn(async move {
            let started = Instant::now();
            let mut i = 0;
            loop {
                eprint!("\x1b[2K\r{}", frame_line(i, &message, started.elapsed()));
                let _ = std::io::stderr().flush();

                tokio::select! {
                    _ = tokio::time::sleep(INTERVAL) => {}
                    _ = cancel_rx.changed() => break,
                }
                i += 1;
            }
            eprint!("\x1b[2K\r");
            let _ = std::io::stderr().flush();
        });

        Self {
            handle,
            cancel: cancel_tx,
        }
    }

    /// Stop the spinner and clear its line.
    pub async fn stop(self) {
        let _ = self.cancel.send(true);
        let _ = self.handle.await;
    }
}

/// One spinner line. Elapsed time shows up once a full second has passed.
fn frame_line(i: usize, message: &str, elapsed: Duration) -> String {
    let frame = FRAMES[i % FRAMES.len()];
    match elapsed.as_secs() {
        0 => format!("{frame} {message}"),
        secs => format!("{frame} {message} ({secs}s)"),
    }
}
