//! Background jobs for the UI thread.
//!
//! Blocking backend calls run on a short-lived thread; the UI keeps the
//! returned receiver and polls it once per frame.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::thread;
use std::time::Duration;

/// Run `job` on a named worker thread and return a receiver for its result.
///
/// If the thread cannot be spawned the receiver reports `Disconnected`,
/// which callers treat like a failed job.
pub fn run_in_background<T, F>(name: &str, job: F) -> Receiver<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    let spawned = thread::Builder::new().name(name.to_string()).spawn(move || {
        let _ = tx.send(job());
    });
    if let Err(e) = spawned {
        tracing::error!("Failed to spawn worker thread '{}': {}", name, e);
    }
    rx
}

/// Result of checking a pending job
#[derive(Debug)]
pub enum JobPoll<T> {
    Ready(T),
    Pending,
    /// The worker died without sending a result
    Lost,
}

/// Non-blocking check of a job receiver
pub fn poll_job<T>(rx: &Receiver<T>) -> JobPoll<T> {
    match rx.try_recv() {
        Ok(value) => JobPoll::Ready(value),
        Err(TryRecvError::Empty) => JobPoll::Pending,
        Err(TryRecvError::Disconnected) => JobPoll::Lost,
    }
}

/// Blocking check of a job receiver, bounded by `timeout`
pub fn wait_job<T>(rx: &Receiver<T>, timeout: Duration) -> JobPoll<T> {
    match rx.recv_timeout(timeout) {
        Ok(value) => JobPoll::Ready(value),
        Err(RecvTimeoutError::Timeout) => JobPoll::Pending,
        Err(RecvTimeoutError::Disconnected) => JobPoll::Lost,
    }
}
