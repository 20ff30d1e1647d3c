use std::sync::mpsc;
use std::thread;

use super::{ApiError, ApiResult};

/// A request running on a worker thread.
///
/// Dropping a `Pending` abandons the result; the worker finishes its call and
/// its send fails silently.
#[derive(Debug)]
pub struct Pending<T> {
    rx: mpsc::Receiver<ApiResult<T>>,
}

/// Run `call` on a new worker thread
pub fn spawn<T, F>(call: F) -> Pending<T>
where
    T: Send + 'static,
    F: FnOnce() -> ApiResult<T> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(call());
    });
    Pending { rx }
}

impl<T> Pending<T> {
    /// Non-blocking check. `None` while the call is still running.
    pub fn try_take(&self) -> Option<ApiResult<T>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => Some(Err(worker_gone())),
        }
    }

    /// Block until the call finishes
    pub fn wait(self) -> ApiResult<T> {
        self.rx.recv().unwrap_or_else(|_| Err(worker_gone()))
    }
}

fn worker_gone() -> ApiError {
    ApiError::Network("request worker exited without a response".to_string())
}
