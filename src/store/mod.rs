//! View-state holders.
//!
//! Each holder owns the loading/error/data state of one feature and at most
//! one in-flight request. The TUI calls `poll` every tick; the CLI calls
//! `wait`. Nothing here is shared between holders.

pub mod boards;
pub mod tasks;

pub use boards::{BoardDetails, Boards, CreateTag, Session};
pub use tasks::{CreateTask, DeleteTask, EditTask, Tasks};

use log::warn;

use crate::api::request::{self, Pending};
use crate::api::ApiResult;

/// How a finished action went. `Failed` is the null signal; the message is in
/// the holder's `error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Succeeded(T),
    Failed,
}

impl<T> Outcome<T> {
    pub fn succeeded(self) -> Option<T> {
        match self {
            Outcome::Succeeded(v) => Some(v),
            Outcome::Failed => None,
        }
    }
}

/// Loading/error bookkeeping shared by every one-shot action holder
#[derive(Debug)]
pub struct Action<T> {
    pub loading: bool,
    pub error: String,
    pending: Option<Pending<T>>,
}

impl<T> Default for Action<T> {
    fn default() -> Self {
        Action {
            loading: false,
            error: String::new(),
            pending: None,
        }
    }
}

impl<T: Send + 'static> Action<T> {
    /// Start `call` unless a request is already in flight. Returns whether it started.
    pub fn start<F>(&mut self, call: F) -> bool
    where
        F: FnOnce() -> ApiResult<T> + Send + 'static,
    {
        if self.pending.is_some() {
            return false;
        }
        self.loading = true;
        self.pending = Some(request::spawn(call));
        true
    }

    /// Collect the result if the request has finished
    pub fn poll(&mut self) -> Option<Outcome<T>> {
        let result = self.pending.as_ref()?.try_take()?;
        self.pending = None;
        Some(self.settle(result))
    }

    /// Block until the in-flight request finishes. `None` if nothing is in flight.
    pub fn wait(&mut self) -> Option<Outcome<T>> {
        let pending = self.pending.take()?;
        Some(self.settle(pending.wait()))
    }

    pub fn in_flight(&self) -> bool {
        self.pending.is_some()
    }

    fn settle(&mut self, result: ApiResult<T>) -> Outcome<T> {
        self.loading = false;
        match result {
            Ok(value) => {
                self.error.clear();
                Outcome::Succeeded(value)
            }
            Err(e) => {
                warn!("request failed: {}", e);
                self.error = e.to_string();
                Outcome::Failed
            }
        }
    }
}
