//! User actions are modelled as events which are queued by the UI and applied
//! to the app once per frame. Applying an event is the error boundary of a
//! user action: it either finishes with an [`ActionOutcome`], is still busy
//! (e.g. waiting for a file dialog), or fails with a diagnostic message.

use std::fmt::Display;

/// Result of a finished user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Success(String),
    /// The action was handled, but degraded (e.g. unsupported file format).
    Warning(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventState {
    Finished(ActionOutcome),
    Busy,
}

impl EventState {
    pub fn success(msg: impl Into<String>) -> Self {
        Self::Finished(ActionOutcome::Success(msg.into()))
    }

    pub fn warning(msg: impl Into<String>) -> Self {
        Self::Finished(ActionOutcome::Warning(msg.into()))
    }
}

impl Display for ActionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionOutcome::Success(msg) => write!(f, "{msg}"),
            ActionOutcome::Warning(msg) => write!(f, "warning: {msg}"),
        }
    }
}

pub trait AppEvent {
    type App;
    fn apply(&mut self, app: &mut Self::App) -> Result<EventState, String>;
}

/// The EventQueue stores events that are processed each iteration
/// of the application GUI event loop.
///
/// Running the events has to happen in the app itself, since applying an
/// event needs mutable access to the app that also owns the queue.
pub struct EventQueue<App> {
    /// Stores events for later processing.
    queue: Vec<Box<dyn AppEvent<App = App>>>,
    /// Temporarily stores events that have not yet finished running.
    tmp_backlog: Vec<Box<dyn AppEvent<App = App>>>,
}

impl<App> EventQueue<App> {
    pub fn new() -> Self {
        Self {
            queue: Vec::new(),
            tmp_backlog: Vec::new(),
        }
    }

    pub fn queue_event(&mut self, event: Box<dyn AppEvent<App = App>>) {
        self.queue.push(event);
    }

    /// Takes the oldest queued event.
    pub fn next_event(&mut self) -> Option<Box<dyn AppEvent<App = App>>> {
        if self.queue.is_empty() {
            None
        } else {
            Some(self.queue.remove(0))
        }
    }

    /// Keeps a busy event around until the next call of `restore_backlog`.
    pub fn defer(&mut self, event: Box<dyn AppEvent<App = App>>) {
        self.tmp_backlog.push(event);
    }

    /// Puts deferred events back into the queue, ahead of events queued
    /// in the meantime.
    pub fn restore_backlog(&mut self) {
        if self.tmp_backlog.is_empty() {
            return;
        }
        log::trace!("{} events still busy", self.tmp_backlog.len());
        self.tmp_backlog.append(&mut self.queue);
        std::mem::swap(&mut self.queue, &mut self.tmp_backlog);
    }

    pub fn discard_events(&mut self) {
        self.queue.clear();
        self.tmp_backlog.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty() && self.tmp_backlog.is_empty()
    }
}

impl<App> Default for EventQueue<App> {
    fn default() -> Self {
        Self::new()
    }
}
