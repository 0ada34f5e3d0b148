//! How the dashboard tells its UI that something changed.
//!
//! Updates carry no payload: the receiver re-reads whatever dashboard state it
//! displays. Errors carry the failed lookup's [`FetchError`].

use std::sync::mpsc::Sender;

use skycast_weather::FetchError;

/// Receives dashboard notifications. Called from fetch tasks, never while the
/// dashboard's state lock is held, so implementations may read the dashboard.
pub trait DashboardListener: Send + Sync {
    /// Fired once per mutation of the dashboard lists.
    fn on_dashboard_updated(&self);

    /// Fired once per failed lookup.
    fn on_error(&self, error: &FetchError);
}

/// Messages sent to a UI thread that drains a channel instead of taking callbacks
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardMessage {
    Updated,
    Error(FetchError),
}

impl DashboardListener for Sender<DashboardMessage> {
    fn on_dashboard_updated(&self) {
        // Receiver gone means the UI shut down; nothing left to notify.
        let _ = self.send(DashboardMessage::Updated);
    }

    fn on_error(&self, error: &FetchError) {
        let _ = self.send(DashboardMessage::Error(error.clone()));
    }
}

type UpdateFn = Box<dyn Fn() + Send + Sync>;
type ErrorFn = Box<dyn Fn(&FetchError) + Send + Sync>;

/// Listener built from closures. Unset callbacks are no-ops.
#[derive(Default)]
pub struct CallbackListener {
    on_update: Option<UpdateFn>,
    on_error: Option<ErrorFn>,
}

impl CallbackListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_update(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_update = Some(Box::new(f));
        self
    }

    pub fn with_error(mut self, f: impl Fn(&FetchError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }
}

impl std::fmt::Debug for CallbackListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackListener")
            .field("on_update", &self.on_update.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

impl DashboardListener for CallbackListener {
    fn on_dashboard_updated(&self) {
        if let Some(f) = &self.on_update {
            f();
        }
    }

    fn on_error(&self, error: &FetchError) {
        if let Some(f) = &self.on_error {
            f(error);
        }
    }
}
