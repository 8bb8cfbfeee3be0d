use parking_lot::Mutex;
use serde::Serialize;
use tracing::info;

/// Fire-and-forget user notifications (toasts, flash messages, console lines).
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, description: &str);
}

/// Client-side navigation. The session core never inspects the outcome.
pub trait Navigator: Send + Sync {
    fn navigate(&self, destination: &str);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, title: &str, description: &str) {
        info!(target: "portal", title, description, "notify");
    }
}

/// Collects notifications so a response can carry them back to the client.
#[derive(Debug, Default)]
pub struct FlashNotifier {
    items: Mutex<Vec<Notification>>,
}

impl FlashNotifier {
    pub fn new() -> Self { Self::default() }

    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.items.lock())
    }

    pub fn snapshot(&self) -> Vec<Notification> {
        self.items.lock().clone()
    }
}

impl Notifier for FlashNotifier {
    fn notify(&self, title: &str, description: &str) {
        TracingNotifier.notify(title, description);
        self.items.lock().push(Notification { title: title.to_string(), description: description.to_string() });
    }
}

/// Remembers every navigation request in order.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visits: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self { Self::default() }

    pub fn visits(&self) -> Vec<String> {
        self.visits.lock().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.visits.lock().last().cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, destination: &str) {
        self.visits.lock().push(destination.to_string());
    }
}
