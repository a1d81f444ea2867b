//! Notification channel used to surface transient success and error messages.

/// Options attached to a success notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotifyOptions {
  /// Keep the message visible across the next navigation.
  pub keep_after_route_change: bool,
}

impl NotifyOptions {
  pub fn keep_after_route_change() -> Self {
    Self { keep_after_route_change: true }
  }
}

/// Sink for user-visible notifications.
///
/// Takes `&self` so one channel can be shared between the form controller
/// and the shell that renders it.
pub trait Notifier {
  fn success(&self, message: &str, opts: NotifyOptions);
  fn error(&self, message: &str);
}

