//! The shell's notification channel.
//!
//! Alerts live until the next navigation unless raised with
//! `keep_after_route_change`, in which case they survive exactly one.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use census_core::notify::{Notifier, NotifyOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
  Success,
  Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
  pub kind:    AlertKind,
  pub message: String,
  keep_after_route_change: bool,
}

/// The shell's single current alert. Clones refer to the same slot.
#[derive(Debug, Clone, Default)]
pub struct AlertCenter(Arc<Mutex<Option<Alert>>>);

impl AlertCenter {
  fn slot(&self) -> MutexGuard<'_, Option<Alert>> {
    self.0.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// A new alert replaces the current one.
  fn raise(&self, kind: AlertKind, message: &str, keep: bool) {
    *self.slot() = Some(Alert {
      kind,
      message: message.to_string(),
      keep_after_route_change: keep,
    });
  }

  pub fn current(&self) -> Option<Alert> { self.slot().clone() }

  pub fn clear(&self) { *self.slot() = None; }

  /// Call on every navigation.
  pub fn on_route_change(&self) {
    let mut slot = self.slot();
    if let Some(mut alert) = slot.take()
      && alert.keep_after_route_change
    {
      alert.keep_after_route_change = false;
      *slot = Some(alert);
    }
  }
}

impl Notifier for AlertCenter {
  fn success(&self, message: &str, opts: NotifyOptions) {
    self.raise(AlertKind::Success, message, opts.keep_after_route_change);
  }

  fn error(&self, message: &str) { self.raise(AlertKind::Error, message, false); }
}
