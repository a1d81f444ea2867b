//! The add/edit form controller.
//!
//! A [`FormController`] owns the field values of one citizen form. In
//! [`FormMode::Edit`] it first loads the record through the
//! [`RecordService`]; on submit it validates every field, issues exactly one
//! `create` or `update` call, reports the result through the injected
//! [`Notifier`], and tells the caller where to navigate.
//!
//! ```text
//! Idle ──submit──▶ Validating ──ok──▶ Submitting ──▶ Success
//!   ▲                  │                  │
//!   └──── invalid ─────┘                  └──▶ Failed (editable, like Idle)
//! ```

use std::sync::Arc;

use serde::Deserialize;
use strum::{Display, EnumString, IntoEnumIterator};
use tracing::{debug, info, warn};

use crate::{
  citizen::{Citizen, CitizenId},
  notify::{Notifier, NotifyOptions},
  service::RecordService,
  validate::{Field, ValidationErrors, validate},
};

// ─── Modes and routes ────────────────────────────────────────────────────────

/// Whether the form creates a new record or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
  Add,
  Edit(CitizenId),
}

impl FormMode {
  pub fn title(&self) -> &'static str {
    match self {
      FormMode::Add => "Add Citizen",
      FormMode::Edit(_) => "Edit Citizen",
    }
  }

  /// Where to go once the form is done with, saved or cancelled.
  pub fn exit_route(&self) -> Route {
    match self {
      FormMode::Add => Route::Listing,
      FormMode::Edit(_) => Route::Parent,
    }
  }
}

/// Navigation target requested by the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
  /// The current listing.
  Listing,
  /// One level up from the record being edited.
  Parent,
}

/// Which fields an edit form copies from the fetched record.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PrefillPolicy {
  /// Every field.
  #[default]
  All,
  /// Names, sex, identification and age only.
  Identity,
}

impl PrefillPolicy {
  pub const IDENTITY_FIELDS: [Field; 6] = [
    Field::Firstname,
    Field::Midname,
    Field::Lastname,
    Field::Sex,
    Field::Identification,
    Field::Age,
  ];

  pub fn fields(self) -> Vec<Field> {
    match self {
      PrefillPolicy::All => Field::iter().collect(),
      PrefillPolicy::Identity => Self::IDENTITY_FIELDS.to_vec(),
    }
  }
}

// ─── Phase and outcome ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
  Idle,
  Validating,
  Submitting,
  Success,
  /// The last submission was rejected; the form is editable again.
  Failed,
}

/// Result of one submit attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
  /// Validation failed; no request was made.
  Invalid(ValidationErrors),
  /// A submission is already in flight; nothing was done.
  Busy,
  /// The record was persisted; navigate to `route`.
  Saved { record: Citizen, route: Route },
  /// The request failed with this message.
  Failed(String),
}

// ─── Controller ──────────────────────────────────────────────────────────────

pub struct FormController<S, N> {
  service:  Arc<S>,
  notifier: N,
  mode:     FormMode,
  prefill:  PrefillPolicy,
  /// Current input.
  values:   Citizen,
  /// Values restored by [`FormController::reset`].
  initial:  Citizen,
  errors:   ValidationErrors,
  phase:    Phase,
}

impl<S, N> FormController<S, N>
where
  S: RecordService,
  N: Notifier,
{
  pub fn new(
    service: Arc<S>,
    notifier: N,
    mode: FormMode,
    prefill: PrefillPolicy,
  ) -> Self {
    Self {
      service,
      notifier,
      mode,
      prefill,
      values: Citizen::default(),
      initial: Citizen::default(),
      errors: ValidationErrors::default(),
      phase: Phase::Idle,
    }
  }

  // ── Accessors ─────────────────────────────────────────────────────────────

  pub fn mode(&self) -> &FormMode { &self.mode }

  pub fn phase(&self) -> Phase { self.phase }

  pub fn values(&self) -> &Citizen { &self.values }

  pub fn value(&self, field: Field) -> &str { field.get(&self.values) }

  pub fn errors(&self) -> &ValidationErrors { &self.errors }

  pub fn error(&self, field: Field) -> Option<&'static str> {
    self.errors.get(field)
  }

  /// `true` while a create/update call is outstanding.
  pub fn is_submitting(&self) -> bool { self.phase == Phase::Submitting }

  // ── Loading ───────────────────────────────────────────────────────────────

  /// Populate the form for edit mode. Does nothing in add mode.
  ///
  /// A failed fetch is reported through the notifier; the form stays usable
  /// with whatever it already holds.
  pub async fn mount(&mut self) {
    let FormMode::Edit(id) = &self.mode else {
      return;
    };
    let id = id.clone();
    let service = Arc::clone(&self.service);

    debug!(%id, "loading citizen for edit");
    match service.get_by_id(&id).await {
      Ok(record) => self.apply_loaded(&record),
      Err(e) => {
        warn!(%id, error = %e, "failed to load citizen");
        self.notifier.error(&e.to_string());
      }
    }
  }

  /// Copy the fields selected by the prefill policy from `record`.
  ///
  /// Overwrites whatever the user typed into those fields.
  pub fn apply_loaded(&mut self, record: &Citizen) {
    for field in self.prefill.fields() {
      *field.get_mut(&mut self.values) = field.get(record).to_string();
    }
    if self.prefill == PrefillPolicy::All {
      self.values.id = record.id.clone();
    }
    self.initial = self.values.clone();
  }

  // ── Editing ───────────────────────────────────────────────────────────────

  /// Set one field. Ignored while submitting.
  ///
  /// A field that already shows an error is re-checked immediately.
  pub fn set_value(&mut self, field: Field, value: impl Into<String>) -> bool {
    if self.is_submitting() {
      return false;
    }
    *field.get_mut(&mut self.values) = value.into();
    if self.errors.get(field).is_some() {
      match field.rule().check(field.get(&self.values)) {
        Ok(()) => {
          self.errors.0.remove(&field);
        }
        Err(msg) => {
          self.errors.0.insert(field, msg);
        }
      }
    }
    true
  }

  /// Step a select field through its options, with the blank option first.
  /// Free-text fields are left alone.
  pub fn cycle_choice(&mut self, field: Field, forward: bool) -> bool {
    let Some(choices) = field.choices() else {
      return false;
    };
    let options: Vec<&str> = std::iter::once("")
      .chain(choices.iter().map(|c| c.value))
      .collect();
    let current = options
      .iter()
      .position(|v| *v == self.value(field))
      .unwrap_or(0);
    let next = if forward {
      (current + 1) % options.len()
    } else {
      (current + options.len() - 1) % options.len()
    };
    let value = options[next].to_string();
    self.set_value(field, value)
  }

  /// Restore the values the form was populated with and clear errors.
  pub fn reset(&mut self) {
    if self.is_submitting() {
      return;
    }
    self.values = self.initial.clone();
    self.errors = ValidationErrors::default();
    self.phase = Phase::Idle;
  }

  /// Leave the form without saving. `None` while a submission is in flight.
  pub fn cancel(&self) -> Option<Route> {
    (!self.is_submitting()).then(|| self.mode.exit_route())
  }

  // ── Submission ────────────────────────────────────────────────────────────

  /// Validate and enter `Submitting`, returning the request body.
  ///
  /// Returns `Err(Busy)` if a submission is already in flight and
  /// `Err(Invalid)` if any field fails; neither issues a request.
  pub fn begin_submit(&mut self) -> Result<Citizen, SubmitOutcome> {
    if self.is_submitting() {
      debug!("submit ignored: already submitting");
      return Err(SubmitOutcome::Busy);
    }

    self.phase = Phase::Validating;
    if let Err(errors) = validate(&self.values) {
      debug!(fields = errors.0.len(), "form failed validation");
      self.errors = errors.clone();
      self.phase = Phase::Idle;
      return Err(SubmitOutcome::Invalid(errors));
    }

    self.errors = ValidationErrors::default();
    self.phase = Phase::Submitting;
    Ok(Citizen { id: None, ..self.values.clone() })
  }

  /// Record the result of the request started by
  /// [`begin_submit`](Self::begin_submit) and notify the user.
  pub fn finish_submit(
    &mut self,
    result: Result<Citizen, S::Error>,
  ) -> SubmitOutcome {
    match result {
      Ok(record) => {
        let message = match self.mode {
          FormMode::Add => "Citizen added",
          FormMode::Edit(_) => "Citizen updated",
        };
        info!(id = ?record.id, "{message}");
        self
          .notifier
          .success(message, NotifyOptions::keep_after_route_change());
        self.phase = Phase::Success;
        SubmitOutcome::Saved { record, route: self.mode.exit_route() }
      }
      Err(e) => {
        let message = e.to_string();
        warn!(error = %message, "submit failed");
        self.notifier.error(&message);
        self.phase = Phase::Failed;
        SubmitOutcome::Failed(message)
      }
    }
  }

  /// Validate, then create (add mode) or update (edit mode).
  pub async fn submit(&mut self) -> SubmitOutcome {
    let body = match self.begin_submit() {
      Ok(body) => body,
      Err(outcome) => return outcome,
    };

    let service = Arc::clone(&self.service);
    let result = match &self.mode {
      FormMode::Add => service.create(&body).await,
      FormMode::Edit(id) => service.update(id, &body).await,
    };
    self.finish_submit(result)
  }
}
