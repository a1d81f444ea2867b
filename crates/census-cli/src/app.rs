//! Application state machine and event dispatcher.
//!
//! Key handling never waits on the network. A key that needs a request
//! schedules a [`Task`]; the event loop draws a frame and then runs it with
//! [`App::run_pending`], so progress messages and the form's saving state are
//! on screen while the request is in flight. Keys are ignored until it
//! finishes.

use std::sync::Arc;

use census_core::{
  citizen::{Citizen, CitizenId, Village},
  form::{FormController, FormMode, PrefillPolicy, Route, SubmitOutcome},
  notify::{Notifier, NotifyOptions},
  validate::Field,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};
use strum::IntoEnumIterator;
use tracing::{debug, info};

use crate::{alert::AlertCenter, client::ApiClient};

/// The add/edit form as wired into the shell.
pub type CitizenForm = FormController<ApiClient, AlertCenter>;

// ─── Screen ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
  /// The citizen listing with the detail (or village) pane.
  CitizenList,
  /// The add/edit form.
  CitizenForm,
}

/// Network work waiting for the next frame to be drawn.
#[derive(Debug, Clone, PartialEq)]
pub enum Task {
  LoadCitizens,
  LoadVillages,
  /// Fetch the record behind the open edit form.
  MountForm,
  /// Send the body returned by `begin_submit`.
  Submit(Citizen),
  Delete(CitizenId),
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  /// Current screen / keyboard focus.
  pub screen: Screen,

  /// Records from the last listing fetch.
  pub citizens: Vec<Citizen>,

  /// Current fuzzy-filter string (only active when `filter_active`).
  pub filter: String,

  /// Whether the user is typing a filter query.
  pub filter_active: bool,

  /// Cursor position within the *filtered* citizen list.
  pub list_cursor: usize,

  /// Village lookup, fetched the first time the pane is shown.
  pub villages: Option<Vec<Village>>,

  /// Whether the right pane shows villages instead of the record detail.
  pub show_villages: bool,

  /// Record awaiting delete confirmation.
  pub pending_delete: Option<CitizenId>,

  /// The open form, if any.
  pub form: Option<CitizenForm>,

  /// Focused row of the open form.
  pub form_cursor: usize,

  /// One-line progress message shown while a task runs.
  pub status_msg: String,

  /// Scheduled request, run after the next draw.
  pub pending: Option<Task>,

  /// Notification channel shared with the form.
  pub alerts: AlertCenter,

  /// How edit forms are populated.
  pub prefill: PrefillPolicy,

  /// Shared HTTP client.
  pub client: Arc<ApiClient>,
}

impl App {
  /// Create an [`App`] with an empty listing.
  pub fn new(client: ApiClient, prefill: PrefillPolicy) -> Self {
    Self {
      screen: Screen::CitizenList,
      citizens: Vec::new(),
      filter: String::new(),
      filter_active: false,
      list_cursor: 0,
      villages: None,
      show_villages: false,
      pending_delete: None,
      form: None,
      form_cursor: 0,
      status_msg: String::new(),
      pending: None,
      alerts: AlertCenter::default(),
      prefill,
      client: Arc::new(client),
    }
  }

  // ── Tasks ─────────────────────────────────────────────────────────────────

  /// `true` while a scheduled request has not finished.
  pub fn is_busy(&self) -> bool { self.pending.is_some() }

  fn schedule(&mut self, task: Task, message: &str) {
    debug!(?task, "scheduled");
    self.status_msg = message.to_string();
    self.pending = Some(task);
  }

  /// Run the scheduled task, if any. A task may schedule a follow-up, such as
  /// the listing reload after a save.
  pub async fn run_pending(&mut self) {
    let Some(task) = self.pending.take() else {
      return;
    };
    match task {
      Task::LoadCitizens => {
        // A failed reload is already on the alert line.
        let _ = self.load_citizens().await;
      }
      Task::LoadVillages => self.load_villages().await,
      Task::MountForm => {
        if let Some(form) = self.form.as_mut() {
          form.mount().await;
        }
      }
      Task::Submit(body) => self.send_form(body).await,
      Task::Delete(id) => self.delete_citizen(id).await,
    }
    if self.pending.is_none() {
      self.status_msg.clear();
    }
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Fetch the listing into `self.citizens`.
  pub async fn load_citizens(&mut self) -> anyhow::Result<()> {
    match self.client.list_citizens().await {
      Ok(citizens) => {
        debug!(count = citizens.len(), "loaded citizens");
        self.citizens = citizens;
        let len = self.filtered_citizens().len();
        self.list_cursor = self.list_cursor.min(len.saturating_sub(1));
        Ok(())
      }
      Err(e) => {
        self.alerts.error(&e.to_string());
        Err(e.into())
      }
    }
  }

  async fn load_villages(&mut self) {
    match self.client.list_villages().await {
      Ok(villages) => self.villages = Some(villages),
      Err(e) => {
        self.show_villages = false;
        self.alerts.error(&e.to_string());
      }
    }
  }

  /// Show or hide the village pane, loading the lookup on first show.
  fn toggle_villages(&mut self) {
    self.show_villages = !self.show_villages;
    if self.show_villages && self.villages.is_none() {
      self.schedule(Task::LoadVillages, "Loading villages…");
    }
  }

  async fn delete_citizen(&mut self, id: CitizenId) {
    match self.client.delete_citizen(&id).await {
      Ok(()) => {
        info!(%id, "citizen deleted");
        self.alerts.on_route_change();
        self.alerts.success("Citizen deleted", NotifyOptions::default());
        self.schedule(Task::LoadCitizens, "Loading citizens…");
      }
      Err(e) => self.alerts.error(&e.to_string()),
    }
  }

  /// Send a validated form body and act on the outcome.
  async fn send_form(&mut self, body: Citizen) {
    let Some(form) = self.form.as_mut() else {
      return;
    };
    let result = match form.mode().clone() {
      FormMode::Add => self.client.create_citizen(&body).await,
      FormMode::Edit(id) => self.client.update_citizen(&id, &body).await,
    };
    if let SubmitOutcome::Saved { route, .. } = form.finish_submit(result) {
      self.navigate(route);
    }
  }

  // ── Filtered list ─────────────────────────────────────────────────────────

  /// Records that match the current filter query.
  pub fn filtered_citizens(&self) -> Vec<&Citizen> {
    if self.filter.is_empty() {
      return self.citizens.iter().collect();
    }
    let matcher = SkimMatcherV2::default();
    self
      .citizens
      .iter()
      .filter(|c| {
        matcher.fuzzy_match(&c.full_name(), &self.filter).is_some()
          || matcher.fuzzy_match(&c.identification, &self.filter).is_some()
      })
      .collect()
  }

  /// The record under the list cursor in the filtered view, if any.
  pub fn cursor_citizen(&self) -> Option<&Citizen> {
    self.filtered_citizens().get(self.list_cursor).copied()
  }

  /// Form fields in display order.
  pub fn form_fields() -> Vec<Field> { Field::iter().collect() }

  pub fn focused_field(&self) -> Field {
    let fields = Self::form_fields();
    fields[self.form_cursor.min(fields.len() - 1)]
  }

  // ── Navigation ────────────────────────────────────────────────────────────

  /// Open the form in `mode`; edit mode loads the record next.
  pub fn open_form(&mut self, mode: FormMode) {
    info!(?mode, "opening form");
    self.alerts.on_route_change();
    let editing = matches!(mode, FormMode::Edit(_));
    self.form = Some(FormController::new(
      Arc::clone(&self.client),
      self.alerts.clone(),
      mode,
      self.prefill,
    ));
    self.form_cursor = 0;
    self.screen = Screen::CitizenForm;
    if editing {
      self.schedule(Task::MountForm, "Loading citizen…");
    }
  }

  /// Leave the form for `route`. Both routes land on the listing.
  fn navigate(&mut self, route: Route) {
    debug!(?route, "navigating");
    self.alerts.on_route_change();
    self.form = None;
    self.screen = Screen::CitizenList;
    self.schedule(Task::LoadCitizens, "Loading citizens…");
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    if self.is_busy() {
      debug!(?key, "key ignored while a request is in flight");
      return Ok(true);
    }

    if self.filter_active {
      return self.handle_filter_key(key);
    }

    if let Some(id) = self.pending_delete.take() {
      if key.code == KeyCode::Char('y') {
        self.schedule(Task::Delete(id), "Deleting…");
      }
      return Ok(true);
    }

    match self.screen {
      Screen::CitizenList => self.handle_list_key(key),
      Screen::CitizenForm => self.handle_form_key(key),
    }
  }

  fn handle_filter_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Esc => {
        self.filter_active = false;
        self.filter.clear();
        self.list_cursor = 0;
      }
      KeyCode::Enter => {
        self.filter_active = false;
        self.list_cursor = 0;
        // Immediately open the form if there's exactly one match.
        let only = match self.filtered_citizens().as_slice() {
          [only] => only.id.clone(),
          _ => None,
        };
        if let Some(id) = only {
          self.open_form(FormMode::Edit(id));
        }
      }
      KeyCode::Backspace => {
        self.filter.pop();
        self.list_cursor = 0;
      }
      KeyCode::Char(c) => {
        self.filter.push(c);
        self.list_cursor = 0;
      }
      _ => {}
    }
    Ok(true)
  }

  fn handle_list_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      // Quit
      KeyCode::Char('q') => return Ok(false),

      // Navigation
      KeyCode::Down | KeyCode::Char('j') => {
        let len = self.filtered_citizens().len();
        if len > 0 && self.list_cursor + 1 < len {
          self.list_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.list_cursor = self.list_cursor.saturating_sub(1);
      }

      // Add / edit / delete
      KeyCode::Char('a') => self.open_form(FormMode::Add),
      KeyCode::Enter | KeyCode::Char('e') => {
        if let Some(id) = self.cursor_citizen().and_then(|c| c.id.clone()) {
          self.open_form(FormMode::Edit(id));
        }
      }
      KeyCode::Char('d') => {
        self.pending_delete = self.cursor_citizen().and_then(|c| c.id.clone());
      }

      // Lookup and reload
      KeyCode::Char('v') => self.toggle_villages(),
      KeyCode::Char('r') => {
        self.alerts.clear();
        self.schedule(Task::LoadCitizens, "Loading citizens…");
      }

      // Filter
      KeyCode::Char('/') => {
        self.filter_active = true;
        self.filter.clear();
        self.list_cursor = 0;
      }

      _ => {}
    }
    Ok(true)
  }

  fn handle_form_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    let field = self.focused_field();
    let rows = Self::form_fields().len();
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let Some(form) = self.form.as_mut() else {
      self.screen = Screen::CitizenList;
      return Ok(true);
    };

    match key.code {
      KeyCode::Esc => {
        if let Some(route) = form.cancel() {
          self.navigate(route);
        }
      }
      KeyCode::Enter => self.submit_form(),
      KeyCode::Char('s') if ctrl => self.submit_form(),
      KeyCode::Char('r') if ctrl => form.reset(),

      KeyCode::Down | KeyCode::Tab => {
        self.form_cursor = (self.form_cursor + 1) % rows;
      }
      KeyCode::Up | KeyCode::BackTab => {
        self.form_cursor = (self.form_cursor + rows - 1) % rows;
      }

      KeyCode::Left if field.choices().is_some() => {
        form.cycle_choice(field, false);
      }
      KeyCode::Right | KeyCode::Char(' ') if field.choices().is_some() => {
        form.cycle_choice(field, true);
      }
      KeyCode::Char(c) if !ctrl && field.choices().is_none() => {
        let mut value = form.value(field).to_string();
        value.push(c);
        form.set_value(field, value);
      }
      KeyCode::Backspace if field.choices().is_none() => {
        let mut value = form.value(field).to_string();
        value.pop();
        form.set_value(field, value);
      }
      _ => {}
    }
    Ok(true)
  }

  /// Validate the form and schedule the request, or focus the first invalid
  /// field.
  fn submit_form(&mut self) {
    let Some(form) = self.form.as_mut() else {
      return;
    };
    match form.begin_submit() {
      Ok(body) => self.schedule(Task::Submit(body), "Saving…"),
      Err(SubmitOutcome::Invalid(errors)) => {
        // Jump to the first offending field.
        if let Some(first) = errors.fields().next() {
          if let Some(pos) = Self::form_fields().iter().position(|f| *f == first) {
            self.form_cursor = pos;
          }
        }
      }
      Err(_) => {}
    }
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use axum::http::StatusCode;
  use census_core::form::Phase;
  use crossterm::event::{KeyEventKind, KeyEventState};
  use ratatui::{Terminal, backend::TestBackend};
  use serde_json::json;

  use super::*;
  use crate::{alert::AlertKind, testing::MockApi};

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent {
      code,
      modifiers: KeyModifiers::NONE,
      kind: KeyEventKind::Press,
      state: KeyEventState::NONE,
    }
  }

  fn ctrl(c: char) -> KeyEvent {
    KeyEvent { modifiers: KeyModifiers::CONTROL, ..key(KeyCode::Char(c)) }
  }

  /// Run scheduled work the way the event loop does between frames.
  async fn settle(app: &mut App) {
    while app.is_busy() {
      app.run_pending().await;
    }
  }

  async fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
      app.handle_key(key(KeyCode::Char(c))).unwrap();
    }
    settle(app).await;
  }

  async fn press(app: &mut App, code: KeyCode) -> bool {
    let cont = app.handle_key(key(code)).unwrap();
    settle(app).await;
    cont
  }

  fn render(app: &App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
    terminal.draw(|f| crate::ui::draw(f, app)).unwrap();
    terminal
      .backend()
      .buffer()
      .content()
      .iter()
      .map(|cell| cell.symbol())
      .collect()
  }

  /// A mock API holding a mutable list of records.
  async fn records_api(initial: serde_json::Value) -> MockApi {
    let store = Arc::new(Mutex::new(initial));
    MockApi::start(move |method, path, body| {
      let mut store = store.lock().unwrap();
      let records = store.as_array_mut().unwrap();
      let id = path.strip_prefix("/api/add_citizen/").unwrap_or_default();
      let position = records.iter().position(|r| r["id"].to_string() == id);
      match (method, id, position) {
        ("GET", "", _) => (StatusCode::OK, serde_json::to_string(records).unwrap()),
        ("GET", _, Some(i)) => (StatusCode::OK, records[i].to_string()),
        ("POST", "", _) => {
          let mut rec: serde_json::Value = serde_json::from_str(body).unwrap();
          rec["id"] = json!(100);
          records.push(rec.clone());
          (StatusCode::CREATED, rec.to_string())
        }
        ("PUT", _, Some(i)) => {
          let mut rec: serde_json::Value = serde_json::from_str(body).unwrap();
          rec["id"] = records[i]["id"].clone();
          records[i] = rec.clone();
          (StatusCode::OK, rec.to_string())
        }
        ("DELETE", _, Some(i)) => {
          records.remove(i);
          (StatusCode::NO_CONTENT, String::new())
        }
        _ => (StatusCode::NOT_FOUND, String::new()),
      }
    })
    .await
  }

  async fn app_for(api: &MockApi) -> App {
    let mut app = App::new(api.client(), PrefillPolicy::All);
    app.load_citizens().await.unwrap();
    app
  }

  #[tokio::test]
  async fn add_flow_creates_and_returns_to_listing() {
    let api = records_api(json!([])).await;
    let mut app = app_for(&api).await;

    press(&mut app, KeyCode::Char('a')).await;
    assert_eq!(app.screen, Screen::CitizenForm);
    assert_eq!(app.form.as_ref().unwrap().mode(), &FormMode::Add);

    // Typed values follow display order; select fields cycle.
    type_text(&mut app, "An").await; // firstname
    press(&mut app, KeyCode::Tab).await;
    type_text(&mut app, "Van").await; // midname
    press(&mut app, KeyCode::Tab).await;
    type_text(&mut app, "Nguyen").await; // lastname
    press(&mut app, KeyCode::Tab).await;
    press(&mut app, KeyCode::Right).await; // sex → Nam
    press(&mut app, KeyCode::Tab).await;
    type_text(&mut app, "31").await; // age
    press(&mut app, KeyCode::Tab).await;
    press(&mut app, KeyCode::Right).await; // religion → Không
    press(&mut app, KeyCode::Tab).await;
    type_text(&mut app, "123456789").await; // identification
    press(&mut app, KeyCode::Tab).await;
    press(&mut app, KeyCode::Left).await; // village → 2 (wraps backwards)
    press(&mut app, KeyCode::Tab).await;
    type_text(&mut app, "BA").await; // degree
    press(&mut app, KeyCode::Tab).await;
    type_text(&mut app, "Farmer").await; // job

    press(&mut app, KeyCode::Enter).await;

    assert_eq!(app.screen, Screen::CitizenList);
    assert!(app.form.is_none());
    let posts: Vec<_> = api.requests().into_iter().filter(|r| r.0 == "POST").collect();
    assert_eq!(posts.len(), 1);
    let sent: serde_json::Value = serde_json::from_str(&posts[0].2).unwrap();
    assert_eq!(sent["sex"], "Nam");
    assert_eq!(sent["religion"], "Không");
    assert_eq!(sent["village"], "2");
    assert_eq!(sent["job"], "Farmer");
    assert_eq!(app.citizens.len(), 1);

    let alert = app.alerts.current().unwrap();
    assert_eq!((alert.kind, alert.message.as_str()), (AlertKind::Success, "Citizen added"));
  }

  #[tokio::test]
  async fn invalid_submit_stays_on_form_and_focuses_first_error() {
    let api = records_api(json!([])).await;
    let mut app = app_for(&api).await;
    press(&mut app, KeyCode::Char('a')).await;

    type_text(&mut app, "An").await;
    app.handle_key(ctrl('s')).unwrap();
    assert!(!app.is_busy());

    assert_eq!(app.screen, Screen::CitizenForm);
    assert_eq!(app.focused_field(), Field::Midname);
    let form = app.form.as_ref().unwrap();
    assert_eq!(form.phase(), Phase::Idle);
    assert_eq!(form.error(Field::Midname), Some("Mid Name is required"));
    assert!(api.requests().iter().all(|r| r.0 == "GET"));
  }

  #[tokio::test]
  async fn escape_cancels_without_request() {
    let api = records_api(json!([{ "id": 1, "firstname": "An" }])).await;
    let mut app = app_for(&api).await;

    press(&mut app, KeyCode::Enter).await;
    assert_eq!(app.form.as_ref().unwrap().values().firstname, "An");
    press(&mut app, KeyCode::Esc).await;

    assert_eq!(app.screen, Screen::CitizenList);
    assert!(api.requests().iter().all(|r| r.0 == "GET"));
  }

  #[tokio::test]
  async fn delete_needs_confirmation() {
    let api = records_api(json!([{ "id": 1, "firstname": "An" }])).await;
    let mut app = app_for(&api).await;

    press(&mut app, KeyCode::Char('d')).await;
    press(&mut app, KeyCode::Char('n')).await;
    assert!(api.requests().iter().all(|r| r.0 != "DELETE"));
    assert_eq!(app.citizens.len(), 1);

    press(&mut app, KeyCode::Char('d')).await;
    assert_eq!(app.pending_delete, Some(CitizenId::from(1)));
    press(&mut app, KeyCode::Char('y')).await;

    let deletes: Vec<_> = api.requests().into_iter().filter(|r| r.0 == "DELETE").collect();
    assert_eq!(deletes.len(), 1);
    assert_eq!(deletes[0].1, "/api/add_citizen/1");
    assert!(app.citizens.is_empty());
    assert_eq!(app.alerts.current().unwrap().message, "Citizen deleted");
  }

  #[tokio::test]
  async fn filter_matches_names_and_identification() {
    let api = records_api(json!([
      { "id": 1, "firstname": "An", "lastname": "Nguyen", "identification": "111111111" },
      { "id": 2, "firstname": "Binh", "lastname": "Tran", "identification": "222222222" },
    ]))
    .await;
    let mut app = app_for(&api).await;

    press(&mut app, KeyCode::Char('/')).await;
    type_text(&mut app, "tran").await;
    assert_eq!(app.filtered_citizens().len(), 1);
    assert_eq!(app.cursor_citizen().unwrap().firstname, "Binh");

    press(&mut app, KeyCode::Esc).await;
    press(&mut app, KeyCode::Char('/')).await;
    type_text(&mut app, "1111").await;
    assert_eq!(app.filtered_citizens().len(), 1);
    assert_eq!(app.cursor_citizen().unwrap().firstname, "An");
  }

  #[tokio::test]
  async fn quit_keys() {
    let api = records_api(json!([])).await;
    let mut app = app_for(&api).await;
    assert!(!press(&mut app, KeyCode::Char('q')).await);
    assert!(!app.handle_key(ctrl('c')).unwrap());
  }

  fn complete_record(id: u64) -> serde_json::Value {
    json!({
      "id": id, "firstname": "Binh", "midname": "Thi", "lastname": "Tran",
      "sex": "Nu", "age": "40", "job": "Nurse", "village": "2",
      "religion": "Phật giáo", "identification": "012345678901", "degree": "BA",
    })
  }

  #[tokio::test]
  async fn saving_state_is_drawn_before_the_request_runs() {
    let api = records_api(json!([complete_record(42)])).await;
    let mut app = app_for(&api).await;
    press(&mut app, KeyCode::Enter).await;

    app.handle_key(key(KeyCode::Enter)).unwrap();

    assert!(app.form.as_ref().unwrap().is_submitting());
    assert_eq!(app.status_msg, "Saving…");
    assert!(render(&app).contains("Saving"));
    assert!(api.requests().iter().all(|r| r.0 == "GET"));

    settle(&mut app).await;
    assert!(app.status_msg.is_empty());
    assert_eq!(app.screen, Screen::CitizenList);
  }

  #[tokio::test]
  async fn double_enter_sends_one_update() {
    let api = records_api(json!([complete_record(42)])).await;
    let mut app = app_for(&api).await;
    press(&mut app, KeyCode::Enter).await;
    assert_eq!(app.form.as_ref().unwrap().values().firstname, "Binh");

    // Both presses land before the loop gets to run the request.
    app.handle_key(key(KeyCode::Enter)).unwrap();
    app.handle_key(key(KeyCode::Enter)).unwrap();
    settle(&mut app).await;

    let puts: Vec<_> = api.requests().into_iter().filter(|r| r.0 == "PUT").collect();
    assert_eq!(puts.len(), 1);
    assert_eq!(puts[0].1, "/api/add_citizen/42");
    assert_eq!(app.screen, Screen::CitizenList);
    assert!(app.form.is_none());
    assert_eq!(app.alerts.current().unwrap().message, "Citizen updated");
  }

  #[tokio::test]
  async fn failed_update_keeps_form_open_once() {
    let api = MockApi::start(|method, path, _| match (method, path) {
      ("GET", "/api/add_citizen/") => {
        (StatusCode::OK, json!([complete_record(42)]).to_string())
      }
      ("GET", _) => (StatusCode::OK, complete_record(42).to_string()),
      _ => (StatusCode::INTERNAL_SERVER_ERROR, json!({ "detail": "locked" }).to_string()),
    })
    .await;
    let mut app = app_for(&api).await;
    press(&mut app, KeyCode::Enter).await;

    app.handle_key(key(KeyCode::Enter)).unwrap();
    app.handle_key(key(KeyCode::Enter)).unwrap();
    settle(&mut app).await;

    assert_eq!(api.requests().iter().filter(|r| r.0 == "PUT").count(), 1);
    assert_eq!(app.screen, Screen::CitizenForm);
    assert!(!app.form.as_ref().unwrap().is_submitting());
    let alert = app.alerts.current().unwrap();
    assert_eq!(alert.kind, AlertKind::Error);
    assert!(alert.message.contains("locked"), "{}", alert.message);
  }

  #[tokio::test]
  async fn keys_are_ignored_while_loading() {
    let api = records_api(json!([{ "id": 1, "firstname": "An" }])).await;
    let mut app = app_for(&api).await;

    app.handle_key(key(KeyCode::Char('r'))).unwrap();
    assert_eq!(app.status_msg, "Loading citizens…");
    app.handle_key(key(KeyCode::Char('a'))).unwrap();
    settle(&mut app).await;

    assert_eq!(app.screen, Screen::CitizenList);
    assert!(app.form.is_none());
  }
}
