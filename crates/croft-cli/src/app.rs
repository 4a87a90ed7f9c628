//! Application state machine and event dispatcher.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use croft_core::view::{AnimalWithWeights, WeightWithAnimal};
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};

use crate::{
  client::{ApiClient, RegisterRequest, WeighRequest},
  theme::ThemePreference,
};

// ─── Tabs ─────────────────────────────────────────────────────────────────────

/// The three panes of the client, mirroring the forms of the web UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
  Register,
  Weigh,
  Browse,
}

impl Tab {
  pub const ALL: [Tab; 3] = [Tab::Register, Tab::Weigh, Tab::Browse];

  pub fn title(self) -> &'static str {
    match self {
      Tab::Register => "Register",
      Tab::Weigh => "Weigh",
      Tab::Browse => "Browse",
    }
  }

  pub fn index(self) -> usize {
    match self {
      Tab::Register => 0,
      Tab::Weigh => 1,
      Tab::Browse => 2,
    }
  }

  fn next(self) -> Self {
    match self {
      Tab::Register => Tab::Weigh,
      Tab::Weigh => Tab::Browse,
      Tab::Browse => Tab::Register,
    }
  }

  fn prev(self) -> Self {
    match self {
      Tab::Register => Tab::Browse,
      Tab::Weigh => Tab::Register,
      Tab::Browse => Tab::Weigh,
    }
  }
}

// ─── Forms ────────────────────────────────────────────────────────────────────

pub struct FormField {
  pub label: &'static str,
  pub value: String,
}

pub struct Form {
  pub fields: Vec<FormField>,
  pub focus:  usize,
}

impl Form {
  fn new(labels: &'static [&'static str]) -> Self {
    Self {
      fields: labels
        .iter()
        .map(|label| FormField { label, value: String::new() })
        .collect(),
      focus:  0,
    }
  }

  fn focus_next(&mut self) {
    self.focus = (self.focus + 1) % self.fields.len();
  }

  fn focus_prev(&mut self) {
    self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
  }

  fn value(&self, index: usize) -> &str {
    self.fields[index].value.trim()
  }

  fn optional(&self, index: usize) -> Option<String> {
    let value = self.value(index);
    (!value.is_empty()).then(|| value.to_owned())
  }

  fn clear(&mut self) {
    for field in &mut self.fields {
      field.value.clear();
    }
    self.focus = 0;
  }
}

// Register form field order.
pub const REG_TAG: usize = 0;
pub const REG_TYPE: usize = 1;
pub const REG_WEIGHT: usize = 2;
pub const REG_BIRTH: usize = 3;
pub const REG_NOTES: usize = 4;

// Weigh form field order.
pub const WEIGH_TAG: usize = 0;
pub const WEIGH_WEIGHT: usize = 1;
pub const WEIGH_NOTES: usize = 2;

// ─── Browse state ─────────────────────────────────────────────────────────────

/// The Browse pane: the herd list plus an optional weight-history view for
/// the selected animal.
#[derive(Default)]
pub struct BrowseState {
  pub animals:       Vec<AnimalWithWeights>,
  /// Current fuzzy-filter string (only edited while `filter_active`).
  pub filter:        String,
  pub filter_active: bool,
  /// Cursor position within the *filtered* list.
  pub cursor:        usize,
  /// Weight history of the animal the history pane is open for.
  pub history:       Vec<WeightWithAnimal>,
  pub history_tag:   Option<String>,
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  pub tab:        Tab,
  pub register:   Form,
  pub weigh:      Form,
  pub browse:     BrowseState,
  /// One-line status message shown in the status bar.
  pub status_msg: String,
  pub theme:      ThemePreference,
  /// Shared HTTP client.
  pub client:     Arc<ApiClient>,
}

impl App {
  pub fn new(client: ApiClient, theme: ThemePreference) -> Self {
    Self {
      tab:        Tab::Register,
      register:   Form::new(&["Tag number", "Type", "Initial weight (kg)", "Birth date", "Notes"]),
      weigh:      Form::new(&["Tag number", "Weight (kg)", "Notes"]),
      browse:     BrowseState::default(),
      status_msg: String::new(),
      theme,
      client:     Arc::new(client),
    }
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Fetch the herd list; failures land in the status bar.
  pub async fn reload_animals(&mut self) {
    match self.client.list_animals(None).await {
      Ok(animals) => {
        self.browse.animals = animals;
        self.browse.cursor = 0;
      }
      Err(e) => self.status_msg = format!("Error: {e}"),
    }
  }

  async fn open_history(&mut self, tag: String) {
    match self.client.list_weights(&tag).await {
      Ok(history) => {
        self.browse.history = history;
        self.browse.history_tag = Some(tag);
      }
      Err(e) => self.status_msg = format!("Error: {e}"),
    }
  }

  // ── Filtered list ─────────────────────────────────────────────────────────

  /// Animals matching the current filter query, by tag or species.
  pub fn filtered_animals(&self) -> Vec<&AnimalWithWeights> {
    if self.browse.filter.is_empty() {
      return self.browse.animals.iter().collect();
    }
    let matcher = SkimMatcherV2::default();
    self
      .browse
      .animals
      .iter()
      .filter(|a| {
        matcher
          .fuzzy_match(&a.animal.tag_number, &self.browse.filter)
          .is_some()
          || matcher
            .fuzzy_match(a.animal.species.as_str(), &self.browse.filter)
            .is_some()
      })
      .collect()
  }

  fn cursor_tag(&self) -> Option<String> {
    let list = self.filtered_animals();
    list
      .get(self.browse.cursor)
      .map(|a| a.animal.tag_number.clone())
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    // Global: Ctrl-C quits, Ctrl-T toggles (and persists) the theme.
    if key.modifiers.contains(KeyModifiers::CONTROL) {
      match key.code {
        KeyCode::Char('c') => return Ok(false),
        KeyCode::Char('t') => {
          if let Err(e) = self.theme.toggle() {
            self.status_msg = format!("Could not save theme: {e}");
          }
          return Ok(true);
        }
        _ => return Ok(true),
      }
    }

    // Filter input mode swallows everything else.
    if self.tab == Tab::Browse && self.browse.filter_active {
      return Ok(self.handle_filter_key(key));
    }

    // Tab cycling works from any pane.
    match key.code {
      KeyCode::Tab => {
        self.tab = self.tab.next();
        self.status_msg.clear();
        return Ok(true);
      }
      KeyCode::BackTab => {
        self.tab = self.tab.prev();
        self.status_msg.clear();
        return Ok(true);
      }
      _ => {}
    }

    match self.tab {
      Tab::Register => self.handle_register_key(key).await,
      Tab::Weigh => self.handle_weigh_key(key).await,
      Tab::Browse => self.handle_browse_key(key).await,
    }
  }

  fn handle_filter_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      KeyCode::Esc => {
        self.browse.filter_active = false;
        self.browse.filter.clear();
        self.browse.cursor = 0;
      }
      KeyCode::Enter => {
        self.browse.filter_active = false;
        self.browse.cursor = 0;
      }
      KeyCode::Backspace => {
        self.browse.filter.pop();
        self.browse.cursor = 0;
      }
      KeyCode::Char(c) => {
        self.browse.filter.push(c);
        self.browse.cursor = 0;
      }
      _ => {}
    }
    true
  }

  async fn handle_register_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Down => self.register.focus_next(),
      KeyCode::Up => self.register.focus_prev(),
      KeyCode::Enter => self.submit_register().await,
      KeyCode::Backspace => {
        let focus = self.register.focus;
        self.register.fields[focus].value.pop();
      }
      KeyCode::Char(c) => {
        let focus = self.register.focus;
        self.register.fields[focus].value.push(c);
      }
      _ => {}
    }
    Ok(true)
  }

  async fn handle_weigh_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Down => self.weigh.focus_next(),
      KeyCode::Up => self.weigh.focus_prev(),
      KeyCode::Enter => self.submit_weigh().await,
      KeyCode::Backspace => {
        let focus = self.weigh.focus;
        self.weigh.fields[focus].value.pop();
      }
      KeyCode::Char(c) => {
        let focus = self.weigh.focus;
        self.weigh.fields[focus].value.push(c);
      }
      _ => {}
    }
    Ok(true)
  }

  async fn handle_browse_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      // Quit
      KeyCode::Char('q') => return Ok(false),

      // Close history, if open
      KeyCode::Esc | KeyCode::Left | KeyCode::Char('h') => {
        self.browse.history_tag = None;
        self.browse.history.clear();
      }

      // Navigation
      KeyCode::Down | KeyCode::Char('j') => {
        let len = self.filtered_animals().len();
        if len > 0 && self.browse.cursor + 1 < len {
          self.browse.cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        if self.browse.cursor > 0 {
          self.browse.cursor -= 1;
        }
      }

      // Open weight history for the animal under the cursor
      KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
        if let Some(tag) = self.cursor_tag() {
          self.open_history(tag).await;
        }
      }

      // Filter
      KeyCode::Char('/') => {
        self.browse.filter_active = true;
        self.browse.filter.clear();
        self.browse.cursor = 0;
      }

      // Reload
      KeyCode::Char('r') => {
        self.status_msg = "Reloading…".into();
        self.reload_animals().await;
        self.status_msg.clear();
      }

      _ => {}
    }
    Ok(true)
  }

  // ── Submission ────────────────────────────────────────────────────────────

  async fn submit_register(&mut self) {
    let request = RegisterRequest {
      tag_number:     self.register.value(REG_TAG).to_owned(),
      species:        self.register.value(REG_TYPE).to_uppercase(),
      initial_weight: self.register.value(REG_WEIGHT).to_owned(),
      birth_date:     self.register.optional(REG_BIRTH),
      notes:          self.register.optional(REG_NOTES),
    };

    match self.client.register_animal(&request).await {
      Ok(message) => {
        self.status_msg = message;
        self.register.clear();
        self.reload_animals().await;
      }
      Err(e) => self.status_msg = format!("Error: {e}"),
    }
  }

  async fn submit_weigh(&mut self) {
    let request = WeighRequest {
      tag_number: self.weigh.value(WEIGH_TAG).to_owned(),
      weight:     self.weigh.value(WEIGH_WEIGHT).to_owned(),
      notes:      self.weigh.optional(WEIGH_NOTES),
    };

    match self.client.record_weight(&request).await {
      Ok(message) => {
        self.status_msg = message;
        self.weigh.clear();
        self.reload_animals().await;
      }
      Err(e) => self.status_msg = format!("Error: {e}"),
    }
  }
}
