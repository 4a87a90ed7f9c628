//! TUI rendering — orchestrates the tab chrome and panes.

pub mod browse;
pub mod forms;

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Paragraph, Tabs},
};

use crate::app::{App, Tab};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let palette = app.theme.theme().palette();
  let area = f.area();

  // Paint the themed background before anything else.
  f.render_widget(
    Block::default().style(Style::default().bg(palette.bg).fg(palette.fg)),
    area,
  );

  // Vertical stack: tab bar, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // tab bar
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_tabs(f, rows[0], app);
  match app.tab {
    Tab::Register => forms::draw(f, rows[1], &app.register, "Register animal", &palette),
    Tab::Weigh => forms::draw(f, rows[1], &app.weigh, "Record weight", &palette),
    Tab::Browse => browse::draw(f, rows[1], app),
  }
  draw_status(f, rows[2], app);
}

// ─── Tab bar ──────────────────────────────────────────────────────────────────

fn draw_tabs(f: &mut Frame, area: Rect, app: &App) {
  let palette = app.theme.theme().palette();

  let titles: Vec<Line> = Tab::ALL
    .iter()
    .map(|t| Line::from(format!(" {} ", t.title())))
    .collect();

  let tabs = Tabs::new(titles)
    .select(app.tab.index())
    .style(Style::default().fg(palette.dim).bg(palette.bg))
    .highlight_style(
      Style::default()
        .fg(palette.accent)
        .add_modifier(Modifier::BOLD),
    )
    .divider("│");

  f.render_widget(tabs, area);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let palette = app.theme.theme().palette();

  let (mode_label, hints) = match app.tab {
    Tab::Browse if app.browse.filter_active => {
      ("FILTER", "Type to filter  Esc cancel  Enter done")
    }
    Tab::Browse => (
      "BROWSE",
      "↑↓/jk move  Enter history  / filter  r reload  Tab next  ^T theme  q quit",
    ),
    Tab::Register => (
      "REGISTER",
      "↑↓ field  Enter submit  Tab next tab  ^T theme  ^C quit",
    ),
    Tab::Weigh => (
      "WEIGH",
      "↑↓ field  Enter submit  Tab next tab  ^T theme  ^C quit",
    ),
  };

  let status = if app.status_msg.is_empty() {
    hints.to_string()
  } else {
    app.status_msg.clone()
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(palette.highlight_fg)
      .bg(palette.highlight_bg)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(format!("  {status}"), Style::default().fg(palette.dim));

  f.render_widget(
    Paragraph::new(Line::from(vec![mode_span, hint_span]))
      .style(Style::default().bg(palette.bg)),
    area,
  );
}
