//! Browse pane — the herd list with latest weights, plus an optional
//! weight-history panel for the selected animal.

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::{app::App, theme::Palette};

/// Render the Browse tab into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let palette = app.theme.theme().palette();

  if app.browse.history_tag.is_some() {
    let cols = Layout::default()
      .direction(Direction::Horizontal)
      .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
      .split(area);
    draw_list(f, cols[0], app, &palette);
    draw_history(f, cols[1], app, &palette);
  } else {
    draw_list(f, area, app, &palette);
  }
}

fn draw_list(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
  let filtered = app.filtered_animals();
  let total = app.browse.animals.len();

  let title = if app.browse.filter_active || !app.browse.filter.is_empty() {
    format!(" Herd ({}/{}) ", filtered.len(), total)
  } else {
    format!(" Herd ({total}) ")
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(palette.dim));
  let mut inner = block.inner(area);
  f.render_widget(block, area);

  // Filter bar at the bottom of the pane while filtering.
  if (app.browse.filter_active || !app.browse.filter.is_empty()) && inner.height > 2 {
    let filter_area = Rect {
      x:      inner.x,
      y:      inner.y + inner.height - 1,
      width:  inner.width,
      height: 1,
    };
    inner.height = inner.height.saturating_sub(1);

    let filter_text = if app.browse.filter_active {
      format!("/{}_", app.browse.filter)
    } else {
      format!("/{}", app.browse.filter)
    };
    f.render_widget(
      Paragraph::new(filter_text).style(Style::default().fg(palette.accent)),
      filter_area,
    );
  }

  let items: Vec<ListItem> = filtered
    .iter()
    .map(|entry| {
      let latest = entry
        .weights
        .first()
        .map(|w| format!("{:.1} kg  {}", w.weight, w.recorded_at.format("%Y-%m-%d")))
        .unwrap_or_else(|| "—".to_owned());

      ListItem::new(Line::from(vec![
        Span::styled(
          format!("{:<12}", entry.animal.tag_number),
          Style::default().fg(palette.fg).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
          format!("{:<8}", entry.animal.species.as_str()),
          Style::default().fg(palette.dim),
        ),
        Span::styled(latest, Style::default().fg(palette.fg)),
      ]))
    })
    .collect();

  let mut state = ListState::default();
  state.select((!filtered.is_empty()).then_some(app.browse.cursor));

  f.render_stateful_widget(
    List::new(items)
      .highlight_style(
        Style::default()
          .bg(palette.highlight_bg)
          .fg(palette.highlight_fg)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol(""),
    inner,
    &mut state,
  );
}

fn draw_history(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
  let tag = app.browse.history_tag.as_deref().unwrap_or("");

  let block = Block::default()
    .title(format!(" Weights — {tag} "))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(palette.dim));
  let inner = block.inner(area);
  f.render_widget(block, area);

  if app.browse.history.is_empty() {
    f.render_widget(
      Paragraph::new(Line::from(Span::styled(
        "No weight records.",
        Style::default().fg(palette.dim),
      ))),
      inner,
    );
    return;
  }

  let lines: Vec<Line> = app
    .browse
    .history
    .iter()
    .map(|entry| {
      let notes = entry.record.notes.as_deref().unwrap_or("");
      Line::from(vec![
        Span::styled(
          format!("{}  ", entry.record.recorded_at.format("%Y-%m-%d %H:%M")),
          Style::default().fg(palette.dim),
        ),
        Span::styled(
          format!("{:>7.1} kg  ", entry.record.weight),
          Style::default().fg(palette.fg).add_modifier(Modifier::BOLD),
        ),
        Span::styled(notes.to_owned(), Style::default().fg(palette.dim)),
      ])
    })
    .collect();

  f.render_widget(Paragraph::new(lines), inner);
}
