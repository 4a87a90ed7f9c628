//! Form panes — the Register and Weigh tabs.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use crate::{app::Form, theme::Palette};

/// Render `form` into `area`, one line per field, focused field marked.
pub fn draw(f: &mut Frame, area: Rect, form: &Form, title: &str, palette: &Palette) {
  let block = Block::default()
    .title(format!(" {title} "))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(palette.dim));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let label_width = form
    .fields
    .iter()
    .map(|field| field.label.len())
    .max()
    .unwrap_or(0);

  let mut lines = Vec::with_capacity(form.fields.len() * 2);
  for (i, field) in form.fields.iter().enumerate() {
    let focused = i == form.focus;

    let marker = if focused { "› " } else { "  " };
    let label_style = if focused {
      Style::default()
        .fg(palette.accent)
        .add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(palette.dim)
    };
    // Trailing cursor on the focused field.
    let value = if focused {
      format!("{}_", field.value)
    } else {
      field.value.clone()
    };

    lines.push(Line::from(vec![
      Span::styled(format!("{marker}{:<label_width$}  ", field.label), label_style),
      Span::styled(value, Style::default().fg(palette.fg)),
    ]));
    lines.push(Line::default());
  }

  f.render_widget(Paragraph::new(lines), inner);
}
