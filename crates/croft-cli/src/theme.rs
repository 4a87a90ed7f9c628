//! Light/dark theme preference with on-disk persistence.
//!
//! The preference is a single process-local cell: initialised from the
//! preference file once at startup (a missing or unreadable file means
//! light mode), and written through on every toggle.

use std::{fs, io, path::PathBuf};

use ratatui::style::Color;

// ─── Theme ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
  #[default]
  Light,
  Dark,
}

impl Theme {
  fn as_str(self) -> &'static str {
    match self {
      Self::Light => "light",
      Self::Dark => "dark",
    }
  }

  fn parse(s: &str) -> Option<Self> {
    match s.trim() {
      "light" => Some(Self::Light),
      "dark" => Some(Self::Dark),
      _ => None,
    }
  }

  pub fn toggled(self) -> Self {
    match self {
      Self::Light => Self::Dark,
      Self::Dark => Self::Light,
    }
  }

  /// Colors used by all panes for the given theme.
  pub fn palette(self) -> Palette {
    match self {
      Self::Light => Palette {
        bg:           Color::White,
        fg:           Color::Black,
        accent:       Color::Blue,
        dim:          Color::Gray,
        highlight_bg: Color::Blue,
        highlight_fg: Color::White,
      },
      Self::Dark => Palette {
        bg:           Color::Black,
        fg:           Color::White,
        accent:       Color::Cyan,
        dim:          Color::DarkGray,
        highlight_bg: Color::Cyan,
        highlight_fg: Color::Black,
      },
    }
  }
}

/// The handful of colors every pane draws with.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
  pub bg:           Color,
  pub fg:           Color,
  pub accent:       Color,
  pub dim:          Color,
  pub highlight_bg: Color,
  pub highlight_fg: Color,
}

// ─── Preference cell ─────────────────────────────────────────────────────────

/// The persisted preference: current theme plus the file it lives in.
#[derive(Debug)]
pub struct ThemePreference {
  theme: Theme,
  path:  PathBuf,
}

impl ThemePreference {
  /// Initialise from `path`. Anything other than a readable file holding a
  /// known theme name falls back to the default.
  pub fn load(path: PathBuf) -> Self {
    let theme = fs::read_to_string(&path)
      .ok()
      .and_then(|raw| Theme::parse(&raw))
      .unwrap_or_default();
    Self { theme, path }
  }

  pub fn theme(&self) -> Theme {
    self.theme
  }

  /// Flip the theme and write the new value through to disk.
  pub fn toggle(&mut self) -> io::Result<()> {
    self.theme = self.theme.toggled();
    if let Some(parent) = self.path.parent() {
      fs::create_dir_all(parent)?;
    }
    fs::write(&self.path, self.theme.as_str())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("croft-theme-{}-{name}", std::process::id()))
  }

  #[test]
  fn missing_file_defaults_to_light() {
    let pref = ThemePreference::load(scratch_path("missing"));
    assert_eq!(pref.theme(), Theme::Light);
  }

  #[test]
  fn garbage_file_defaults_to_light() {
    let path = scratch_path("garbage");
    fs::write(&path, "solarized??").unwrap();
    let pref = ThemePreference::load(path.clone());
    assert_eq!(pref.theme(), Theme::Light);
    fs::remove_file(path).ok();
  }

  #[test]
  fn toggle_writes_through_and_reloads() {
    let path = scratch_path("toggle");
    fs::remove_file(&path).ok();

    let mut pref = ThemePreference::load(path.clone());
    pref.toggle().unwrap();
    assert_eq!(pref.theme(), Theme::Dark);

    // A fresh cell sees the persisted value.
    let reloaded = ThemePreference::load(path.clone());
    assert_eq!(reloaded.theme(), Theme::Dark);

    pref.toggle().unwrap();
    let reloaded = ThemePreference::load(path.clone());
    assert_eq!(reloaded.theme(), Theme::Light);

    fs::remove_file(path).ok();
  }
}
