//! Terminal capability detection and colouring

use owo_colors::{OwoColorize, colors::css};

/// Whether stdout accepts colour. Honours `NO_COLOR` and friends.
pub fn supports_color() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

/// Whether the terminal is too narrow for aligned columns (< 60 columns).
///
/// Output that is not a terminal counts as wide.
pub fn is_narrow() -> bool {
    terminal_size::terminal_size().is_some_and(|(width, _)| width.0 < 60)
}

fn paint(text: &str, style: impl FnOnce(&str) -> String) -> String {
    if supports_color() {
        style(text)
    } else {
        text.to_string()
    }
}

/// Semantic colours for report output
pub trait Colorize {
    /// Passed checks (green)
    fn success(&self) -> String;
    /// Problems (amber)
    fn warning(&self) -> String;
    /// Record and acronym keys (blue)
    fn key(&self) -> String;
    /// Secondary detail
    fn dim(&self) -> String;
}

impl<T: AsRef<str> + ?Sized> Colorize for T {
    fn success(&self) -> String {
        paint(self.as_ref(), |text| text.fg::<css::Green>().to_string())
    }

    fn warning(&self) -> String {
        paint(self.as_ref(), |text| text.fg::<css::Orange>().to_string())
    }

    fn key(&self) -> String {
        paint(self.as_ref(), |text| text.fg::<css::LightBlue>().to_string())
    }

    fn dim(&self) -> String {
        paint(self.as_ref(), |text| text.dimmed().to_string())
    }
}
