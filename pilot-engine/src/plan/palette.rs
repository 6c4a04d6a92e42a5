//! Optional terminal colours for plan output

use colored::{Color, Colorize};

/// Applies colours when enabled, passes text through otherwise
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn plain() -> Self {
        Self::new(false)
    }

    pub fn paint(&self, text: &str, color: Color) -> String {
        if self.enabled {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn bold(&self, text: &str) -> String {
        if self.enabled {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn paint_bold(&self, text: &str, color: Color) -> String {
        if self.enabled {
            text.color(color).bold().to_string()
        } else {
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_passes_through() {
        let palette = Palette::plain();
        assert_eq!(palette.paint("+", Color::Green), "+");
        assert_eq!(palette.paint_bold("Job: \"web\"", Color::Yellow), "Job: \"web\"");
    }

    #[test]
    fn test_enabled_wraps_in_escape_codes() {
        colored::control::set_override(true);
        let painted = Palette::new(true).paint("+", Color::Green);
        assert!(painted.starts_with("\u{1b}["));
        assert!(painted.contains('+'));
    }
}
