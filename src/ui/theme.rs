//! Colors and glyphs of the `sheaf` CLI
//!
//! Views never pick a color or glyph directly; they go through [`Icon`] and
//! [`ColoredText`], which read from here. Each glyph has an ASCII twin for
//! terminals without Unicode.
//!
//! [`Icon`]: crate::ui::primitives::icon::Icon
//! [`ColoredText`]: crate::ui::primitives::text::ColoredText

use crossterm::style::Color;

/// Status colors. Build output uses nothing else.
pub mod colors {
    use super::Color;

    pub const SUCCESS: Color = Color::Green;
    pub const ERROR: Color = Color::Red;
    /// Warnings and in-flight rebuilds
    pub const WARNING: Color = Color::Yellow;
    /// Command headers
    pub const INFO: Color = Color::Cyan;
    /// Labels, sizes and other secondary text
    pub const DIM: Color = Color::DarkGrey;
}

pub mod icons {
    pub const SUCCESS: &str = "✓";
    pub const ERROR: &str = "✗";
    pub const WARNING: &str = "⚠";
    pub const PROGRESS: &str = "●";
    pub const ARROW: &str = "↳";

    pub const BUILD: &str = "📦";
    pub const WATCH: &str = "⟳";
    pub const GRAPH: &str = "◇";
    pub const RESOLVE: &str = "→";
}

pub mod icons_ascii {
    pub const SUCCESS: &str = "[OK]";
    pub const ERROR: &str = "[FAIL]";
    pub const WARNING: &str = "[WARN]";
    pub const PROGRESS: &str = "[..]";
    pub const ARROW: &str = "[>]";

    pub const BUILD: &str = "[BUILD]";
    pub const WATCH: &str = "[~]";
    pub const GRAPH: &str = "[GRAPH]";
    pub const RESOLVE: &str = "[->]";
}
