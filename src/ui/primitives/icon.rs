use crossterm::style::Stylize;

use crate::ui::theme::{colors, icons, icons_ascii};

/// Status and command glyphs used in build and watch output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Success,
    Error,
    Warning,
    /// A rebuild in flight
    Progress,
    /// Indents a detail line under the line above it
    Arrow,
    Build,
    Watch,
    Graph,
    Resolve,
}

impl Icon {
    /// `(unicode, ascii)` forms
    fn glyphs(self) -> (&'static str, &'static str) {
        match self {
            Icon::Success => (icons::SUCCESS, icons_ascii::SUCCESS),
            Icon::Error => (icons::ERROR, icons_ascii::ERROR),
            Icon::Warning => (icons::WARNING, icons_ascii::WARNING),
            Icon::Progress => (icons::PROGRESS, icons_ascii::PROGRESS),
            Icon::Arrow => (icons::ARROW, icons_ascii::ARROW),
            Icon::Build => (icons::BUILD, icons_ascii::BUILD),
            Icon::Watch => (icons::WATCH, icons_ascii::WATCH),
            Icon::Graph => (icons::GRAPH, icons_ascii::GRAPH),
            Icon::Resolve => (icons::RESOLVE, icons_ascii::RESOLVE),
        }
    }

    pub fn render(&self, supports_unicode: bool) -> &'static str {
        let (unicode, ascii) = self.glyphs();
        if supports_unicode {
            unicode
        } else {
            ascii
        }
    }

    pub fn colored(&self, supports_color: bool, supports_unicode: bool) -> String {
        let glyph = self.render(supports_unicode);
        if !supports_color {
            return glyph.to_string();
        }
        let color = match self {
            Icon::Success => colors::SUCCESS,
            Icon::Error => colors::ERROR,
            Icon::Warning | Icon::Progress => colors::WARNING,
            Icon::Arrow => colors::DIM,
            Icon::Build | Icon::Watch | Icon::Graph | Icon::Resolve => colors::INFO,
        };
        format!("{}", glyph.with(color))
    }
}
