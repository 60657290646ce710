use sheaf::domain::entities::{ChunkKind, DependencyKind};
use sheaf::GraphReport;

use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::{format_size, ColoredText};

fn chunk_kind(kind: ChunkKind) -> &'static str {
    match kind {
        ChunkKind::Entry => "entry",
        ChunkKind::Shared => "shared",
        ChunkKind::Async => "async",
    }
}

pub fn render_graph(report: &GraphReport, supports_color: bool, supports_unicode: bool) -> String {
    let heading = |text: String| ColoredText::info(text).bold().render(supports_color);
    let mut out = String::new();

    out.push_str(&format!(
        "{} {}\n",
        Icon::Graph.colored(supports_color, supports_unicode),
        heading(format!("Entries ({})", report.entries.len()))
    ));
    for (name, module) in &report.entries {
        out.push_str(&format!("  {} {}\n", name, ColoredText::dim(module.as_str()).render(supports_color)));
    }

    out.push_str(&format!("\n{}\n", heading(format!("Modules ({})", report.modules.len()))));
    for m in &report.modules {
        out.push_str(&format!(
            "  {}  {}\n",
            m.name,
            ColoredText::dim(format!("{} {}", m.module_type, format_size(m.size))).render(supports_color)
        ));
        for e in report.edges.iter().filter(|e| e.from == m.name) {
            let arrow = Icon::Arrow.colored(supports_color, supports_unicode);
            let split = match e.kind {
                DependencyKind::Async => " (async)",
                DependencyKind::Static => "",
            };
            out.push_str(&format!("    {} {}{}\n", arrow, e.to, split));
        }
    }

    out.push_str(&format!("\n{}\n", heading(format!("Chunks ({})", report.chunks.len()))));
    for c in &report.chunks {
        out.push_str(&format!(
            "  {} {}\n",
            c.name,
            ColoredText::dim(format!("[{}] {} modules", chunk_kind(c.kind), c.modules.len()))
                .render(supports_color)
        ));
        for m in &c.modules {
            out.push_str(&format!("    {}\n", m));
        }
    }

    if !report.diagnostics.is_empty() {
        out.push('\n');
        for d in &report.diagnostics {
            out.push_str(&format!(
                "{} {}\n",
                Icon::Warning.colored(supports_color, supports_unicode),
                d
            ));
        }
    }
    out
}
