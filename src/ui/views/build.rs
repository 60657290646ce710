use sheaf::application::BuildReport;
use sheaf::domain::entities::AssetKind;

use crate::ui::blocks::header::CommandHeader;
use crate::ui::blocks::warning::WarningBlock;
use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::{format_size, ColoredText};

pub fn render_build_header(
    root: &str,
    out_dir: &str,
    mode: &str,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let mut header = CommandHeader::new(Icon::Build, "Sheaf Build");
    header.add("Root", root);
    header.add("Output", out_dir);
    header.add("Mode", mode);
    header.render(supports_color, supports_unicode)
}

fn kind_label(kind: AssetKind) -> &'static str {
    match kind {
        AssetKind::Script => "script",
        AssetKind::Stylesheet => "style",
        AssetKind::Resource => "resource",
        AssetKind::Copy => "copy",
        AssetKind::SourceMap => "map",
    }
}

/// Summary line, one row per emitted file, then warnings.
pub fn render_build_report(report: &BuildReport, supports_color: bool, supports_unicode: bool) -> String {
    let mut out = String::new();
    let files = if report.assets.len() == 1 { "file" } else { "files" };
    out.push_str(&format!(
        "{} Built {} modules into {} {} ({}) in {} ms\n",
        Icon::Success.colored(supports_color, supports_unicode),
        report.modules,
        report.assets.len(),
        files,
        format_size(report.total_size()),
        report.duration_ms
    ));

    let width = report.assets.iter().map(|a| a.path.len()).max().unwrap_or(0);
    for asset in &report.assets {
        let path = format!("{:<width$}", asset.path, width = width);
        out.push_str(&format!(
            "  {}  {:>10}  {}\n",
            ColoredText::info(path).render(supports_color),
            format_size(asset.size),
            ColoredText::dim(format!("{} {}", kind_label(asset.kind), asset.logical_name))
                .render(supports_color)
        ));
    }

    let warnings: Vec<String> = report
        .diagnostics
        .iter()
        .map(|d| d.to_string())
        .chain(report.warnings.iter().map(|w| w.to_string()))
        .collect();
    if !warnings.is_empty() {
        let noun = if warnings.len() == 1 { "warning" } else { "warnings" };
        let mut block = WarningBlock::new(format!("{} {}", warnings.len(), noun));
        for w in warnings {
            block.add_line(w);
        }
        out.push_str(&block.render(supports_color, supports_unicode));
    }
    out
}
