use sheaf::WatchEvent;

use crate::ui::blocks::header::CommandHeader;
use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

pub fn render_watch_header(
    root: &str,
    mode: &str,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let mut header = CommandHeader::new(Icon::Watch, "Sheaf Watch");
    header.add("Root", root);
    header.add("Mode", mode);
    header.add("Hint", "Press Ctrl+C to stop");
    header.render(supports_color, supports_unicode)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    format!("{} {}", n, if n == 1 { one } else { many })
}

pub fn render_watch_event(
    timestamp: &str,
    event: &WatchEvent,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let prefix = ColoredText::dim(format!("[{}]", timestamp)).render(supports_color);
    let icon = |i: Icon| i.colored(supports_color, supports_unicode);

    match event {
        WatchEvent::WatchStarted {
            root,
            out_dir,
            livereload,
        } => {
            let mut out = format!("{} {} Watching: {} -> {}\n", prefix, icon(Icon::Watch), root, out_dir);
            if let Some(url) = livereload {
                out.push_str(&format!(
                    "{} {} Live reload: <script src=\"{}\"></script>\n",
                    prefix,
                    icon(Icon::Arrow),
                    url
                ));
            }
            out
        }
        WatchEvent::BuildStarted => format!("{} {} Building...\n", prefix, icon(Icon::Progress)),
        WatchEvent::FileChanged { path } => {
            format!("{} {} Changed: {}\n", prefix, icon(Icon::Arrow), path)
        }
        WatchEvent::RebuildStarted { files, full } => {
            let what = if *full { "full rebuild" } else { "rebuilding" };
            format!(
                "{} {} {} ({})...\n",
                prefix,
                icon(Icon::Progress),
                what,
                plural(*files, "file", "files")
            )
        }
        WatchEvent::BuildComplete {
            modules,
            assets,
            written,
            warnings,
            duration_ms,
            ..
        }
        | WatchEvent::RebuildComplete {
            modules,
            assets,
            written,
            warnings,
            duration_ms,
            ..
        } => {
            let status = if warnings.is_empty() { Icon::Success } else { Icon::Warning };
            let mut out = format!(
                "{} {} Built {} into {}, {} written in {} ms\n",
                prefix,
                icon(status),
                plural(*modules, "module", "modules"),
                plural(*assets, "file", "files"),
                written,
                duration_ms
            );
            for w in warnings {
                out.push_str(&format!("{}     {}\n", prefix, ColoredText::warning(w.as_str()).render(supports_color)));
            }
            out
        }
        WatchEvent::BuildFailed { errors } => {
            let mut out = format!(
                "{} {} Build failed with {}; keeping previous output\n",
                prefix,
                icon(Icon::Error),
                plural(errors.len(), "error", "errors")
            );
            for e in errors {
                out.push_str(&format!("{}     - {}\n", prefix, e));
            }
            out
        }
        WatchEvent::Error { message } => {
            format!("{} {} Error: {}\n", prefix, icon(Icon::Error), message)
        }
        WatchEvent::Shutdown => format!("\n{} {} Watch stopped.\n", prefix, icon(Icon::Watch)),
    }
}
