//! termwin entrypoint: a small pager built on the window engine.
use anyhow::Result;
use clap::Parser;
use core_controller::WindowController;
use core_events::KeyCode;
use core_layout::{Dim, Rect};
use core_terminal::{CrosstermBackend, Terminal};
use core_window::{TextWindow, Window};
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;

const WELCOME: &str = "Welcome to termwin.\n\
\n\
Pass one or more file paths to page through them.\n\
\n\
Press ? for help or Esc to quit.";

const HELP: &str = "Keys\n\
\n\
Up / Down        scroll one line\n\
PgUp / PgDn      scroll one page\n\
?                this help\n\
Enter            list opened files\n\
Esc              close the top window\n\
Ctrl-C           quit";

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "termwin", version, about = "Terminal text pager")]
struct Args {
    /// Files to show. If omitted a welcome text is used.
    pub paths: Vec<PathBuf>,
    /// Title of the main window (defaults to the first file name).
    #[arg(long)]
    pub title: Option<String>,
    /// Optional configuration file path (overrides discovery of `termwin.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Column of the main window: cells (`4`) or a fraction (`0.25`).
    #[arg(long, value_parser = parse_dim)]
    pub x: Option<Dim>,
    /// Row of the main window: cells or a fraction.
    #[arg(long, value_parser = parse_dim)]
    pub y: Option<Dim>,
}

fn parse_dim(s: &str) -> Result<Dim, String> {
    if s.contains('.') {
        let f: f64 = s.parse().map_err(|e| format!("invalid fraction `{s}`: {e}"))?;
        if !(0.0..=1.0).contains(&f) {
            return Err(format!("fraction `{s}` must be within 0.0..=1.0"));
        }
        Ok(Dim::Fraction(f))
    } else {
        let n: i32 = s.parse().map_err(|e| format!("invalid cell count `{s}`: {e}"))?;
        if n < 0 {
            return Err(format!("cell count `{s}` must not be negative"));
        }
        Ok(Dim::Cells(n))
    }
}

/// Outcome of reading one file named on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum FileSummary {
    Read { name: String, lines: usize, bytes: usize },
    Failed { name: String, reason: String },
}

impl FileSummary {
    fn describe(&self) -> String {
        match self {
            Self::Read { name, lines, bytes } => format!("{name}: {lines} lines, {bytes} bytes"),
            Self::Failed { name, reason } => format!("{name}: unreadable ({reason})"),
        }
    }
}

#[derive(Debug, Default)]
struct Documents {
    text: String,
    files: Vec<FileSummary>,
}

impl Documents {
    fn load(paths: &[PathBuf]) -> Self {
        if paths.is_empty() {
            return Self {
                text: WELCOME.to_string(),
                files: Vec::new(),
            };
        }
        let mut docs = Self::default();
        for path in paths {
            let name = path.display().to_string();
            match std::fs::read_to_string(path) {
                Ok(content) => {
                    let lines = content.lines().count();
                    tracing::debug!(
                        target: "io",
                        file = %path.display(),
                        size_bytes = content.len(),
                        line_count = lines,
                        "file_read_ok"
                    );
                    if !docs.text.is_empty() && !docs.text.ends_with('\n') {
                        docs.text.push('\n');
                    }
                    docs.text.push_str(&content);
                    docs.files.push(FileSummary::Read {
                        name,
                        lines,
                        bytes: content.len(),
                    });
                }
                Err(e) => {
                    error!(target: "io", file = %path.display(), ?e, "file_open_error");
                    docs.files.push(FileSummary::Failed {
                        name,
                        reason: e.to_string(),
                    });
                }
            }
        }
        docs
    }

    fn summary(&self) -> String {
        if self.files.is_empty() {
            return "No files opened.".to_string();
        }
        self.files
            .iter()
            .map(FileSummary::describe)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn default_title(args: &Args) -> String {
    if let Some(title) = &args.title {
        return title.clone();
    }
    args.paths
        .first()
        .and_then(|p| p.file_name())
        .and_then(|s| s.to_str())
        .unwrap_or("termwin")
        .to_string()
}

/// Main pager window with `?` (help) and Enter (file summary) modals bound.
fn main_window(args: &Args, docs: &Documents, bounds: Rect) -> TextWindow {
    let mut builder = Window::builder().title(default_title(args));
    if let Some(x) = args.x {
        builder = builder.x(x);
    }
    if let Some(y) = args.y {
        builder = builder.y(y);
    }
    let mut window = builder.build(bounds);

    window.bind_child(KeyCode::Char('?'), move || {
        TextWindow::new(HELP, Window::new("Help", bounds)).into()
    });
    let summary = docs.summary();
    window.bind_child(KeyCode::Enter, move || {
        TextWindow::new(summary.clone(), Window::new("Files", bounds)).into()
    });
    TextWindow::new(docs.text.clone(), window)
}

struct AppStartup {
    log_guard: Option<WorkerGuard>,
}

impl AppStartup {
    fn new() -> Self {
        Self { log_guard: None }
    }

    fn configure_logging(&mut self) -> Result<()> {
        let log_dir = Path::new(".");
        let log_path = log_dir.join("termwin.log");
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }

        let file_appender = tracing_appender::rolling::never(log_dir, "termwin.log");
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        if tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(nb_writer)
            .with_ansi(false)
            .try_init()
            .is_ok()
        {
            self.log_guard = Some(guard);
        }
        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut startup = AppStartup::new();
    startup.configure_logging()?;
    AppStartup::install_panic_hook();
    info!(target: "runtime", "startup");

    let config = core_config::load_from(args.config.clone())?;
    let docs = Documents::load(&args.paths);
    info!(
        target: "runtime.startup",
        files = docs.files.len(),
        text_bytes = docs.text.len(),
        config_override = args.config.is_some(),
        config_source = ?config.source,
        "bootstrap_complete"
    );

    let mut backend = CrosstermBackend::new();
    backend.set_title("termwin")?;
    let (columns, rows) = backend.size()?;
    let mut controller = WindowController::with_config(backend, config.controller())?;
    controller.push(main_window(&args, &docs, Rect::screen(columns, rows)));
    controller.run()?;

    info!(target: "runtime", "shutdown");
    drop(startup.log_guard.take());
    Ok(())
}
