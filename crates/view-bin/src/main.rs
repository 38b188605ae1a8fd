//! oxview entrypoint.
use anyhow::Result;
use clap::Parser;
use core_terminal::{CrosstermBackend, TerminalBackend};
use crossterm::event::{self, Event};
use std::io::{BufWriter, stdout};
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

mod app;
mod document;
mod search;
mod symbols;
mod tree;

use app::{App, Flow};
use document::Document;
use tree::FileTree;

const LOG_FILE: &str = "oxview.log";

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "oxview", version, about = "Terminal pager with sticky scope headers")]
struct Args {
    /// File or directory to open; a directory opens with an empty text pane.
    #[arg(default_value = ".")]
    pub path: PathBuf,
    /// Optional configuration file path (overrides discovery of `viewer.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Treat the input as a diff-annotated block.
    #[arg(long = "diff")]
    pub diff: bool,
    /// Working file a diff block was rendered from; supplies sticky scopes.
    #[arg(long = "source", requires = "diff")]
    pub source: Option<PathBuf>,
    /// Start with soft wrap on regardless of the config file.
    #[arg(long = "wrap")]
    pub wrap: bool,
}

struct AppStartup {
    backend: CrosstermBackend,
    log_guard: Option<WorkerGuard>,
}

impl AppStartup {
    fn new() -> Self {
        Self {
            backend: CrosstermBackend::new(),
            log_guard: None,
        }
    }

    fn configure_logging(&mut self) -> Result<()> {
        let log_dir = Path::new(".");
        let log_path = log_dir.join(LOG_FILE);
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }

        let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
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
                core_terminal::restore();
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }
}

/// Resolve the starting document and the directory listing beside it.
fn open_initial(args: &Args) -> Result<(Document, String, Option<FileTree>)> {
    if args.path.is_dir() {
        let dir = std::fs::canonicalize(&args.path).unwrap_or_else(|_| args.path.clone());
        let tree = FileTree::open(&dir)?;
        return Ok((Document::default(), String::new(), Some(tree)));
    }
    let (doc, rendered) = Document::load(&args.path, args.diff, args.source.as_deref())?;
    let dir = args
        .path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let tree = std::fs::canonicalize(dir)
        .ok()
        .and_then(|dir| FileTree::open(&dir).ok());
    Ok((doc, rendered, tree))
}

fn run(mut app: App) -> Result<()> {
    let mut out = BufWriter::new(stdout());
    let mut dirty = true;
    loop {
        if dirty {
            app.draw(&mut out)?;
            dirty = false;
        }
        let flow = match event::read()? {
            Event::Key(key) => app.handle_key(key),
            Event::Mouse(mouse) => app.handle_mouse(mouse),
            Event::Resize(cols, rows) => {
                app.resize(cols as usize, rows as usize);
                Flow::Continue
            }
            _ => continue,
        };
        if flow == Flow::Quit {
            info!(target: "runtime", "quit");
            return Ok(());
        }
        dirty = true;
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut startup = AppStartup::new();
    startup.configure_logging()?;
    AppStartup::install_panic_hook();
    info!(target: "runtime", path = %args.path.display(), diff = args.diff, "startup");

    let mut config = core_config::load_from(args.config.clone())?;
    if args.wrap {
        config.file.view.wrap = true;
    }
    let (doc, rendered, tree) = open_initial(&args)?;

    startup.backend.set_title("oxview")?;
    let mut guard = startup.backend.enter_guard()?;
    let (cols, rows) = guard.backend().size()?;
    let app = App::new(config, doc, rendered, tree, cols as usize, rows as usize);
    let result = run(app);
    drop(guard);
    if let Err(e) = &result {
        tracing::error!(target: "runtime", error = %format!("{e:#}"), "run_failed");
    }
    result
}
