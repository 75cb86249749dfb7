use std::io::{self, stdout, Stdout};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use crossbeam_channel::{Receiver, TryRecvError};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::{backend::CrosstermBackend, Terminal};

use htnview::app::LogicThread;
use htnview::config::Config;
use htnview::feed::{decode_line, FeedEvent};
use htnview::render::RenderState;
use htnview::store::TreeStore;
use htnview::tree::NodeId;
use htnview::{hlog, hlog_error, ui, view, Error, Result};

const FRAME_DURATION: Duration = Duration::from_micros(16_666); // 60fps

/// htnview - live terminal viewer for HTN planner task trees
#[derive(Parser, Debug)]
#[command(name = "htnview")]
#[command(version, about, long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    HTNVIEW_DEBUG=1        Enable debug logging (alternative to --debug)\n    HTNVIEW_LOG=<level>    error, warn, info, debug or trace")]
pub struct Cli {
    /// Planner feed address (host:port), overrides the config file
    #[arg(short = 'a', long)]
    pub addr: Option<String>,

    /// Enable debug logging (writes to ~/.htnview/htnview.log)
    #[arg(short = 'd', long)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Only the TUI session writes the log. Opening it truncates the file,
    /// so one-shot commands leave a running session's log alone.
    fn owns_log_file(&self) -> bool {
        self.command.is_none()
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Print a snapshot file as an indented tree and exit
    Print {
        /// JSON file holding one snapshot (bare node or task_node_update envelope)
        file: PathBuf,

        /// Node ids to show collapsed (e.g. "Root/Cook", or "#abc-1" for a planner id)
        #[arg(long = "collapsed", value_name = "NODE_ID")]
        collapsed: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.owns_log_file() {
        if let Err(e) = htnview::log::init(cli.debug) {
            eprintln!("htnview: file logging disabled: {}", e);
        }
    }

    let mut config = Config::load()?;
    if let Some(addr) = cli.addr {
        config.addr = Some(addr);
        config.validate()?;
    }

    if let Some(Command::Print { file, collapsed }) = cli.command {
        return run_print(&file, &collapsed, config.indent_width());
    }

    hlog!("htnview starting, feed={}", config.effective_addr());

    let shutdown = Arc::new(AtomicBool::new(false));
    let (state_tx, state_rx) = crossbeam_channel::bounded::<RenderState>(1);

    let shutdown_clone = shutdown.clone();
    let logic_handle =
        thread::spawn(move || LogicThread::run(config, state_tx, shutdown_clone));

    let mut terminal = setup_terminal()?;
    let result = render_loop(&mut terminal, state_rx, &shutdown);

    shutdown.store(true, Ordering::SeqCst);
    let logic_result = logic_handle.join();
    restore_terminal(&mut terminal)?;
    hlog!("htnview stopped");

    result?;
    if let Ok(Err(e)) = logic_result {
        hlog_error!("Logic thread failed: {}", e);
        return Err(e);
    }
    Ok(())
}

/// Decode one snapshot from `file` and print it without starting the TUI.
fn run_print(file: &Path, collapsed: &[String], indent: usize) -> Result<()> {
    let content = std::fs::read_to_string(file)?;

    let snapshot = match decode_line(&content) {
        Some(FeedEvent::Snapshot(node)) => node,
        Some(FeedEvent::Malformed(reason)) => return Err(Error::MalformedSnapshot(reason)),
        Some(FeedEvent::Ignored(event)) => {
            return Err(Error::MalformedSnapshot(format!(
                "expected a task_node_update, got '{}'",
                event
            )))
        }
        None => None,
    };

    let mut store = TreeStore::new();
    store.apply_snapshot(snapshot);
    for id in collapsed {
        store.set_expanded(&NodeId::from(id.as_str()), false);
    }

    print!("{}", view::render_text(&store, indent));
    Ok(())
}

fn render_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    state_rx: Receiver<RenderState>,
    shutdown: &AtomicBool,
) -> Result<()> {
    let mut state = RenderState::default();
    let mut last_version: u64 = 0;
    let mut last_frame = Instant::now();
    let mut dirty = true;

    loop {
        if shutdown.load(Ordering::Relaxed) {
            break;
        }

        match state_rx.try_recv() {
            Ok(s) => {
                dirty = dirty || s.version != last_version;
                state = s;
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => break,
        }

        if last_frame.elapsed() < FRAME_DURATION {
            thread::sleep(Duration::from_micros(500));
            continue;
        }
        last_frame = Instant::now();

        if dirty {
            terminal.draw(|f| ui::draw(f, &state))?;
            last_version = state.version;
            dirty = false;
        }
    }

    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.hide_cursor()?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    terminal.show_cursor()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(disable_raw_mode()?)
}
