use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::Sender;
use crossterm::event::{self, Event};
use tokio::runtime::Runtime;
use tokio::sync::mpsc;

use crate::actors::{ActorHandle, FeedActor};
use crate::config::Config;
use crate::render::RenderState;
use crate::tea::{update, Command, Message, Model};
use crate::{hlog, hlog_debug, Result};

const MAX_BG_MESSAGES: usize = 50;

/// Owns the model and runs every state transition.
///
/// Keyboard input is polled here directly; feed traffic arrives from the
/// feed actor over an mpsc channel. After each batch the model is
/// snapshotted to the render thread.
pub struct LogicThread;

impl LogicThread {
    pub fn run(
        config: Config,
        state_tx: Sender<RenderState>,
        shutdown: Arc<AtomicBool>,
    ) -> Result<()> {
        Runtime::new()?.block_on(Self::run_async(config, state_tx, shutdown))
    }

    async fn run_async(
        config: Config,
        state_tx: Sender<RenderState>,
        shutdown: Arc<AtomicBool>,
    ) -> Result<()> {
        hlog_debug!(
            "LogicThread::run_async addr={} reconnect={:?}",
            config.effective_addr(),
            config.reconnect_interval()
        );
        let (msg_tx, mut msg_rx) = mpsc::unbounded_channel::<Message>();
        let feed = FeedActor::new(config.effective_addr(), msg_tx.clone())
            .with_reconnect_interval(config.reconnect_interval())
            .spawn();
        let mut model = Model::new(config);

        send_state(&state_tx, &model);

        loop {
            if shutdown.load(Ordering::Relaxed) {
                break;
            }

            // Keyboard input (priority)
            while event::poll(Duration::ZERO)? {
                let msg = match event::read()? {
                    Event::Key(key) => Message::Key(key),
                    Event::Resize(w, h) => Message::Resize(w, h),
                    _ => continue,
                };
                if apply(&mut model, msg) {
                    shutdown.store(true, Ordering::Relaxed);
                    return stop(&feed);
                }
                if model.dirty {
                    send_state(&state_tx, &model);
                    model.dirty = false;
                }
            }

            // Feed messages (bounded)
            for _ in 0..MAX_BG_MESSAGES {
                let Ok(msg) = msg_rx.try_recv() else { break };
                if apply(&mut model, msg) {
                    shutdown.store(true, Ordering::Relaxed);
                    return stop(&feed);
                }
            }

            if model.dirty {
                send_state(&state_tx, &model);
                model.dirty = false;
            }

            tokio::time::sleep(Duration::from_micros(500)).await;
        }

        stop(&feed)
    }
}

/// Run one message through `update` and its commands. Returns true on quit.
fn apply(model: &mut Model, msg: Message) -> bool {
    update(model, msg)
        .into_iter()
        .any(execute_command)
}

fn execute_command(cmd: Command) -> bool {
    match cmd {
        Command::Quit => {
            hlog_debug!("Command::Quit");
            true
        }
    }
}

fn stop(feed: &ActorHandle) -> Result<()> {
    hlog!("Shutting down feed");
    feed.shutdown();
    Ok(())
}

fn send_state(state_tx: &Sender<RenderState>, model: &Model) {
    let _ = state_tx.try_send(model.snapshot());
}
