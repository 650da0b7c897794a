use std::io::{self, BufRead, Write};
use std::sync::{mpsc, Arc};
use std::thread;

use anyhow::Context;
use genmed_core::{update, AppState, Msg};
use genmed_engine::{DurableStore, EngineHandle, FileStore};
use genmed_logging::{genmed_error, genmed_info, genmed_warn};
use log::LevelFilter;

use super::config::AppConfig;
use super::effects::{EffectRunner, InboxSink};
use super::input::{self, Command};
use super::render;

/// Everything the console loop reacts to, in arrival order.
pub enum Inbox {
    Line(String),
    Msg(Msg),
    Closed,
}

pub fn run_app() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("invalid GenMed configuration")?;
    genmed_logging::initialize(config.log_destination, None, LevelFilter::Info);
    for warning in &config.warnings {
        genmed_warn!("{}", warning);
    }
    genmed_info!(
        "Starting GenMed console: api={} state_dir={:?}",
        config.client.base_url,
        config.state_dir
    );

    let store: Arc<dyn DurableStore> = Arc::new(
        FileStore::open(&config.state_dir)
            .with_context(|| format!("cannot open state directory {:?}", config.state_dir))?,
    );
    let (inbox_tx, inbox_rx) = mpsc::channel::<Inbox>();
    let engine = EngineHandle::new(
        &config.client,
        store,
        Arc::new(InboxSink::new(inbox_tx.clone())),
    )
    .context("failed to start request engine")?;
    let runner = EffectRunner::new(engine);
    spawn_stdin_reader(inbox_tx);

    // Engine threads may log to stdout; never hold its lock across the loop.
    let mut out = io::stdout();

    let mut state = AppState::new();
    if let Some(preferences) = runner.restore_preferences() {
        state = step(state, Msg::PreferencesRestored(preferences), &runner);
    }
    state.consume_dirty();
    write!(out, "{}> ", render::render(&state.view()))?;
    out.flush()?;

    while let Ok(item) = inbox_rx.recv() {
        let msg = match item {
            Inbox::Line(line) => match input::parse_command(&line, state.screen()) {
                Ok(Command::Dispatch(msg)) => msg,
                Ok(Command::Help) => {
                    write!(out, "{}\n> ", input::HELP)?;
                    out.flush()?;
                    continue;
                }
                Ok(Command::Quit) => break,
                Err(message) => {
                    write!(out, "{message}\n> ")?;
                    out.flush()?;
                    continue;
                }
            },
            Inbox::Msg(msg) => msg,
            Inbox::Closed => break,
        };

        state = step(state, msg, &runner);
        if state.consume_dirty() {
            write!(out, "\n{}> ", render::render(&state.view()))?;
            out.flush()?;
        }
    }

    genmed_info!("GenMed console closed");
    Ok(())
}

fn step(state: AppState, msg: Msg, runner: &EffectRunner) -> AppState {
    let (state, effects) = update(state, msg);
    runner.run(effects);
    state
}

fn spawn_stdin_reader(tx: mpsc::Sender<Inbox>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(Inbox::Line(line)).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    genmed_error!("Failed to read console input: {}", err);
                    break;
                }
            }
        }
        let _ = tx.send(Inbox::Closed);
    });
}
