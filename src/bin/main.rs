use std::{
    fs, thread,
    time::{Duration, Instant},
};

use anyhow::Context;
use clap::Parser;
use log::{debug, info, warn};
use speedread_core::{
    PlaybackState, ReaderEngine, ReaderSettings,
    input::{InputOutcome, InputProvider},
    text::{tokenize, word_tokens},
};

use cli::Cli;
use progress::{JsonProgressStore, ProgressStore, ProgressSyncState, ReadingProgress};
use scheduler::InstantScheduler;
use stdin_input::{HELP, StdinInput};
use terminal::TerminalRenderer;

#[path = "main/cli.rs"]
mod cli;
#[path = "main/progress.rs"]
mod progress;
#[path = "main/scheduler.rs"]
mod scheduler;
#[path = "main/stdin_input.rs"]
mod stdin_input;
#[path = "main/terminal.rs"]
mod terminal;

const LINE_COLUMNS: usize = 80;
const ORP_ANCHOR_PERCENT: usize = 35;
const PROGRESS_SAVE_DEBOUNCE_MS: u64 = 1_500;
const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(20);
const RATE_REPORT_INTERVAL: Duration = Duration::from_secs(5);

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let raw = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let text = tokenize(&raw);
    let token_count = text.tokens.len();
    info!(
        "loaded {} tokens={} words={}",
        cli.input.display(),
        token_count,
        word_tokens(&text.tokens).count()
    );

    let mut store = (!cli.no_resume).then(|| JsonProgressStore::beside(&cli.input));
    let saved = restore_progress(store.as_mut(), token_count);

    let base = saved.map_or_else(ReaderSettings::default, |saved| saved.settings);
    let settings = cli.settings(base);
    let start_index = cli.start.or(saved.map(|saved| saved.index)).unwrap_or(0);

    let mut engine = ReaderEngine::with_settings(InstantScheduler::new(), settings);
    engine.load(text.tokens, start_index);

    let mut input = StdinInput::spawn().context("failed to start stdin reader")?;
    let mut renderer = TerminalRenderer::stdout();
    let mut progress_sync = ProgressSyncState::new(saved);
    eprintln!("{HELP}");

    if cli.autostart {
        engine.play();
    }

    let loop_start = Instant::now();
    let mut report_start = Instant::now();
    let mut report_words = 0u64;
    let mut last_index = engine.current_index();

    loop {
        let mut quit = false;
        while let Ok(Some(event)) = input.poll_event() {
            if engine.apply_input(event) == InputOutcome::Quit {
                quit = true;
                break;
            }
        }
        if quit {
            info!("quit requested");
            break;
        }

        let due = engine.scheduler_mut().take_due(Instant::now());
        for handle in due {
            engine.fire(handle);
        }

        let snapshot = engine.snapshot();
        renderer
            .render(&snapshot)
            .context("failed to write to terminal")?;

        if snapshot.state == PlaybackState::Playing && snapshot.current_index > last_index {
            report_words += (snapshot.current_index - last_index) as u64;
        }
        last_index = snapshot.current_index;

        let elapsed = report_start.elapsed();
        if elapsed >= RATE_REPORT_INTERVAL {
            if report_words > 0 {
                let elapsed_ms = elapsed.as_millis().max(1) as u64;
                let wpm_x100 = report_words * 6_000_000 / elapsed_ms;
                debug!(
                    "effective_wpm={}.{:02} words={} elapsed_ms={}",
                    wpm_x100 / 100,
                    wpm_x100 % 100,
                    report_words,
                    elapsed_ms
                );
            }
            report_words = 0;
            report_start = Instant::now();
        }

        if let Some(store) = store.as_mut() {
            let now_ms = loop_start.elapsed().as_millis() as u64;
            progress_sync.track_current(
                ReadingProgress {
                    index: snapshot.current_index,
                    settings: snapshot.settings,
                    token_count,
                },
                now_ms,
            );
            match progress_sync.flush_if_due(store, now_ms) {
                Ok(Some(progress)) => debug!("progress saved at token {}", progress.index + 1),
                Ok(None) => {}
                Err(err) => warn!("progress save failed: {err}"),
            }
        }

        if input.is_closed() && snapshot.state != PlaybackState::Playing {
            info!("input closed; exiting");
            break;
        }

        let sleep_for = engine
            .scheduler()
            .next_deadline()
            .map_or(INPUT_POLL_INTERVAL, |deadline| {
                deadline
                    .saturating_duration_since(Instant::now())
                    .min(INPUT_POLL_INTERVAL)
            });
        thread::sleep(sleep_for);
    }

    renderer.finish().context("failed to write to terminal")?;

    if let Some(store) = store.as_mut() {
        let now_ms = loop_start.elapsed().as_millis() as u64;
        progress_sync.track_current(
            ReadingProgress {
                index: engine.current_index(),
                settings: *engine.settings(),
                token_count,
            },
            now_ms,
        );
        match progress_sync.flush_now(store, now_ms) {
            Ok(Some(progress)) => info!(
                "progress saved to {} at token {}",
                store.path().display(),
                progress.index + 1
            ),
            Ok(None) => {}
            Err(err) => warn!("progress save failed: {err}"),
        }
    }

    engine.destroy();
    Ok(())
}

fn restore_progress(
    store: Option<&mut JsonProgressStore>,
    token_count: usize,
) -> Option<ReadingProgress> {
    let store = store?;
    match store.load() {
        Ok(Some(saved)) if saved.token_count == token_count => {
            info!(
                "progress restored from {} at token {}",
                store.path().display(),
                saved.index + 1
            );
            Some(saved)
        }
        Ok(Some(_)) => {
            info!("saved progress belongs to a different text; starting over");
            None
        }
        Ok(None) => {
            info!("no saved progress");
            None
        }
        Err(err) => {
            warn!("failed to read saved progress: {err}; starting over");
            None
        }
    }
}
