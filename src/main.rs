//! Terminal runner (default binary).
//!
//! Drives one session at a fixed tick from crossterm keyboard input. Only a
//! two-line status (score, state, chain, preview) is drawn; the board itself
//! is not rendered.

use std::io::{self, Stdout, Write};
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{
    self, DisableFocusChange, EnableFocusChange, Event, KeyEventKind, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::style::Print;
use crossterm::terminal::{
    self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use puyo_director::core::{ReferenceDirector, ScoreSink, SessionConfig, SessionSnapshot};
use puyo_director::input::{should_quit, should_restart, KeyboardSampler};

type Director = ReferenceDirector<KeyboardSampler, ScoreLine>;

/// Score display on the first terminal row.
struct ScoreLine {
    out: Stdout,
}

impl ScoreSink for ScoreLine {
    fn show_score(&mut self, score: u32) {
        let _ = queue!(
            self.out,
            MoveTo(0, 0),
            Clear(ClearType::CurrentLine),
            Print(format!("score {score:>9}"))
        );
        let _ = self.out.flush();
    }
}

fn main() -> Result<()> {
    let config = SessionConfig::from_env().context("invalid PUYO_* configuration")?;
    init_tracing(config.log_path.as_deref());

    let release_events = terminal::supports_keyboard_enhancement().unwrap_or(false);
    info!(
        tick_ms = config.tick_ms,
        ready_ticks = config.ready_ticks,
        release_events,
        "puyo-director starting"
    );
    enter(release_events)?;

    let result = run(&config, release_events);

    // Always try to restore terminal state.
    let _ = exit(release_events);

    let snapshot = result?;
    info!(score = snapshot.score, ticks = snapshot.ticks, "puyo-director exiting");
    if let Some(path) = &config.summary_path {
        let json = serde_json::to_string_pretty(&snapshot)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write summary to {}", path.display()))?;
    }
    println!("final score: {}", snapshot.score);
    Ok(())
}

fn init_tracing(log_path: Option<&Path>) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let file = log_path.and_then(|path| {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|err| eprintln!("failed to open log file {}: {err}", path.display()))
            .ok()
    });

    if let Some(file) = file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();
        return;
    }

    // Without a log file, drop logs rather than corrupting the terminal.
    tracing_subscriber::registry().with(env_filter).init();
}

fn enter(release_events: bool) -> Result<()> {
    terminal::enable_raw_mode()?;
    let mut out = io::stdout();
    execute!(
        out,
        EnterAlternateScreen,
        Hide,
        EnableFocusChange,
        Clear(ClearType::All)
    )?;
    if release_events {
        execute!(
            out,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }
    Ok(())
}

fn exit(release_events: bool) -> Result<()> {
    let mut out = io::stdout();
    if release_events {
        execute!(out, PopKeyboardEnhancementFlags)?;
    }
    execute!(out, DisableFocusChange, Show, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    Ok(())
}

fn new_session(config: &SessionConfig, release_events: bool) -> Director {
    let input = KeyboardSampler::new().with_release_events(release_events);
    let sink = ScoreLine { out: io::stdout() };
    ReferenceDirector::from_config(config, input, sink)
}

fn draw_status(director: &Director) -> Result<()> {
    let preview: String = director
        .preview()
        .iter()
        .map(|p| format!("{}{} ", p.axis.letter(), p.child.letter()))
        .collect();
    let hint = if director.is_game_over() {
        "r: restart  q: quit"
    } else {
        "arrows/wasd: move  x/z: rotate  q: quit"
    };

    let mut out = io::stdout();
    queue!(
        out,
        MoveTo(0, 1),
        Clear(ClearType::CurrentLine),
        Print(format!(
            "{:<9} chain {:>2}  next {}",
            director.state().as_str(),
            director.machine().chain_count().max(0),
            preview
        )),
        MoveTo(0, 2),
        Clear(ClearType::CurrentLine),
        Print(hint)
    )?;
    out.flush()?;
    Ok(())
}

fn run(config: &SessionConfig, release_events: bool) -> Result<SessionSnapshot> {
    let mut director = new_session(config, release_events);
    let tick_duration = Duration::from_millis(config.tick_ms as u64);
    let mut last_tick = Instant::now();

    loop {
        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Release {
                        if should_quit(key) {
                            return Ok(director.snapshot());
                        }
                        if should_restart(key) && director.is_game_over() {
                            info!(score = director.score(), "restarting session");
                            director = new_session(config, release_events);
                            continue;
                        }
                    }
                    director.input_mut().handle_event(key);
                }
                // Release events never arrive while unfocused.
                Event::FocusLost => director.input_mut().clear(),
                _ => {}
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();

            if director.ticks() == config.ready_ticks as u64 {
                director.enable_spawn(true);
            }
            director.tick();
            draw_status(&director)?;
        }
    }
}
