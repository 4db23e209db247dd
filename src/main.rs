mod app;
mod config;
mod deck;
mod gemini;
mod logging;
mod panels;
mod templates;
mod ui;

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{Event, KeyCode, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{DefaultTerminal, Terminal};
use tracing::{debug, info, warn};

use crate::app::App;
use crate::deck::Deck;
use crate::gemini::GeminiClient;
use crate::panels::PanelKind;

/// Terminal slideshow with Gemini-assisted snippet and palette panels.
#[derive(Debug, Parser)]
#[command(name = "dais", version, about)]
struct Cli {
    /// Deck file to present (overrides the configured path)
    deck: Option<PathBuf>,
    /// Model identifier to use for generation
    #[arg(long)]
    model: Option<String>,
}

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();

    let loaded = config::load_config();
    let mut config = loaded.config.clone();
    if let Some(model) = cli.model {
        config.api.model = model;
    }

    // Initialize logging before the terminal takes over the screen
    let (session_id, _guard) = match logging::init(&config.logging.level) {
        Ok(ctx) => {
            logging::cleanup_old_logs(&ctx.log_directory);
            (Some(ctx.session_id), Some(ctx._guard))
        }
        Err(e) => {
            eprintln!("Warning: Failed to initialize logging: {}", e);
            (None, None)
        }
    };

    debug!(
        config_path = %loaded.config_path.display(),
        status = ?loaded.status,
        "config_loaded"
    );
    if config.api.key.is_empty() {
        warn!("No API key configured; generation requests will be rejected by the service");
    }

    let deck_path = cli.deck.unwrap_or_else(|| config.deck_path());
    let deck = match Deck::load(&deck_path) {
        Ok(deck) => {
            info!(path = %deck_path.display(), slides = deck.slide_count(), "deck_loaded");
            deck
        }
        Err(e) => {
            warn!(path = %deck_path.display(), error = %e, "deck_unavailable_using_builtin");
            Deck::fallback()
        }
    };

    let client = GeminiClient::new(
        config.api.base_url.clone(),
        config.api.model.clone(),
        config.api.key.clone(),
    );
    let runtime = tokio::runtime::Runtime::new()?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let terminal = Terminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;

    let result = run_app(terminal, App::new(deck, client, runtime.handle().clone()));

    // Restore terminal
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;

    // Log session end
    if let Some(sid) = session_id {
        let duration = start_time.elapsed();
        info!(
            session_id = %sid,
            duration_secs = duration.as_secs_f64(),
            "session_end"
        );
    }

    result
}

fn run_app(mut terminal: DefaultTerminal, mut app: App) -> Result<()> {
    loop {
        // Apply any generations that completed since the last frame
        app.poll_generations();

        // Draw UI
        terminal.draw(|f| ui::draw_ui(f, &app))?;

        // Poll for events with a short timeout so completed requests render
        // without a keypress
        if !crossterm::event::poll(Duration::from_millis(50))? {
            continue;
        }
        let Event::Key(key) = crossterm::event::read()? else {
            continue;
        };

        if let Some(kind) = app.focused_panel {
            // Keys go to the focused panel; slide navigation resumes on close
            match key.code {
                KeyCode::Esc => {
                    app.focused_panel = None;
                }
                KeyCode::Enter => {
                    app.trigger_generation(kind);
                }
                KeyCode::Backspace => {
                    app.panel_mut(kind).input.pop();
                }
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    app.panel_mut(kind).input.push(c);
                }
                _ => {}
            }
        } else {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    return Ok(());
                }
                KeyCode::Left | KeyCode::Char('h') => {
                    app.deck.jump_previous();
                }
                KeyCode::Right | KeyCode::Char('l') => {
                    app.deck.jump_next();
                }
                KeyCode::Char('c') => {
                    app.toggle_panel(PanelKind::Code);
                }
                KeyCode::Char('p') => {
                    app.toggle_panel(PanelKind::Palette);
                }
                _ => {}
            }
        }
    }
}
