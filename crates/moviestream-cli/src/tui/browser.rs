//! Catalog browser TUI main loop.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use moviestream_api::catalog::Category;
use moviestream_api::tmdb::TmdbApi;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::state::{BrowserState, DialogFocus, InputMode};
use super::ui::{self, Screen};
use crate::browse::{BrowseRuntime, Message, RuntimeSettings};

/// Rows moved by PageUp/PageDown.
const PAGE_SIZE: usize = 10;

/// Interval of the blocking input poll.
const INPUT_POLL: Duration = Duration::from_millis(100);

/// What the event loop should do after a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Keep running.
    Continue,
    /// Leave the browser.
    Quit,
    /// Hand the address to the system browser.
    Open(String),
}

/// Runs the catalog browser until the user quits.
///
/// `api` is `None` when no API key is configured; the browser then shows
/// the missing-key error instead of results.
///
/// # Errors
///
/// Returns an error if terminal setup or event handling fails.
pub async fn run_browser<A>(api: Option<Arc<A>>, settings: RuntimeSettings) -> Result<()>
where
    A: TmdbApi + Send + Sync + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut runtime = BrowseRuntime::new(api, settings, tx);
    runtime.start();

    let (key_tx, mut key_rx) = mpsc::unbounded_channel();
    spawn_input_reader(key_tx);

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let mut state = BrowserState::new();

    let result = run_event_loop(
        &mut terminal,
        &mut runtime,
        &mut state,
        &mut rx,
        &mut key_rx,
    )
    .await;

    // Cleanup (always attempt even if event loop failed)
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;

    result
}

/// Reads terminal events on a blocking thread and forwards key presses.
fn spawn_input_reader(tx: UnboundedSender<KeyEvent>) {
    std::thread::spawn(move || {
        while !tx.is_closed() {
            match event::poll(INPUT_POLL) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => {
                        if tx.send(key).is_err() {
                            break;
                        }
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!("failed to read terminal event: {e}");
                        break;
                    }
                },
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!("failed to poll terminal events: {e}");
                    break;
                }
            }
        }
    });
}

/// Main event loop.
async fn run_event_loop<A>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    runtime: &mut BrowseRuntime<A>,
    state: &mut BrowserState,
    rx: &mut UnboundedReceiver<Message>,
    keys: &mut UnboundedReceiver<KeyEvent>,
) -> Result<()>
where
    A: TmdbApi + Send + Sync + 'static,
{
    loop {
        state.clamp(runtime.controller().items().len());
        let location = runtime.location();
        let screen = Screen {
            controller: runtime.controller(),
            player: runtime.player(),
            location: &location,
        };
        terminal
            .draw(|frame| ui::draw(frame, screen, state))
            .context("failed to draw TUI")?;

        tokio::select! {
            Some(message) = rx.recv() => runtime.handle(message),
            key = keys.recv() => {
                let Some(key) = key else {
                    return Ok(());
                };
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match handle_key(runtime, state, key.code, key.modifiers) {
                    KeyOutcome::Continue => {}
                    KeyOutcome::Quit => return Ok(()),
                    KeyOutcome::Open(url) => open_in_browser(state, &url),
                }
            }
        }
    }
}

fn open_in_browser(state: &mut BrowserState, url: &str) {
    match open::that(url) {
        Ok(()) => {
            tracing::info!(url, "opened stream in browser");
            state.status = Some(format!("Opened {url}"));
        }
        Err(e) => {
            tracing::warn!(url, "failed to open browser: {e}");
            state.status = Some(String::from("Failed to open browser"));
        }
    }
}

/// Dispatches one key press to the active input handler.
pub fn handle_key<A>(
    runtime: &mut BrowseRuntime<A>,
    state: &mut BrowserState,
    key: KeyCode,
    modifiers: KeyModifiers,
) -> KeyOutcome
where
    A: TmdbApi + Send + Sync + 'static,
{
    if key == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        return KeyOutcome::Quit;
    }
    if runtime.player().is_some() {
        return handle_dialog_input(runtime, state, key);
    }
    match state.input_mode {
        InputMode::Search => {
            handle_search_input(runtime, state, key);
            KeyOutcome::Continue
        }
        InputMode::Normal => handle_normal_input(runtime, state, key),
    }
}

/// Handles key input in search mode.
fn handle_search_input<A>(runtime: &mut BrowseRuntime<A>, state: &mut BrowserState, key: KeyCode)
where
    A: TmdbApi + Send + Sync + 'static,
{
    match key {
        KeyCode::Esc => {
            runtime.set_search(String::new());
            state.reset_cursor();
            state.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            state.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            runtime.pop_search_char();
            state.reset_cursor();
        }
        KeyCode::Char(c) => {
            runtime.push_search_char(c);
            state.reset_cursor();
        }
        _ => {}
    }
}

/// Handles key input in normal mode.
fn handle_normal_input<A>(
    runtime: &mut BrowseRuntime<A>,
    state: &mut BrowserState,
    key: KeyCode,
) -> KeyOutcome
where
    A: TmdbApi + Send + Sync + 'static,
{
    let len = runtime.controller().items().len();
    match key {
        KeyCode::Char('q') | KeyCode::Esc => return KeyOutcome::Quit,
        KeyCode::Char('1') => select_category(runtime, state, Category::Popular),
        KeyCode::Char('2') => select_category(runtime, state, Category::TopRated),
        KeyCode::Char('3') => select_category(runtime, state, Category::TvShows),
        KeyCode::Tab => {
            let next = runtime.controller().category().next();
            select_category(runtime, state, next);
        }
        KeyCode::Char('/') => {
            state.input_mode = InputMode::Search;
        }
        KeyCode::Up | KeyCode::Char('k') => state.move_up(len),
        KeyCode::Down | KeyCode::Char('j') => {
            state.move_down(len);
        }
        KeyCode::PageUp => state.page_up(len, PAGE_SIZE),
        KeyCode::PageDown => state.page_down(len, PAGE_SIZE),
        KeyCode::Char('m') => {
            if !runtime.load_more() {
                state.status = Some(String::from("Nothing more to load"));
            }
        }
        KeyCode::Char('[') | KeyCode::Left => {
            runtime.back();
            state.reset_cursor();
        }
        KeyCode::Char(']') | KeyCode::Right => {
            runtime.forward();
            state.reset_cursor();
        }
        KeyCode::Enter => {
            if len > 0 {
                state.dialog_focus = DialogFocus::Seasons;
                state.status = None;
                runtime.open_player(state.cursor());
            }
        }
        _ => {}
    }
    KeyOutcome::Continue
}

fn select_category<A>(runtime: &mut BrowseRuntime<A>, state: &mut BrowserState, category: Category)
where
    A: TmdbApi + Send + Sync + 'static,
{
    runtime.select_category(category);
    state.reset_cursor();
    state.status = None;
}

/// Handles key input while the player dialog is open.
fn handle_dialog_input<A>(
    runtime: &mut BrowseRuntime<A>,
    state: &mut BrowserState,
    key: KeyCode,
) -> KeyOutcome
where
    A: TmdbApi + Send + Sync + 'static,
{
    match key {
        KeyCode::Esc | KeyCode::Char('q') => runtime.close_player(),
        KeyCode::Tab => state.dialog_focus = state.dialog_focus.toggle(),
        KeyCode::Left | KeyCode::Char('h') => runtime.player_prev_season(),
        KeyCode::Right | KeyCode::Char('l') => runtime.player_next_season(),
        KeyCode::Up | KeyCode::Char('k') => match state.dialog_focus {
            DialogFocus::Seasons => runtime.player_prev_season(),
            DialogFocus::Episodes => runtime.player_prev_episode(),
        },
        KeyCode::Down | KeyCode::Char('j') => match state.dialog_focus {
            DialogFocus::Seasons => runtime.player_next_season(),
            DialogFocus::Episodes => runtime.player_next_episode(),
        },
        KeyCode::Enter | KeyCode::Char('o') => {
            if let Some(url) = runtime.player().and_then(|p| p.embed_url()) {
                return KeyOutcome::Open(url);
            }
        }
        _ => {}
    }
    KeyOutcome::Continue
}
