mod api;
mod app;
mod config;
mod events;
mod export;
mod logging;
mod models;
mod typing;
mod ui;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::Backend, prelude::*};
use std::io;
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use api::ChatClient;
use app::App;
use events::AppEvent;

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load_config()?;
    logging::init(&config::get_log_path()?, &config.log_level)?;
    tracing::info!(model = %config.model, endpoint = %config.api_base_url, "starting");

    let client = ChatClient::from_config(&config)?;
    let export_dir = config::resolve_export_dir(&config);
    let mut app = App::new(
        client.model(),
        Duration::from_millis(config.typing_interval_ms),
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channel for async events
    let (tx, mut rx) = mpsc::unbounded_channel::<AppEvent>();

    let res = run_app(&mut terminal, &mut app, &client, &export_dir, &tx, &mut rx);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "exiting after error");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

/// Returns true when the key was consumed by the help window.
fn handle_help_keys(app: &mut App, key: KeyCode, modifiers: KeyModifiers) -> bool {
    if !app.show_help {
        return false;
    }

    match key {
        KeyCode::Char('h') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.toggle_help();
        }
        KeyCode::Esc => {
            app.show_help = false;
        }
        _ => {}
    }
    true
}

fn handle_keyboard_input(
    app: &mut App,
    key: KeyCode,
    modifiers: KeyModifiers,
    client: &ChatClient,
    export_dir: &Path,
    event_tx: &mpsc::UnboundedSender<AppEvent>,
) {
    match key {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            if app.exit_pending {
                app.quit();
            } else {
                app.exit_pending = true;
            }
            return;
        }
        KeyCode::Esc if app.exit_pending => {
            app.exit_pending = false;
            return;
        }
        _ if app.exit_pending => {
            // Any other key cancels pending exit and is handled normally
            app.exit_pending = false;
        }
        _ => {}
    }

    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    match key {
        KeyCode::Char('q') if ctrl => app.quit(),
        KeyCode::Char('h') if ctrl => app.toggle_help(),
        KeyCode::Char('g') if ctrl => start_generation(app, client, event_tx),
        KeyCode::Char('s') if ctrl => {
            if app.can_export() {
                // Outcome is reported through app.notice
                let _ = app.export(export_dir);
            }
        }
        KeyCode::Char(_) if ctrl => {}

        // Navigation keys scroll the screenplay
        KeyCode::Up => app.scroll_up(1),
        KeyCode::Down => app.scroll_down(1),
        KeyCode::PageUp => app.scroll_up(10),
        KeyCode::PageDown => app.scroll_down(10),
        KeyCode::Home => app.scroll_to_top(),
        KeyCode::End => app.scroll_to_bottom(),

        // Editing keys go to the draft
        KeyCode::Backspace => app.backspace(),
        KeyCode::Enter => app.insert_char('\n'),
        KeyCode::Char(c) => app.insert_char(c),

        _ => {}
    }
}

fn start_generation(
    app: &mut App,
    client: &ChatClient,
    event_tx: &mpsc::UnboundedSender<AppEvent>,
) {
    let Some(draft) = app.start_generation() else {
        return;
    };

    let client = client.clone();
    let tx = event_tx.clone();

    tokio::spawn(async move {
        let event = match client.generate_screenplay(&draft).await {
            Ok(text) => AppEvent::GenerationComplete(text),
            Err(e) => AppEvent::GenerationFailed(e.to_string()),
        };
        // The receiver only goes away when the UI is shutting down
        let _ = tx.send(event);
    });
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    client: &ChatClient,
    export_dir: &Path,
    event_tx: &mpsc::UnboundedSender<AppEvent>,
    event_rx: &mut mpsc::UnboundedReceiver<AppEvent>,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::render(f, app))?;

        // Generation results first, then the typing animation
        while let Ok(app_event) = event_rx.try_recv() {
            app.handle_event(app_event);
        }
        app.tick(Instant::now());

        if event::poll(Duration::from_millis(16))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press
                    && !handle_help_keys(app, key.code, key.modifiers)
                {
                    handle_keyboard_input(
                        app,
                        key.code,
                        key.modifiers,
                        client,
                        export_dir,
                        event_tx,
                    );
                }
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Phase;

    type Harness = (
        App,
        ChatClient,
        mpsc::UnboundedSender<AppEvent>,
        mpsc::UnboundedReceiver<AppEvent>,
    );

    fn setup() -> Harness {
        let app = App::new("gpt-4", Duration::ZERO);
        let client = ChatClient::new(
            "http://127.0.0.1:9".to_string(),
            "gpt-4".to_string(),
            "SCREENPLAY_GEN_TEST_KEY_MAIN".to_string(),
            1,
        )
        .unwrap();
        let (tx, rx) = mpsc::unbounded_channel();
        (app, client, tx, rx)
    }

    fn press(
        app: &mut App,
        client: &ChatClient,
        tx: &mpsc::UnboundedSender<AppEvent>,
        key: KeyCode,
        modifiers: KeyModifiers,
    ) {
        if !handle_help_keys(app, key, modifiers) {
            handle_keyboard_input(app, key, modifiers, client, Path::new("."), tx);
        }
    }

    #[test]
    fn test_typing_edits_draft() {
        let (mut app, client, tx, _rx) = setup();
        for c in "Hi".chars() {
            press(&mut app, &client, &tx, KeyCode::Char(c), KeyModifiers::NONE);
        }
        press(&mut app, &client, &tx, KeyCode::Enter, KeyModifiers::NONE);
        press(&mut app, &client, &tx, KeyCode::Char('X'), KeyModifiers::SHIFT);
        press(&mut app, &client, &tx, KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(app.draft, "Hi\n");
    }

    #[test]
    fn test_ctrl_c_twice_quits() {
        let (mut app, client, tx, _rx) = setup();
        press(&mut app, &client, &tx, KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(app.exit_pending);
        assert!(!app.should_quit);
        press(&mut app, &client, &tx, KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(app.should_quit);
    }

    #[test]
    fn test_esc_cancels_pending_exit() {
        let (mut app, client, tx, _rx) = setup();
        press(&mut app, &client, &tx, KeyCode::Char('c'), KeyModifiers::CONTROL);
        press(&mut app, &client, &tx, KeyCode::Esc, KeyModifiers::NONE);
        assert!(!app.exit_pending);
        assert!(!app.should_quit);
        assert!(app.draft.is_empty());
    }

    #[test]
    fn test_help_window_swallows_keys() {
        let (mut app, client, tx, _rx) = setup();
        press(&mut app, &client, &tx, KeyCode::Char('h'), KeyModifiers::CONTROL);
        assert!(app.show_help);
        press(&mut app, &client, &tx, KeyCode::Char('x'), KeyModifiers::NONE);
        assert!(app.draft.is_empty());
        press(&mut app, &client, &tx, KeyCode::Esc, KeyModifiers::NONE);
        assert!(!app.show_help);
    }

    #[test]
    fn test_ctrl_g_with_empty_draft_does_nothing() {
        let (mut app, client, tx, _rx) = setup();
        press(&mut app, &client, &tx, KeyCode::Char('g'), KeyModifiers::CONTROL);
        assert_eq!(app.phase(), &Phase::Idle);
    }

    #[tokio::test]
    async fn test_ctrl_g_failure_reaches_app() {
        let (mut app, client, tx, mut rx) = setup();
        std::env::set_var("SCREENPLAY_GEN_TEST_KEY_MAIN", "sk-test");
        app.draft = "A man walks into a bar.".to_string();

        press(&mut app, &client, &tx, KeyCode::Char('g'), KeyModifiers::CONTROL);
        assert_eq!(app.phase(), &Phase::Generating);

        let event = rx.recv().await.unwrap();
        assert!(matches!(event, AppEvent::GenerationFailed(_)));
        app.handle_event(event);
        assert_eq!(app.output, app::GENERATION_ERROR_MESSAGE);
        assert_eq!(app.phase(), &Phase::Idle);
    }

    #[test]
    fn test_ctrl_s_ignored_without_output() {
        let (mut app, client, tx, _rx) = setup();
        press(&mut app, &client, &tx, KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert!(app.notice.is_none());
        assert!(app.draft.is_empty());
    }
}
