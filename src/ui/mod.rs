pub mod widgets;

use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

pub fn render(frame: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Min(0),    // Draft and output panes
            Constraint::Length(1), // Action line
            Constraint::Length(1), // Notice
            Constraint::Length(1), // Bottom keymap bar
        ])
        .split(frame.area());

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    widgets::render_title(frame, rows[0]);
    widgets::render_draft_pane(frame, app, panes[0]);
    widgets::render_output_pane(frame, app, panes[1]);
    widgets::render_action_bar(frame, app, rows[2]);
    widgets::render_notice(frame, app, rows[3]);
    widgets::render_bottom_bar(frame, app, rows[4]);

    if app.show_help {
        widgets::render_help_window(frame, frame.area());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::AppEvent;
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Duration;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(ratatui::buffer::Cell::symbol).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_render_idle_screen() {
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        let mut app = App::new("gpt-4", Duration::ZERO);

        terminal.draw(|f| render(f, &mut app)).unwrap();
        let text = screen_text(&terminal);

        assert!(text.contains("Screenplay Generator"));
        assert!(text.contains("Story Draft"));
        assert!(text.contains("Generated Screenplay"));
        assert!(text.contains("[ Generate ]"));
        assert!(!text.contains("Ctrl+S: Export PDF"));
    }

    #[test]
    fn test_render_phases() {
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        let mut app = App::new("gpt-4", Duration::ZERO);
        app.draft = "A man walks into a bar.".to_string();

        app.start_generation();
        terminal.draw(|f| render(f, &mut app)).unwrap();
        assert!(screen_text(&terminal).contains("[ Generating... ]"));

        app.handle_event(AppEvent::GenerationComplete("FADE IN:".to_string()));
        terminal.draw(|f| render(f, &mut app)).unwrap();
        assert!(screen_text(&terminal).contains("[ Typing... ]"));

        while !app.phase().is_idle() {
            app.tick(std::time::Instant::now());
        }
        terminal.draw(|f| render(f, &mut app)).unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("FADE IN:"));
        assert!(text.contains("Ctrl+S: Export PDF"));
    }

    #[test]
    fn test_render_help_overlay() {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let mut app = App::new("gpt-4", Duration::ZERO);
        app.show_help = true;

        terminal.draw(|f| render(f, &mut app)).unwrap();
        assert!(screen_text(&terminal).contains("Keyboard Shortcuts"));
    }
}
