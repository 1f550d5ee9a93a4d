use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Phase};

pub fn render_title(frame: &mut Frame, area: Rect) {
    let title = Paragraph::new(Span::styled(
        "Screenplay Generator",
        Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center);

    frame.render_widget(title, area);
}

pub fn render_help_window(frame: &mut Frame, area: Rect) {
    let help_text = vec![
        Line::from(Span::styled(
            "Screenplay Generator - Keyboard Shortcuts",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("General:", Style::default().add_modifier(Modifier::BOLD))),
        Line::from("  Ctrl+H        - Show/hide this help"),
        Line::from("  Ctrl+Q        - Quit application"),
        Line::from("  Ctrl+C        - Quit (press twice)"),
        Line::from(""),
        Line::from(Span::styled("Draft:", Style::default().add_modifier(Modifier::BOLD))),
        Line::from("  Typing        - Edit the story draft"),
        Line::from("  Enter         - New line"),
        Line::from("  Ctrl+G        - Generate screenplay"),
        Line::from(""),
        Line::from(Span::styled("Screenplay:", Style::default().add_modifier(Modifier::BOLD))),
        Line::from("  Ctrl+S        - Export to screenplay.pdf"),
        Line::from("  Up/Down       - Scroll"),
        Line::from("  PgUp/PgDn     - Scroll"),
        Line::from("  Home/End      - Jump to start/end"),
        Line::from(""),
        Line::from(Span::styled(
            "Press Ctrl+H or Esc to close",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let help_paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help ")
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false });

    let popup_width = 60;
    let popup_height = 21;
    let x = (area.width.saturating_sub(popup_width)) / 2;
    let y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect {
        x: area.x + x,
        y: area.y + y,
        width: popup_width.min(area.width),
        height: popup_height.min(area.height),
    };

    frame.render_widget(Clear, popup_area);
    frame.render_widget(help_paragraph, popup_area);
}

pub fn render_draft_pane(frame: &mut Frame, app: &App, area: Rect) {
    let (text, style) = if app.draft.is_empty() {
        (
            "Write your story draft here...",
            Style::default().fg(Color::Gray),
        )
    } else {
        (app.draft.as_str(), Style::default().fg(Color::White))
    };

    // Keep the end of a long draft in view
    let inner_height = area.height.saturating_sub(2) as usize;
    let lines = wrapped_row_count(text, area.width.saturating_sub(2));
    let scroll = lines.saturating_sub(inner_height);

    let draft = Paragraph::new(text)
        .style(style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Story Draft ")
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false })
        .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0));

    frame.render_widget(draft, area);
}

pub fn render_output_pane(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Generated Screenplay ")
        .border_style(Style::default().fg(Color::Green));

    if matches!(app.phase(), Phase::Generating) {
        let waiting = Paragraph::new(Span::styled(
            format!("Writing with {}...", app.model),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .block(block);
        frame.render_widget(waiting, area);
        return;
    }

    if app.output.is_empty() {
        let placeholder = Paragraph::new(Span::styled(
            "Your generated screenplay will appear here...",
            Style::default().fg(Color::Gray),
        ))
        .block(block)
        .wrap(Wrap { trim: false });
        frame.render_widget(placeholder, area);
        return;
    }

    let visible_height = area.height.saturating_sub(2) as usize;
    let total_lines = wrapped_row_count(&app.output, area.width.saturating_sub(2));
    let max_scroll = total_lines.saturating_sub(visible_height);
    let actual_scroll = app.output_scroll.min(max_scroll);

    // Sync the clamped scroll back to the app state
    if app.output_scroll != actual_scroll {
        app.output_scroll = actual_scroll;
    }

    let output = Paragraph::new(app.output.as_str())
        .style(Style::default().fg(Color::Green))
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((u16::try_from(actual_scroll).unwrap_or(u16::MAX), 0));

    frame.render_widget(output, area);
}

pub fn render_action_bar(frame: &mut Frame, app: &App, area: Rect) {
    let phase = app.phase();
    let button_style = match phase {
        Phase::Idle if app.can_generate() => Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
        Phase::Idle => Style::default().fg(Color::DarkGray),
        Phase::Generating | Phase::Animating(_) => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    };

    let mut spans = vec![
        Span::raw("  Ctrl+G "),
        Span::styled(format!("[ {} ]", phase.action_label()), button_style),
    ];

    if app.can_export() {
        spans.push(Span::raw("    "));
        spans.push(Span::styled(
            "Ctrl+S: Export PDF",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

pub fn render_notice(frame: &mut Frame, app: &App, area: Rect) {
    let Some(notice) = app.notice.as_deref() else {
        return;
    };

    let color = if notice.starts_with("Export failed") {
        Color::Red
    } else {
        Color::Green
    };

    let bar = Paragraph::new(notice)
        .alignment(Alignment::Right)
        .style(Style::default().fg(color));

    frame.render_widget(bar, area);
}

pub fn render_bottom_bar(frame: &mut Frame, app: &App, area: Rect) {
    let (text, style) = if app.exit_pending {
        (
            "Press Ctrl+C again to exit, Esc to cancel",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )
    } else {
        (
            "Ctrl+C: Quit | Ctrl+G: Generate | Ctrl+S: Export | Ctrl+H: Help",
            Style::default().fg(Color::DarkGray),
        )
    };

    let bar = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(style);

    frame.render_widget(bar, area);
}

/// Rows `text` takes inside a bordered pane `width` cells wide, wrapped
/// exactly the way the panes draw it.
pub fn wrapped_row_count(text: &str, width: u16) -> usize {
    Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .line_count(width.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_row_count_matches_word_wrap() {
        assert_eq!(wrapped_row_count("short", 10), 1);
        assert_eq!(wrapped_row_count("a\n\nb", 10), 3);
        // Word wrap leaves "aaaa" alone on the first row, so this needs
        // three rows where a plain cell count would say two.
        assert_eq!(wrapped_row_count("aaaa bbbbbbbb cc", 10), 3);
    }

    #[test]
    fn test_output_pane_shows_last_line_after_typing() {
        use crate::events::AppEvent;
        use ratatui::{backend::TestBackend, Terminal};
        use std::time::{Duration, Instant};

        let screenplay = format!(
            "{}\nTHE_LAST_LINE",
            "The detective walks slowly across the rain soaked street toward the diner. "
                .repeat(12)
        );
        let mut app = App::new("gpt-4", Duration::ZERO);
        app.draft = "A detective story.".to_string();
        app.start_generation();
        app.handle_event(AppEvent::GenerationComplete(screenplay));
        while !app.phase().is_idle() {
            app.tick(Instant::now());
        }
        app.scroll_to_bottom();

        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal
            .draw(|f| render_output_pane(f, &mut app, f.area()))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let bottom_row: String = (0..buffer.area.width)
            .map(|x| buffer[(x, buffer.area.height - 2)].symbol().to_string())
            .collect();
        assert!(
            bottom_row.contains("THE_LAST_LINE"),
            "last row was {bottom_row:?}"
        );
    }
}
