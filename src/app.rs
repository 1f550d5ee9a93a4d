use crate::events::AppEvent;
use crate::export::{self, ExportError};
use crate::typing::TypingAnimator;

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Shown in the output pane when generation fails.
pub const GENERATION_ERROR_MESSAGE: &str = "Error generating screenplay. Please try again.";

/// What the view is doing right now. The animator lives inside `Animating`,
/// so "loading" and "typing" can never both be true.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Generating,
    Animating(TypingAnimator),
}

impl Phase {
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Label for the primary action.
    pub const fn action_label(&self) -> &'static str {
        match self {
            Self::Idle => "Generate",
            Self::Generating => "Generating...",
            Self::Animating(_) => "Typing...",
        }
    }
}

#[derive(Debug)]
pub struct App {
    pub should_quit: bool,
    pub draft: String,
    pub output: String,
    phase: Phase,
    pub output_scroll: usize,
    pub show_help: bool,
    pub exit_pending: bool,
    /// One-line status message, e.g. the result of the last export
    pub notice: Option<String>,
    pub model: String,
    pub typing_interval: Duration,
}

impl App {
    pub fn new(model: impl Into<String>, typing_interval: Duration) -> Self {
        Self {
            should_quit: false,
            draft: String::new(),
            output: String::new(),
            phase: Phase::Idle,
            output_scroll: 0,
            show_help: false,
            exit_pending: false,
            notice: None,
            model: model.into(),
            typing_interval,
        }
    }

    pub const fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn can_generate(&self) -> bool {
        self.phase.is_idle() && !self.draft.is_empty()
    }

    pub fn can_export(&self) -> bool {
        self.phase.is_idle() && !self.output.is_empty()
    }

    /// Move to `Generating` and hand back the draft to send.
    ///
    /// Returns `None` when generation is not allowed right now.
    pub fn start_generation(&mut self) -> Option<String> {
        if !self.can_generate() {
            return None;
        }

        self.output.clear();
        self.output_scroll = 0;
        self.notice = None;
        self.phase = Phase::Generating;
        Some(self.draft.clone())
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        // Results that arrive outside a generation cycle are stale.
        if self.phase != Phase::Generating {
            tracing::warn!(?event, "ignoring generation result outside of a generation cycle");
            return;
        }

        match event {
            AppEvent::GenerationComplete(text) => self.begin_typing(text),
            AppEvent::GenerationFailed(error) => {
                tracing::error!(%error, "screenplay generation failed");
                self.output = GENERATION_ERROR_MESSAGE.to_string();
                self.phase = Phase::Idle;
            }
        }
    }

    fn begin_typing(&mut self, text: String) {
        self.output.clear();
        if text.is_empty() {
            self.phase = Phase::Idle;
            return;
        }
        self.phase = Phase::Animating(TypingAnimator::new(text, self.typing_interval));
    }

    /// Advance the typing animation to `now`.
    pub fn tick(&mut self, now: Instant) {
        if let Phase::Animating(animator) = &mut self.phase {
            let chunk = animator.due(now);
            let finished = animator.is_finished();

            if !chunk.is_empty() {
                self.output.push_str(&chunk);
                self.scroll_to_bottom();
            }
            if finished {
                tracing::debug!(chars = self.output.chars().count(), "typing finished");
                self.phase = Phase::Idle;
            }
        }
    }

    /// Write the current output to `dir` as a PDF and record the outcome.
    pub fn export(&mut self, dir: &Path) -> Result<PathBuf, ExportError> {
        let result = if !self.phase.is_idle() {
            Err(ExportError::NotReady)
        } else {
            export::export_screenplay(&self.output, dir)
        };

        self.notice = Some(match &result {
            Ok(path) => format!("Saved {}", path.display()),
            Err(e) => {
                tracing::error!(error = %e, "export failed");
                format!("Export failed: {e}")
            }
        });
        result
    }

    pub fn insert_char(&mut self, c: char) {
        self.draft.push(c);
    }

    pub fn backspace(&mut self) {
        self.draft.pop();
    }

    pub const fn quit(&mut self) {
        self.should_quit = true;
    }

    pub const fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub const fn scroll_up(&mut self, amount: usize) {
        self.output_scroll = self.output_scroll.saturating_sub(amount);
    }

    pub const fn scroll_down(&mut self, amount: usize) {
        self.output_scroll = self.output_scroll.saturating_add(amount);
    }

    pub const fn scroll_to_top(&mut self) {
        self.output_scroll = 0;
    }

    pub const fn scroll_to_bottom(&mut self) {
        // The renderer clamps this to the real bottom
        self.output_scroll = usize::MAX;
    }
}
