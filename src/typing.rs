// Typewriter-style reveal of generated text

use std::time::{Duration, Instant};

/// Reveals a string one character per step.
///
/// The animator never sleeps. The UI loop asks it which steps are due with
/// [`TypingAnimator::due`] and applies them, so the caller keeps control of
/// its own thread between ticks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingAnimator {
    text: String,
    /// Byte offset of the next unrevealed character
    cursor: usize,
    interval: Duration,
    last_step: Option<Instant>,
}

impl TypingAnimator {
    pub fn new(text: String, interval: Duration) -> Self {
        Self {
            text,
            cursor: 0,
            interval,
            last_step: None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.text.len()
    }

    #[cfg(test)]
    pub fn revealed(&self) -> &str {
        &self.text[..self.cursor]
    }

    /// Collect the characters whose step time has passed by `now`.
    ///
    /// The first call reveals one character immediately. Afterwards one
    /// character is released per elapsed interval, catching up when ticks
    /// arrive late.
    pub fn due(&mut self, now: Instant) -> String {
        if self.is_finished() {
            return String::new();
        }

        let steps = match self.last_step {
            None => 1,
            Some(_) if self.interval.is_zero() => usize::MAX,
            Some(last) => {
                let elapsed = now.saturating_duration_since(last);
                usize::try_from(elapsed.as_nanos() / self.interval.as_nanos())
                    .unwrap_or(usize::MAX)
            }
        };

        if steps == 0 {
            return String::new();
        }

        let mut out = String::new();
        for c in self.by_ref().take(steps) {
            out.push(c);
        }

        self.last_step = Some(match self.last_step {
            Some(last) if steps != usize::MAX => {
                let advanced = u32::try_from(steps)
                    .ok()
                    .and_then(|n| self.interval.checked_mul(n))
                    .map_or(now, |d| last + d);
                advanced.min(now)
            }
            _ => now,
        });

        out
    }
}

impl Iterator for TypingAnimator {
    type Item = char;

    /// One character-append step, ignoring pacing.
    fn next(&mut self) -> Option<char> {
        let c = self.text[self.cursor..].chars().next()?;
        self.cursor += c.len_utf8();
        Some(c)
    }
}
