use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const BAR_TEMPLATE: &str = "{spinner} {msg:<24} [{bar:32}] {pos}/{len} ({elapsed})";

/// Counted progress for a long loop (sales, batches).
///
/// Hidden when stdout is not a terminal so logs and piped output stay clean.
pub struct StepProgress {
    pb: ProgressBar,
}

impl StepProgress {
    pub fn new(total: u64, message: &str) -> Self {
        let pb = if console::Term::stdout().is_term() {
            let pb = ProgressBar::new(total);
            if let Ok(style) = ProgressStyle::with_template(BAR_TEMPLATE) {
                pb.set_style(style.progress_chars("=> "));
            }
            pb
        } else {
            ProgressBar::hidden()
        };
        pb.set_message(message.to_string());
        Self { pb }
    }

    pub fn inc(&self, delta: u64) {
        self.pb.inc(delta);
    }

    pub fn position(&self) -> u64 {
        self.pb.position()
    }

    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }
}

pub struct Spinner {
    pb: ProgressBar,
}

impl Spinner {
    pub fn new(message: &str) -> Self {
        let pb = if console::Term::stdout().is_term() {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::hidden()
        };
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        Self { pb }
    }

    pub fn set_message(&self, msg: &str) {
        self.pb.set_message(msg.to_string());
    }

    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_progress_counts_when_hidden() {
        let progress = StepProgress::new(10, "Testing");
        progress.inc(3);
        progress.inc(2);
        assert_eq!(progress.position(), 5);
        progress.finish();
    }
}
