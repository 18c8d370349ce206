use std::io::{self, Write};
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};

const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

struct StepSpinner {
    bar: Option<ProgressBar>,
    start: Instant,
    step: u8,
    total_steps: u8,
    step_start: Instant,
}

impl StepSpinner {
    fn new(total_steps: u8) -> Self {
        let now = Instant::now();
        Self {
            bar: None,
            start: now,
            step: 0,
            total_steps,
            step_start: now,
        }
    }

    fn clear(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }

    fn step(&mut self, description: &str) {
        self.clear();
        self.step += 1;
        self.step_start = Instant::now();

        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("  {spinner:.cyan} {msg}") {
            bar.set_style(style.tick_chars(TICK_CHARS));
        }
        bar.enable_steady_tick(Duration::from_millis(80));
        bar.set_message(format!(
            "[{}/{}] {}...",
            self.step, self.total_steps, description
        ));
        self.bar = Some(bar);
    }

    fn complete_step(&mut self, description: &str, details: &[String]) {
        self.clear();
        let elapsed = self.step_start.elapsed();
        let mut stderr = io::stderr().lock();

        let _ = writeln!(
            stderr,
            "  \x1b[32m✓\x1b[0m {:<44} {:>5.1}s",
            description,
            elapsed.as_secs_f64()
        );
        for detail in details {
            let _ = writeln!(stderr, "      \x1b[2m·\x1b[0m {detail}");
        }
    }

    fn finish(mut self, headline: &str) {
        self.clear();
        let elapsed = self.start.elapsed();
        let mut stderr = io::stderr().lock();

        let _ = writeln!(stderr);
        let _ = writeln!(
            stderr,
            "  \x1b[2m╺━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━╸\x1b[0m"
        );
        let _ = writeln!(stderr);
        let _ = writeln!(
            stderr,
            "  \x1b[32m✓\x1b[0m {:<36} {:>14}",
            headline,
            format!("Total: {:.2}s", elapsed.as_secs_f64())
        );
        let _ = writeln!(stderr);
    }
}

impl Drop for StepSpinner {
    // An error can abort a step; the error box must not share the line.
    fn drop(&mut self) {
        self.clear();
    }
}

/// Step-by-step progress on stderr; does nothing when not interactive.
pub struct Progress {
    spinner: Option<StepSpinner>,
}

impl Progress {
    pub fn new(interactive: bool, total_steps: u8) -> Self {
        Self {
            spinner: interactive.then(|| StepSpinner::new(total_steps)),
        }
    }

    pub fn step(&mut self, description: &str) {
        if let Some(spinner) = &mut self.spinner {
            spinner.step(description);
        }
    }

    pub fn complete_step(&mut self, description: &str, details: &[String]) {
        if let Some(spinner) = &mut self.spinner {
            spinner.complete_step(description, details);
        }
    }

    pub fn finish(self, headline: &str) {
        if let Some(spinner) = self.spinner {
            spinner.finish(headline);
        }
    }
}
