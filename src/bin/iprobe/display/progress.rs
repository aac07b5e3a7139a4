use std::io::{self, Write};
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};

/// Per-input counters reported in the closing footer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub inputs: usize,
    pub skipped: usize,
    pub points: usize,
}

impl Tally {
    /// Counts one input; `None` marks it skipped.
    pub fn record(&mut self, points: Option<usize>) {
        self.inputs += 1;
        match points {
            Some(n) => self.points += n,
            None => self.skipped += 1,
        }
    }

    fn summary(&self) -> String {
        let mut text = format!(
            "{} input{}",
            self.inputs,
            if self.inputs == 1 { "" } else { "s" }
        );
        if self.skipped > 0 {
            text.push_str(&format!(", {} skipped", self.skipped));
        }
        text.push_str(&format!(", {} points", self.points));
        text
    }
}

/// Stage-by-stage progress on stderr. Silent unless interactive; the tally
/// is kept either way.
pub struct Progress {
    stages: &'static [&'static str],
    current: usize,
    spinner: Option<ProgressBar>,
    interactive: bool,
    start: Instant,
    stage_start: Instant,
    tally: Tally,
}

impl Progress {
    pub fn new(interactive: bool, stages: &'static [&'static str]) -> Self {
        let now = Instant::now();
        Self {
            stages,
            current: 0,
            spinner: None,
            interactive,
            start: now,
            stage_start: now,
            tally: Tally::default(),
        }
    }

    fn label(&self) -> String {
        stage_label(self.stages, self.current)
    }

    /// Starts the next stage in the list.
    pub fn next_stage(&mut self) {
        self.clear_spinner();
        self.current += 1;
        self.stage_start = Instant::now();
        if !self.interactive {
            return;
        }

        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("  {spinner:.cyan} {msg}")
                .expect("invalid template")
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        bar.enable_steady_tick(Duration::from_millis(80));
        bar.set_message(format!("{}...", self.label()));
        self.spinner = Some(bar);
    }

    /// Replaces the spinner text with the input being worked on.
    pub fn input(&self, path: &str, index: usize, count: usize) {
        if let Some(bar) = &self.spinner {
            bar.set_message(format!("{} {path} ({}/{count})", self.label(), index + 1));
        }
    }

    pub fn record(&mut self, points: Option<usize>) {
        self.tally.record(points);
    }

    /// Closes the current stage with a tick and its result lines.
    pub fn complete_stage(&mut self, results: &[String]) {
        self.clear_spinner();
        if !self.interactive {
            return;
        }

        let name = self
            .stages
            .get(self.current.wrapping_sub(1))
            .copied()
            .unwrap_or_default();
        let mut stderr = io::stderr().lock();
        let _ = writeln!(
            stderr,
            "  \x1b[32m✓\x1b[0m {:<44} {:>5.1}s",
            name,
            self.stage_start.elapsed().as_secs_f64()
        );
        for line in results {
            let _ = writeln!(stderr, "      \x1b[2m·\x1b[0m {line}");
        }
    }

    pub fn finish(mut self) {
        self.clear_spinner();
        if self.interactive {
            print_footer(&self.tally, self.start.elapsed());
        }
    }

    fn clear_spinner(&mut self) {
        if let Some(bar) = self.spinner.take() {
            bar.finish_and_clear();
        }
    }
}

/// `[2/3] Aggregating` for the 1-based stage `current`.
fn stage_label(stages: &[&str], current: usize) -> String {
    let name = stages
        .get(current.wrapping_sub(1))
        .copied()
        .unwrap_or_default();
    format!("[{current}/{}] {name}", stages.len())
}

fn print_footer(tally: &Tally, elapsed: Duration) {
    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "  \x1b[2m{}\x1b[0m", "━".repeat(56));
    let _ = writeln!(
        stderr,
        "  \x1b[32m✓\x1b[0m {:<40} {:>12}",
        tally.summary(),
        format!("{:.2}s", elapsed.as_secs_f64())
    );
    let _ = writeln!(stderr);
}
