//! Progress reporting for grading runs

use colored::Colorize;
use gradewise_application::ports::progress::GradingProgressNotifier;
use gradewise_domain::{GradingOutcome, GradingState, Tier};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Reports grading progress with a spinner on stderr
pub struct ProgressReporter {
    spinner: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn state_display_name(state: GradingState) -> &'static str {
        match state {
            GradingState::Precheck => "Checking objective answers",
            GradingState::AssessRequested => "Waiting for the assessor",
            GradingState::Extracting => "Reading the assessment",
            GradingState::Reconciling => "Reconciling scores",
            GradingState::Done => "Done",
        }
    }

    fn step(state: GradingState) -> usize {
        GradingState::ORDER
            .iter()
            .position(|s| *s == state)
            .map_or(0, |i| i + 1)
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl GradingProgressNotifier for ProgressReporter {
    fn on_state(&self, state: GradingState, item_count: usize) {
        let Ok(mut guard) = self.spinner.lock() else {
            return;
        };
        let spinner = guard.get_or_insert_with(|| {
            let pb = ProgressBar::new_spinner();
            pb.set_style(Self::spinner_style());
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });

        spinner.set_prefix(format!(
            "[{}/{}]",
            Self::step(state),
            GradingState::ORDER.len()
        ));
        spinner.set_message(format!(
            "{} ({} items)",
            Self::state_display_name(state),
            item_count
        ));
    }

    fn on_extraction(&self, tier: Option<Tier>) {
        if let Ok(guard) = self.spinner.lock()
            && let Some(pb) = guard.as_ref()
        {
            let line = match tier {
                Some(tier) => format!("{} extracted via {}", "v".green(), tier),
                None => format!("{} no usable assessment", "x".red()),
            };
            pb.println(line);
        }
    }

    fn on_complete(&self, outcome: &GradingOutcome) {
        if let Ok(mut guard) = self.spinner.lock()
            && let Some(pb) = guard.take()
        {
            match outcome {
                GradingOutcome::Assessed => {
                    pb.finish_with_message(format!("{}", "Grading complete!".green()))
                }
                GradingOutcome::Synthesized { reason } => pb.finish_with_message(format!(
                    "{} ({})",
                    "Grading complete with default scores".yellow(),
                    reason
                )),
            }
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl GradingProgressNotifier for SimpleProgress {
    fn on_state(&self, state: GradingState, item_count: usize) {
        eprintln!(
            "{} {} ({} items)",
            "->".cyan(),
            ProgressReporter::state_display_name(state).bold(),
            item_count
        );
    }

    fn on_extraction(&self, tier: Option<Tier>) {
        match tier {
            Some(tier) => eprintln!("  {} extracted via {}", "v".green(), tier),
            None => eprintln!("  {} no usable assessment", "x".red()),
        }
    }

    fn on_complete(&self, outcome: &GradingOutcome) {
        if let GradingOutcome::Synthesized { reason } = outcome {
            eprintln!("  {} default scores assigned ({})", "!".yellow(), reason);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradewise_domain::FallbackReason;

    #[test]
    fn test_steps_follow_state_order() {
        let steps: Vec<usize> = GradingState::ORDER
            .iter()
            .map(|s| ProgressReporter::step(*s))
            .collect();
        assert_eq!(steps, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_reporter_lifecycle() {
        let reporter = ProgressReporter::new();
        for state in GradingState::ORDER {
            reporter.on_state(state, 3);
        }
        reporter.on_extraction(None);
        reporter.on_complete(&GradingOutcome::Synthesized {
            reason: FallbackReason::Structural,
        });
        assert!(reporter.spinner.lock().unwrap().is_none());
    }
}
