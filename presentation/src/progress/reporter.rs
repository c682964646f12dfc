//! Progress reporting for research cycles

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use scholia_application::ProgressNotifier;
use scholia_domain::ResearchPhase;
use std::sync::Mutex;
use std::time::Duration;

/// Reports progress with one spinner or bar per phase
pub struct ProgressReporter {
    multi: MultiProgress,
    phase_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            phase_bar: Mutex::new(None),
        }
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn prefix(phase: &ResearchPhase, iteration: usize) -> String {
        format!("[{}] {}", iteration, phase.display_name())
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_phase_start(&self, phase: &ResearchPhase, iteration: usize, total_tasks: usize) {
        let pb = if total_tasks > 1 {
            let pb = self.multi.add(ProgressBar::new(total_tasks as u64));
            pb.set_style(Self::bar_style());
            pb
        } else {
            let pb = self.multi.add(ProgressBar::new_spinner());
            pb.set_style(Self::spinner_style());
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        };
        pb.set_prefix(Self::prefix(phase, iteration));
        pb.set_message("...");

        if let Ok(mut slot) = self.phase_bar.lock() {
            *slot = Some(pb);
        }
    }

    fn on_task_complete(&self, _phase: &ResearchPhase, label: &str, success: bool) {
        if let Ok(slot) = self.phase_bar.lock()
            && let Some(pb) = slot.as_ref()
        {
            let status = if success {
                format!("{} {}", "v".green(), label)
            } else {
                format!("{} {}", "x".red(), label)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_tasks_added(&self, _phase: &ResearchPhase, count: usize) {
        if let Ok(slot) = self.phase_bar.lock()
            && let Some(pb) = slot.as_ref()
            && pb.length().is_some()
        {
            pb.inc_length(count as u64);
        }
    }

    fn on_phase_complete(&self, _phase: &ResearchPhase, elapsed: Duration) {
        if let Some(pb) = self.phase_bar.lock().ok().and_then(|mut slot| slot.take()) {
            pb.finish_with_message(format!("done in {:.2}s", elapsed.as_secs_f64()).green().to_string());
        }
    }

    fn on_conversation_ready(&self, elapsed: Duration) {
        let _ = self.multi.println(format!(
            "{} {} in {:.2}s",
            "->".cyan(),
            "Conversation created".bold(),
            elapsed.as_secs_f64()
        ));
    }
}

/// Plain line-per-event progress (no fancy UI)
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_phase_start(&self, phase: &ResearchPhase, iteration: usize, total_tasks: usize) {
        let name = ProgressReporter::prefix(phase, iteration);
        if total_tasks > 1 {
            eprintln!("{} {} ({} tasks)", "->".cyan(), name.bold(), total_tasks);
        } else {
            eprintln!("{} {}", "->".cyan(), name.bold());
        }
    }

    fn on_task_complete(&self, _phase: &ResearchPhase, label: &str, success: bool) {
        if success {
            eprintln!("  {} {}", "v".green(), label);
        } else {
            eprintln!("  {} {} (failed)", "x".red(), label);
        }
    }

    fn on_tasks_added(&self, _phase: &ResearchPhase, count: usize) {
        eprintln!("  {} summarizing {} sources", "->".cyan(), count);
    }

    fn on_phase_complete(&self, phase: &ResearchPhase, elapsed: Duration) {
        eprintln!(
            "  {}... done in {:.2}s",
            phase.display_name(),
            elapsed.as_secs_f64()
        );
    }

    fn on_conversation_ready(&self, elapsed: Duration) {
        eprintln!("{} Conversation created in {:.2}s", "->".cyan(), elapsed.as_secs_f64());
    }
}
