use colored::Colorize;
use console::Term;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

use crate::application::use_cases::batch_operation::{
    BatchObserver, OperationResult, OperationStatus,
};
use crate::domain::value_objects::target_path::TargetPath;

/// Display utilities for the CLI interface
#[derive(Debug, Clone)]
pub struct DisplayHelper {
    pub use_color: bool,
    pub terminal: Term,
}

impl DisplayHelper {
    /// Create a new DisplayHelper
    pub fn new(use_color: bool) -> Self {
        Self {
            use_color,
            terminal: Term::stderr(),
        }
    }

    /// Create a DisplayHelper with color detection.
    ///
    /// Color is off when `no_color` is set, when `NO_COLOR` is present in the
    /// environment, or when stdout is not a terminal.
    pub fn auto(no_color: bool) -> Self {
        Self::new(Self::detect_color(
            no_color,
            std::env::var_os("NO_COLOR").is_some(),
            atty::is(atty::Stream::Stdout),
        ))
    }

    fn detect_color(no_color_flag: bool, no_color_env: bool, stdout_is_tty: bool) -> bool {
        !no_color_flag && !no_color_env && stdout_is_tty
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        println!("{} {}", "✓".green().bold(), message);
    }

    /// Print a warning message. Warnings go to stderr so machine-readable
    /// stdout stays intact.
    pub fn warning(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow().bold(), message);
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        println!("{} {}", "::".blue().bold(), message);
    }

    /// Print captured tool output, indented under the target it belongs to
    pub fn print_output(&self, stdout: &str, stderr: &str) {
        for line in Self::output_lines(stdout, stderr) {
            println!("    {}", line.dimmed());
        }
    }

    fn output_lines<'s>(stdout: &'s str, stderr: &'s str) -> impl Iterator<Item = &'s str> {
        stdout
            .lines()
            .chain(stderr.lines())
            .filter(|line| !line.trim().is_empty())
    }

    /// Format a command with appropriate styling
    pub fn format_command(&self, command: &str) -> String {
        if self.use_color {
            command.magenta().to_string()
        } else {
            format!("`{}`", command)
        }
    }

    /// Format a target directory with appropriate styling
    pub fn format_target(&self, target: &str) -> String {
        target.cyan().bold().to_string()
    }

    /// Format a duration in human-readable format
    pub fn format_duration(&self, duration: Duration) -> String {
        let secs = duration.as_secs();
        let millis = duration.subsec_millis();

        if secs > 60 {
            format!("{}m {}s", secs / 60, secs % 60)
        } else if secs > 0 {
            format!("{}.{}s", secs, millis / 100)
        } else {
            format!("{}ms", millis)
        }
    }

    /// Create a progress bar on stderr. Hidden unless color is enabled and
    /// stderr is a terminal.
    pub fn create_progress_bar(&self, len: u64) -> ProgressBar {
        if !self.use_color || !self.terminal.is_term() {
            return ProgressBar::with_draw_target(Some(len), ProgressDrawTarget::hidden());
        }

        let pb = ProgressBar::with_draw_target(Some(len), ProgressDrawTarget::stderr());
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:30.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    }
}

/// Prints per-target progress of a batch run.
///
/// With `show_targets` off only warnings are printed, which keeps stdout
/// clean for `--output json` and `--output yaml`.
pub struct ProgressObserver<'a> {
    display: &'a DisplayHelper,
    show_targets: bool,
    show_output: bool,
    bar: Option<ProgressBar>,
}

impl<'a> ProgressObserver<'a> {
    pub fn new(display: &'a DisplayHelper, show_targets: bool) -> Self {
        Self {
            display,
            show_targets,
            show_output: false,
            bar: None,
        }
    }

    /// Also echo what each tool printed (`--verbose`)
    pub fn with_output(mut self, show_output: bool) -> Self {
        self.show_output = show_output;
        self
    }

    /// Remove the progress bar, if one was drawn
    pub fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }

    fn print(&self, f: impl FnOnce()) {
        match &self.bar {
            Some(bar) => bar.suspend(f),
            None => f(),
        }
    }

    fn print_result(&self, result: &OperationResult) {
        let target = self.display.format_target(result.target.as_str());
        match result.status {
            OperationStatus::Success => self.display.success(&target),
            OperationStatus::Failed => {
                let message = result.error_message.as_deref().unwrap_or("failed");
                println!("{} {}: {}", "✗".red().bold(), target, message.red());
            }
            OperationStatus::Skipped => {
                let invocation = result.invocation.as_deref().unwrap_or_default();
                println!(
                    "{} {}: {}",
                    "→".cyan(),
                    target,
                    self.display.format_command(invocation)
                );
            }
        }
        if self.show_output {
            self.display.print_output(&result.stdout, &result.stderr);
        }
    }
}

impl BatchObserver for ProgressObserver<'_> {
    fn on_warning(&mut self, message: &str) {
        self.print(|| self.display.warning(message));
    }

    fn on_start(&mut self, index: usize, total: usize, target: &TargetPath) {
        if !self.show_targets {
            return;
        }
        let bar = self
            .bar
            .get_or_insert_with(|| self.display.create_progress_bar(total as u64));
        bar.set_position(index as u64);
        bar.set_message(target.to_string());
    }

    fn on_finish(&mut self, result: &OperationResult) {
        if !self.show_targets {
            return;
        }
        self.print(|| self.print_result(result));
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }
}

impl Drop for ProgressObserver<'_> {
    fn drop(&mut self) {
        self.finish();
    }
}
