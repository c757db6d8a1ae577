use anyhow::{bail, Result};
use colored::Colorize;
use std::time::Duration;

use crate::application::use_cases::batch_operation::{
    BatchOperationConfig, BatchOperationUseCase, BatchSummary,
};
use crate::application::use_cases::directory_operation::{
    DirectoryOperation, OperationKind, OperationSettings,
};
use crate::common::error::ModbatchError;
use crate::domain::value_objects::module_path::ModulePrefix;
use crate::infrastructure::filesystem::use_list_store::UseListStore;
use crate::infrastructure::process::command_executor::CommandExecutor;
use crate::presentation::cli::{BatchArgs, CommandContext, OutputFormat};
use crate::presentation::ui::display::{DisplayHelper, ProgressObserver};

/// Apply init, tidy or clean to a list of directories
pub struct BatchCommand {
    pub kind: OperationKind,
    pub args: BatchArgs,
    /// Module prefix taking precedence over the settings file
    pub prefix: Option<String>,
}

impl BatchCommand {
    pub fn new(kind: OperationKind, args: BatchArgs) -> Self {
        Self {
            kind,
            args,
            prefix: None,
        }
    }

    pub fn with_prefix(mut self, prefix: Option<String>) -> Self {
        self.prefix = prefix;
        self
    }

    /// Build the operation settings from the settings file and CLI overrides
    pub fn operation_settings(&self, context: &CommandContext) -> Result<OperationSettings> {
        let mut settings = OperationSettings::from_settings(&context.base_dir, &context.settings)?;

        if let Some(prefix) = &self.prefix {
            settings = settings.with_prefix(ModulePrefix::new(prefix).map_err(ModbatchError::from)?);
        }
        if self.args.timeout.is_some() {
            settings = settings.with_timeout(self.args.timeout);
        }

        Ok(settings)
    }

    /// Execute the batch command
    pub async fn execute(&self, context: &CommandContext) -> Result<()> {
        let settings = self.operation_settings(context)?;
        let prefix = settings.prefix.clone();

        let config = BatchOperationConfig::new()
            .with_specs(self.args.target_specs())
            .with_dry_run(self.args.dry_run);

        let use_case = BatchOperationUseCase::new(
            DirectoryOperation::new(self.kind, settings),
            UseListStore::new().with_file_name(&context.settings.list_file),
            CommandExecutor::new(),
            config,
        );

        let text_output = self.args.output == OutputFormat::Text;
        if text_output {
            let suffix = if self.args.dry_run { " (dry run)" } else { "" };
            context.display.info(&format!(
                "Running {} in {}{}",
                self.kind,
                context.base_dir.display(),
                suffix
            ));
            if self.kind == OperationKind::Init {
                context.display.info(&format!("Using module prefix {}", prefix));
            }
        }

        let mut observer =
            ProgressObserver::new(&context.display, text_output).with_output(context.verbose);
        let summary = use_case.execute_with(&mut observer).await?;
        observer.finish();

        match self.args.output {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
            OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&summary)?),
            OutputFormat::Text => print_summary(&context.display, &summary, context.verbose),
        }

        if self.args.strict && !summary.is_success() {
            bail!(
                "{} of {} directories failed",
                summary.failure_count,
                summary.total_count()
            );
        }

        Ok(())
    }
}

/// Print the aggregate result of a batch run
fn print_summary(display: &DisplayHelper, summary: &BatchSummary, verbose: bool) {
    if summary.total_count() == 0 {
        return;
    }

    if summary.dry_run {
        display.info(&format!(
            "Dry run: {} command(s) not executed",
            summary.skipped_count
        ));
    } else if summary.is_success() {
        display.success(&format!(
            "{} completed for {} directories",
            summary.operation, summary.success_count
        ));
    } else {
        println!(
            "{} {} finished with {} failure(s):",
            "⚠".yellow().bold(),
            summary.operation,
            summary.failure_count
        );
        for result in summary.failed_results() {
            let message = result.error_message.as_deref().unwrap_or("Unknown error");
            println!("  {}: {}", result.target.as_str().bold(), message.red());
        }
    }

    if verbose {
        println!("  Succeeded: {}", summary.success_count);
        println!("  Failed: {}", summary.failure_count);
        println!("  Skipped: {}", summary.skipped_count);
        println!(
            "  Time: {}",
            display.format_duration(Duration::from_millis(summary.total_execution_time_ms))
        );
    }
}
