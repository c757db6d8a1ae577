pub mod commands;

use anyhow::Context;
use clap::{ArgAction, ArgMatches, Args, CommandFactory, FromArgMatches, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::exit;

use crate::application::use_cases::directory_operation::OperationKind;
use crate::common::logging;
use crate::domain::entities::target_list::TargetSpec;
use crate::infrastructure::filesystem::config_store::{ConfigStore, Settings};
use crate::presentation::ui::display::DisplayHelper;

use commands::{
    batch::BatchCommand, init::InitCommand, list::ListCommand,
    pseudo_version::PseudoVersionCommand,
};

/// Output format options for batch commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    Text,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
}

/// modbatch - batch helper for multi-module source trees
#[derive(Parser)]
#[command(name = "modbatch")]
#[command(about = "Initialize, tidy and clean many modules at once")]
#[command(version)]
#[command(long_version = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    ", built ",
    env!("BUILD_DATE"),
    " for ",
    env!("BUILD_TARGET"),
    ")"
))]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Base directory (defaults to current directory)
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<PathBuf>,

    /// Settings file (defaults to modbatch.yaml in the base directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by init, tidy and clean
#[derive(Debug, Clone, Args)]
pub struct BatchArgs {
    /// Directories to process, relative to the base directory
    #[arg(value_name = "DIR")]
    pub dirs: Vec<String>,

    /// Process every directory listed in use.list at this position (repeatable)
    #[arg(
        short = 'u',
        long,
        action = ArgAction::Append,
        num_args = 0,
        default_missing_value = "true"
    )]
    pub use_list: Vec<bool>,

    /// Directories and use.list markers in command-line order
    #[arg(skip)]
    pub targets: Vec<TargetSpec>,

    /// Show what would run without running it
    #[arg(long)]
    pub dry_run: bool,

    /// Exit with status 1 when any directory fails
    #[arg(long)]
    pub strict: bool,

    /// Kill a tool invocation after this many seconds
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Output format for the summary
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

impl BatchArgs {
    /// Targets in the order they were given.
    ///
    /// Without recorded positions (args not built by [`Cli::parse_ordered`])
    /// every `-u` is placed before the directories.
    pub fn target_specs(&self) -> Vec<TargetSpec> {
        if !self.targets.is_empty() {
            return self.targets.clone();
        }
        self.use_list
            .iter()
            .filter(|flag| **flag)
            .map(|_| TargetSpec::UseList)
            .chain(self.dirs.iter().cloned().map(TargetSpec::Dir))
            .collect()
    }

    /// Merge `DIR` values and `-u` occurrences by their position on the command line
    fn ordered_targets(matches: &ArgMatches) -> Vec<TargetSpec> {
        let mut positioned: Vec<(usize, TargetSpec)> = Vec::new();

        if let (Some(indices), Some(dirs)) = (
            matches.indices_of("dirs"),
            matches.get_many::<String>("dirs"),
        ) {
            positioned.extend(indices.zip(dirs).map(|(i, dir)| (i, TargetSpec::Dir(dir.clone()))));
        }
        if let Some(indices) = matches.indices_of("use_list") {
            positioned.extend(indices.map(|i| (i, TargetSpec::UseList)));
        }

        positioned.sort_by_key(|(index, _)| *index);
        positioned.into_iter().map(|(_, spec)| spec).collect()
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Recreate go.mod in each directory with a prefixed module path
    Init {
        /// Module path prefix
        #[arg(short, long, env = "MODBATCH_PREFIX")]
        prefix: Option<String>,

        #[command(flatten)]
        batch: BatchArgs,
    },

    /// Run `go mod tidy` in each directory
    Tidy {
        #[command(flatten)]
        batch: BatchArgs,
    },

    /// Run the cleanup script for each directory
    Clean {
        #[command(flatten)]
        batch: BatchArgs,
    },

    /// Print a pseudo-version for a commit time and hash
    PseudoVersion {
        /// Print the version without the leading '@'
        #[arg(long)]
        bare: bool,

        /// <EPOCH_SECONDS> <COMMIT_HASH>
        #[arg(value_name = "ARGS", allow_negative_numbers = true)]
        args: Vec<String>,
    },

    /// Print the entries of use.list on one line
    List,
}

impl Commands {
    fn batch_args_mut(&mut self) -> Option<&mut BatchArgs> {
        match self {
            Commands::Init { batch, .. } | Commands::Tidy { batch } | Commands::Clean { batch } => {
                Some(batch)
            }
            Commands::PseudoVersion { .. } | Commands::List => None,
        }
    }
}

impl Cli {
    /// Parse arguments and record where each `-u` appeared among the directories
    pub fn try_parse_ordered_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = Self::command().try_get_matches_from(args)?;
        let mut cli = Self::from_arg_matches(&matches)?;

        if let (Some((_, sub_matches)), Some(batch)) =
            (matches.subcommand(), cli.command.batch_args_mut())
        {
            batch.targets = BatchArgs::ordered_targets(sub_matches);
        }

        Ok(cli)
    }

    /// Parse `std::env::args_os`, exiting on error like [`Parser::parse`]
    pub fn parse_ordered() -> Self {
        Self::try_parse_ordered_from(env::args_os()).unwrap_or_else(|e| e.exit())
    }
}

/// Everything a command needs from the environment
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Directory all targets are resolved against
    pub base_dir: PathBuf,

    pub settings: Settings,

    pub display: DisplayHelper,

    pub verbose: bool,
}

/// CLI application runner
pub struct CliApp {
    cli: Cli,
}

impl CliApp {
    pub fn new() -> Self {
        Self {
            cli: Cli::parse_ordered(),
        }
    }

    pub fn from_cli(cli: Cli) -> Self {
        Self { cli }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        logging::init(self.cli.verbose);

        let display = DisplayHelper::auto(self.cli.no_color);
        colored::control::set_override(display.use_color);

        match self.handle_command(display).await {
            Ok(_) => Ok(()),
            Err(e) => {
                eprintln!("{} {:#}", "Error:".red().bold(), e);
                exit(1);
            }
        }
    }

    async fn handle_command(&self, display: DisplayHelper) -> anyhow::Result<()> {
        // pseudo-version needs neither a base directory nor settings
        if let Commands::PseudoVersion { bare, args } = &self.cli.command {
            return PseudoVersionCommand::new(args.clone(), *bare).execute();
        }

        let context = self.load_context(display)?;

        match &self.cli.command {
            Commands::Init { prefix, batch } => {
                InitCommand::new(prefix.clone(), batch.clone())
                    .execute(&context)
                    .await
            }
            Commands::Tidy { batch } => {
                BatchCommand::new(OperationKind::Tidy, batch.clone())
                    .execute(&context)
                    .await
            }
            Commands::Clean { batch } => {
                BatchCommand::new(OperationKind::Clean, batch.clone())
                    .execute(&context)
                    .await
            }
            Commands::List => ListCommand::new().execute(&context).await,
            // handled above
            Commands::PseudoVersion { .. } => Ok(()),
        }
    }

    /// Resolve the base directory and load settings from it
    fn load_context(&self, display: DisplayHelper) -> anyhow::Result<CommandContext> {
        let base_dir = match &self.cli.directory {
            Some(dir) => dir.clone(),
            None => env::current_dir().context("Failed to determine current directory")?,
        };

        let settings = ConfigStore::new()
            .load(self.cli.config.as_deref(), &base_dir)
            .map_err(crate::common::error::ModbatchError::from)?;

        Ok(CommandContext {
            base_dir,
            settings,
            display,
            verbose: self.cli.verbose,
        })
    }
}

impl Default for CliApp {
    fn default() -> Self {
        Self::new()
    }
}
