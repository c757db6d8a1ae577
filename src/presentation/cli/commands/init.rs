use anyhow::Result;
use tracing::debug;

use super::batch::BatchCommand;
use crate::application::use_cases::directory_operation::OperationKind;
use crate::presentation::cli::{BatchArgs, CommandContext};

/// Recreate the module manifest in each directory
pub struct InitCommand {
    /// Prefix from `--prefix` or `MODBATCH_PREFIX`
    pub prefix: Option<String>,
    pub args: BatchArgs,
}

impl InitCommand {
    pub fn new(prefix: Option<String>, args: BatchArgs) -> Self {
        Self { prefix, args }
    }

    /// Execute the init command
    pub async fn execute(&self, context: &CommandContext) -> Result<()> {
        match &self.prefix {
            Some(prefix) => debug!("Prefix {} given on the command line", prefix),
            None => debug!("Prefix {} taken from settings", context.settings.prefix),
        }

        BatchCommand::new(OperationKind::Init, self.args.clone())
            .with_prefix(self.prefix.clone())
            .execute(context)
            .await
    }
}
