use anyhow::Result;

use crate::common::error::ModbatchError;
use crate::infrastructure::filesystem::use_list_store::UseListStore;
use crate::presentation::cli::CommandContext;

/// Print the entries of the list file joined by single spaces
#[derive(Debug, Default)]
pub struct ListCommand;

impl ListCommand {
    pub fn new() -> Self {
        Self
    }

    /// Execute the list command
    ///
    /// A missing list file prints a warning and nothing on stdout.
    pub async fn execute(&self, context: &CommandContext) -> Result<()> {
        let store = UseListStore::new().with_file_name(&context.settings.list_file);

        match store.load_joined(&context.base_dir).await {
            Ok(line) => {
                println!("{}", line);
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                context.display.warning(&e.to_string());
                Ok(())
            }
            Err(e) => Err(ModbatchError::from(e).into()),
        }
    }
}
