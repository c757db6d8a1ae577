use anyhow::Result;

use crate::common::error::ModbatchError;
use crate::domain::value_objects::pseudo_version::{PseudoVersion, USAGE};

/// Print a pseudo-version for `<EPOCH_SECONDS> <COMMIT_HASH>`
pub struct PseudoVersionCommand {
    /// Positional arguments as given on the command line
    pub args: Vec<String>,
    /// Omit the leading '@'
    pub bare: bool,
}

impl PseudoVersionCommand {
    pub fn new(args: Vec<String>, bare: bool) -> Self {
        Self { args, bare }
    }

    /// Render the version line without printing it
    pub fn render(&self) -> Result<String, ModbatchError> {
        let version = PseudoVersion::from_args(&self.args)?;
        Ok(if self.bare {
            version.version()
        } else {
            version.to_string()
        })
    }

    /// Execute the pseudo-version command
    pub fn execute(&self) -> Result<()> {
        match self.render() {
            Ok(line) => {
                println!("{}", line);
                Ok(())
            }
            Err(e) => {
                eprintln!("{}", USAGE);
                Err(e.into())
            }
        }
    }
}
