/// Infrastructure layer modules
///
/// This layer provides concrete implementations for external system interactions:
/// - File system operations (use.list, modbatch.yaml)
/// - Process execution (build tool and cleanup script invocations)
pub mod filesystem;
pub mod process;

// Re-export commonly used types
pub use filesystem::{
    config_store::{ConfigStore, Settings},
    use_list_store::{UseListError, UseListStore},
};
pub use process::{CommandExecutor, ProcessRunner};
