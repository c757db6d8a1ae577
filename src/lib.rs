//! # modbatch - Batch helper for multi-module source trees
//!
//! `modbatch` applies the same maintenance step to many module directories of
//! one source tree: recreating module manifests under a common path prefix,
//! tidying dependencies, and running a cleanup script. It also prints
//! pseudo-versions for untagged commits.
//!
//! ## Quick Start
//!
//! 1. List the module directories in `use.list`, one per line:
//!
//! ```text
//! lexer
//! parser
//! ./ir
//! ```
//!
//! 2. Initialize every listed module:
//!
//! ```bash
//! modbatch init -p github.com/acme/lang -u
//! ```
//!
//! 3. Tidy a couple of them explicitly:
//!
//! ```bash
//! modbatch tidy lexer parser
//! ```
//!
//! ## Architecture
//!
//! The crate is organized using clean architecture principles:
//!
//! - [`domain`]: Target paths, module paths and pseudo-versions
//! - [`application`]: The directory operations and the batch loop over them
//! - [`infrastructure`]: `use.list`, `modbatch.yaml` and process execution
//! - [`presentation`]: CLI interface and terminal output
//! - [`common`]: Shared error handling and logging
//!
//! ## Domain Model
//!
//! - [`domain::value_objects::target_path::TargetPath`]: A normalized directory relative to the base directory
//! - [`domain::value_objects::module_path::ModulePath`]: `<prefix>` or `<prefix>/<target>`
//! - [`domain::value_objects::pseudo_version::PseudoVersion`]: `@v0.0.0-<timestamp>-<hash12>`
//! - [`domain::entities::target_list::TargetList`]: Ordered targets with their origin
//!
//! ## Use Cases
//!
//! - [`application::use_cases::directory_operation`]: Plan and apply init, tidy or clean for one directory
//! - [`application::use_cases::batch_operation`]: Apply one operation to every target and summarize
//!
//! ## Error Handling
//!
//! - [`common::error::ModbatchError`]: Main error type with detailed context
//! - [`common::result::ModbatchResult`]: Type alias for `Result<T, ModbatchError>`
//!
//! ## Examples
//!
//! ```rust,no_run
//! use modbatch::application::use_cases::batch_operation::{
//!     BatchOperationConfig, BatchOperationUseCase,
//! };
//! use modbatch::application::use_cases::directory_operation::{
//!     DirectoryOperation, OperationKind, OperationSettings,
//! };
//! use modbatch::infrastructure::{CommandExecutor, UseListStore};
//!
//! # async fn example() -> modbatch::Result<()> {
//! let operation = DirectoryOperation::new(OperationKind::Tidy, OperationSettings::new("."));
//! let config = BatchOperationConfig::new().with_use_list().with_targets(["tools"]);
//!
//! let use_case =
//!     BatchOperationUseCase::new(operation, UseListStore::new(), CommandExecutor::new(), config);
//! let summary = use_case.execute().await?;
//!
//! println!("{} of {} directories tidied", summary.success_count, summary.total_count());
//! # Ok(())
//! # }
//! ```
//!
//! ```rust
//! use modbatch::domain::value_objects::format_pseudo_version;
//!
//! assert_eq!(
//!     format_pseudo_version(0, "abcdef1234567890").unwrap(),
//!     "@v0.0.0-19700101000000-abcdef123456"
//! );
//! ```

#![deny(rustdoc::broken_intra_doc_links)]

pub mod application;
pub mod common;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

// Re-export commonly used types for convenience
pub use crate::common::error::ModbatchError;
pub use crate::common::result::ModbatchResult as Result;
