pub mod module_path;
pub mod pseudo_version;
pub mod target_path;

pub use module_path::{ModulePath, ModulePathError, ModulePrefix, DEFAULT_MODULE_PREFIX};
pub use pseudo_version::{format_pseudo_version, PseudoVersion, PseudoVersionError};
pub use target_path::TargetPath;
