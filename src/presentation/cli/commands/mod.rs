pub mod batch;
pub mod init;
pub mod list;
pub mod pseudo_version;

pub use batch::*;
pub use init::*;
pub use list::*;
pub use pseudo_version::*;
