pub mod target_list;

pub use target_list::{TargetList, TargetSource, TargetSpec};
