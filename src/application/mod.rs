/// Application layer
///
/// Use cases that apply the build tool and cleanup script to directory lists.
pub mod use_cases;
