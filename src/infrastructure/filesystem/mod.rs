pub mod config_store;
pub mod use_list_store;
