pub mod config;
pub mod search;

pub use config::{run_config_init, run_config_show};
pub use search::{run_search, SearchArgs};
