mod config;
mod logging;

pub use config::{config_path, load_config};
pub use logging::init_logging;
