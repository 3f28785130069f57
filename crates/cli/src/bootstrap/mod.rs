pub mod config;
pub mod logging;
pub mod wordlist;

pub use config::load_config;
pub use logging::init_logging;
pub use wordlist::load_wordlist;
