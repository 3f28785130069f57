pub mod adapters;
pub mod services;
pub mod use_cases;

pub use adapters::Adapters;
pub use services::Services;
pub use use_cases::UseCases;
