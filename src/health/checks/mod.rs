//! Built-in health checks

pub mod build_info;
pub mod config;
pub mod router;

pub use build_info::BuildInfoCheck;
pub use config::ConfigCheck;
pub use router::RouterCheck;
