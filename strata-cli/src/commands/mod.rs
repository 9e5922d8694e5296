//! CLI command implementations.
//!
//! - `collapse`: Collapse a fragment directory into one configuration file
//! - `validate`: Check collapsed configuration files
//! - `resolve`: Resolve the startup configuration from the environment
//! - `show`: Show a category's default path and override variable

pub mod collapse;
pub mod resolve;
pub mod show;
pub mod validate;

pub use collapse::CollapseCommand;
pub use resolve::ResolveCommand;
pub use show::ShowCommand;
pub use validate::ValidateCommand;
