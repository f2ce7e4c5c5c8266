//! Base plugin trait definition.
//!
//! All plugins implement `Plugin`, which provides lifecycle hooks and
//! identifying metadata.

use crate::Result;

/// Base trait for all plugins.
///
/// Plugins are shared across threads behind `Arc`, so they must be `Send + Sync`
/// and use interior mutability for any state.
pub trait Plugin: Send + Sync {
    /// Unique kebab-case name used for registration and logging.
    fn name(&self) -> &str;

    fn version(&self) -> String;

    /// Called once when the plugin is registered.
    fn initialize(&self) -> Result<()>;

    /// Called once when the plugin is removed or the registry shuts down.
    fn shutdown(&self) -> Result<()>;

    fn description(&self) -> &str {
        ""
    }
}
