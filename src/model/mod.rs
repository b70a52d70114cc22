//! Cross-guild forwarding configuration.

pub mod bindings;
pub mod guild;

pub use bindings::{BuffAlertBinding, DirectionalConfig};
pub use guild::GuildConfiguration;
