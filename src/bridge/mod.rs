//! Cross-guild forwarding of gear checks and buff alerts.
//!
//! ## Module Structure
//!
//! - `classify`: decides what kind of message came in
//! - `formatter`: notification and reply text
//! - `orchestrator`: the forwarding flow (`Bridge` struct)
//! - `channels`: per-channel ordered dispatch
//! - `platform`: the chat capabilities the flow depends on

pub mod channels;
pub mod classify;
pub mod formatter;
pub mod orchestrator;
pub mod platform;

pub use channels::ChannelQueues;
pub use orchestrator::Bridge;
pub use platform::ChatPlatform;
