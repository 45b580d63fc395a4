//! Wire format shared with the game server.
//!
//! Messages are JSON text frames. The transport itself lives in the client
//! binary; this module only encodes and decodes.

/// Inbound event envelope and outbound action messages.
pub mod messages;
