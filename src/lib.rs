pub mod bridge;
pub mod config;
pub mod discover;
pub mod error;

pub mod prelude {
    pub use crate::bridge::{Bridge, Envelope, ErrorReply, Forward, HttpForwarder, Outcome};
    pub use crate::config::{BridgeConfig, Endpoint};
    pub use crate::error::Result;
}
