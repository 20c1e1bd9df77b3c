//! Gateway protocol definitions
//!
//! Frame format, op codes, close codes, and the payloads of the
//! connection handshake.

mod close_codes;
mod intents;
mod messages;
mod opcodes;
mod payloads;

pub use close_codes::CloseCode;
pub use intents::Intents;
pub use messages::GatewayMessage;
pub use opcodes::OpCode;
pub use payloads::{HelloPayload, IdentifyPayload, IdentifyProperties};
