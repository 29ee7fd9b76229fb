//! HTTP adapter - the transport gateway.
//!
//! Accepts signed, normalized inbound event JSON and answers with the
//! outbound prompt JSON the transport renders for the user.

mod dto;
mod handlers;
mod routes;
mod signature;

pub use dto::{ErrorDto, EventKindDto, InboundEventDto, PromptDto, UserDto};
pub use handlers::AppState;
pub use routes::gateway_router;
pub use signature::{sign_payload, SignatureError, SignatureVerifier, SIGNATURE_HEADER};
