//! Wire codec and domain model registry for the system bridge WebSocket/HTTP
//! protocol. No I/O lives here — this crate only encodes, decodes, and
//! dispatches JSON; the root crate owns sockets, timeouts, and the
//! correlator.

pub mod event;
pub mod frame;
pub mod models;
pub mod registry;

pub use event::{EventSubType, EventType};
pub use frame::{decode, encode, Request, Response};
pub use registry::{DecodedPayload, Model, RegistryError};
