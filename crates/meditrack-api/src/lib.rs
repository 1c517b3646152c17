//! Wire contract for the MediTrack remote service.
//!
//! This crate knows the JSON shapes the service speaks and how a request
//! reaches it. It holds no client state: identity headers, reconciliation and
//! rendering live in `meditrack-core`.

pub mod transport;
pub mod wire;

pub use transport::*;
pub use wire::*;
