//! Domain models for the MediTrack client.

mod doctor;
mod forms;
mod identity;
mod medication;

pub use doctor::*;
pub use forms::*;
pub use identity::*;
pub use medication::*;

pub use meditrack_api::RecordId;
