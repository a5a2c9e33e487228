//! ALM Octane REST API: entity payloads and the blocking client

pub mod client;
pub mod entities;

pub use client::{Credentials, OctaneClient, OctaneSettings};
pub use entities::{EntityCollection, ManualTest, TestPhase};
