//! screening-core
//!
//! Pure domain types and identity normalization. No I/O. This is the shared
//! vocabulary of the screening system: who a patient is, what they answered,
//! and what the instruments concluded.

pub mod error;
pub mod identity;
pub mod models;
