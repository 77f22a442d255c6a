//! Epocha Core - Fundamental types for the time-state engine
//!
//! This crate defines the types shared by every layer:
//! - The canonical instant (`EpochSeconds`)
//! - Wall-clock time of day (`TimeOfDay`)
//! - Raw epoch input as handed over by a presentation layer (`EpochInput`)
//! - Strict parsers for the date and time fields
//! - The error taxonomy

pub mod error;
pub mod field;
pub mod time;

pub use error::*;
pub use field::*;
pub use time::*;
