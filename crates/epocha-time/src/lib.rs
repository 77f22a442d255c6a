//! Epocha Time Engine - one canonical instant, six synchronized views
//!
//! This crate implements the TimeState engine:
//! - Canonical instant and the zone that defines "local time"
//! - Read views: epoch seconds, locale string, UTC string, date field,
//!   time field, calendar selection
//! - Write operations that reconcile one view's edit against the instant
//!   without disturbing the fields it does not address
//! - Injected wall clock for the visibility refresh
//! - Calendar month model for pickers
//! - Host and named zone lookup

pub mod calendar;
pub mod clock;
pub mod display;
pub mod engine;
pub mod zone;

pub use calendar::*;
pub use clock::*;
pub use display::*;
pub use engine::*;
pub use zone::*;
