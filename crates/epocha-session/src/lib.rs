//! Epocha Session - the contract between the time engine and a view
//!
//! A view hosts one `Session`. The session:
//! 1. Focuses the epoch control on mount, content selected
//! 2. Accepts edits tagged by the representation they came from
//! 3. Applies them to the engine and bumps the render revision
//! 4. Turns a hidden -> visible transition into a refresh plus a focus request
//! 5. Produces snapshots of all six representations for rendering
//! 6. Keeps a calendar browsing cursor that snaps back to the instant's month

pub mod edit;
pub mod session;

pub use edit::*;
pub use session::*;
