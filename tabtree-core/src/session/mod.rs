//! Session snapshots
//!
//! A snapshot is a plain hierarchical description of the forest: URLs,
//! titles, flags and nesting, with no tab handles. Restoring builds a
//! fresh tree with fresh handles, so snapshots stay valid across
//! processes and across file round-trips.

mod snapshot;

pub use snapshot::{SESSION_VERSION, SessionError, SessionSnapshot, TabSnapshot};
