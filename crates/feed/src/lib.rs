//! Feed ingestion for indexpush
//!
//! Checks that the feed is reachable, pulls the `entry/id` values out of an
//! Atom document and keeps them in a plain-text candidate store that the
//! orchestrator reads back.

pub mod atom;
pub mod error;
pub mod store;

pub use atom::*;
pub use error::*;
pub use store::*;
