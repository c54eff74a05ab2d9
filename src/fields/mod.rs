//! Field model for timer and tracker metadata
//!
//! This module provides:
//! - **Values**: The tagged value type attached to each field
//! - **Map**: The string-keyed field map with clear-to-default semantics
//! - **Well-known keys**: The fixed set of keys with typed accessors
//!   and documented defaults

mod map;
mod value;
pub mod well_known;


pub use map::FieldMap;
pub use value::FieldValue;
