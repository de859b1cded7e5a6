//! Repository layer: entity-scoped database operations.
//!
//! Every function takes the owning professional's id; rows belonging to
//! another owner are invisible to it.

mod appointment;
mod client;
mod service;

pub use appointment::*;
pub use client::*;
pub use service::*;

use std::str::FromStr;

use super::DatabaseError;

/// Maps a stored enum column, reporting the offending value.
pub(crate) fn parse_enum<T>(raw: &str) -> Result<T, DatabaseError>
where
    T: FromStr<Err = DatabaseError>,
{
    T::from_str(raw)
}
