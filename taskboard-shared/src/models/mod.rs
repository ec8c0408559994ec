/// Data models for Taskboard
///
/// This module contains the persisted entities and their PostgreSQL
/// operations:
///
/// - `user`: Accounts with a role (admin or user)
/// - `task`: Units of work tracked on the kanban board
/// - `comment`: The single free-text note attached to a task
///
/// Each model exposes async methods taking a `&PgPool`; the in-memory store
/// in [`crate::store::memory`] mirrors the same semantics.

pub mod comment;
pub mod task;
pub mod user;

use serde::{de, Deserialize, Deserializer};
use std::{fmt::Display, str::FromStr};

/// Deserializes a field that distinguishes "absent" from "explicitly null"
///
/// Combined with `#[serde(default)]`, a missing key yields `None`, `null`
/// yields `Some(None)` and a value yields `Some(Some(value))`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Deserializes an optional query value, treating an empty one as absent
///
/// `?status=` means "no status filter", not an unknown status. Non-empty
/// values are parsed with `FromStr`.
pub fn empty_as_none<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: FromStr,
    T::Err: Display,
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => {
            raw.trim().parse().map(Some).map_err(de::Error::custom)
        }
        _ => Ok(None),
    }
}
