//! Navigable git blame: per-line commit attribution grouped into blocks,
//! with step-back-through-history navigation, served over a local HTTP API.

pub mod blame;
pub mod error;
pub mod git;
pub mod models;
pub mod routes;

#[cfg(test)]
mod test_utils;
