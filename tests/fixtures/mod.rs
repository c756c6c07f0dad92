//! Test fixtures for route-preview.
//!
//! Provides runs along real Las Vegas streets (coordinates from
//! OpenStreetMap) and helpers to turn them into encoded polylines and
//! activity JSON.

pub mod routes;

pub use routes::*;
