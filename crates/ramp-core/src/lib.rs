//! Core types and trait definitions for the Ramp accessibility-point service.
//!
//! This crate is deliberately free of HTTP and database dependencies. It owns
//! the data model, the built-in seed points, the storage and discovery seams,
//! and the [`repository::PointRepository`] that merges and mutates points.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod discovery;
pub mod error;
pub mod merge;
pub mod overlay;
pub mod point;
pub mod repository;
pub mod seed;
pub mod session;

pub use error::{Error, Result};
