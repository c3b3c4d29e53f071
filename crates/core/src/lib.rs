//! Ad space marketplace domain logic.
//!
//! Building blocks shared by the API server and anything else that renders
//! the marketplace:
//!
//! - [`catalog`]: the immutable magazine / package catalog.
//! - [`filter`]: search and category filtering over the catalog.
//! - [`booking`]: the four-step ad booking state machine.
//! - [`navigation`]: top-level view selection composing the above.
//! - [`covers`] and [`flipbook`]: render-only state for the issue archive.
//!
//! Everything here is synchronous except cover generation, which goes
//! through the async [`covers::CoverProducer`] seam.

pub mod booking;
pub mod catalog;
pub mod covers;
pub mod error;
pub mod filter;
pub mod flipbook;
pub mod navigation;
pub mod types;

mod seed;
