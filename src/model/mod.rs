//! Core data structures shared by the decoders and the analysis pipelines.
//!
//! - [`point`] – Cartesian [`Point`](point::Point) and the per-snapshot
//!   [`PointSet`](point::PointSet).
//! - [`bounds`] – Simulation-cell [`BoxBounds`](bounds::BoxBounds) used to
//!   convert scaled coordinates.
//! - [`filter`] – Particle-type selection applied while decoding.
//!
//! Decoders produce a `PointSet`; the depth/statistics engine, histogram
//! binner and geometric classifier consume it without caring which on-disk
//! encoding it came from.

pub mod bounds;
pub mod filter;
pub mod point;
