//! Database seeding functionality
//!
//! Populates a fresh database with the sample content of the church site.

pub mod sample_content;

pub use sample_content::{SeedReport, seed_sample_content};
