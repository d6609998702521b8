//! # Church Site API Library
//!
//! Core of the church website backend: tenant-scoped events and info posts,
//! and the homepage banner feed aggregated from both.

pub mod banners;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod seeds;
pub mod server;
pub mod telemetry;
pub mod tenant;
pub use migration;
