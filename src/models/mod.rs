//! # Data Models
//!
//! SeaORM entities for the church site: tenants and the two content kinds
//! (events and info posts) that feed the homepage banners.

pub mod event;
pub mod info;
pub mod tenant;

pub use event::Entity as Event;
pub use info::Entity as Info;
pub use tenant::Entity as Tenant;
