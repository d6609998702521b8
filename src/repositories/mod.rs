//! # Repository Layer
//!
//! Repositories encapsulate SeaORM operations for the content tables. Every
//! query is scoped to a tenant.

pub mod event;
pub mod info;

pub use event::{EventChanges, EventFilter, EventRepository, NewEvent};
pub use info::{InfoChanges, InfoFilter, InfoRepository, NewInfo};

/// Page window shared by the content listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl Page {
    fn apply<Q: sea_orm::QuerySelect>(self, mut query: Q) -> Q {
        if let Some(offset) = self.offset {
            query = query.offset(offset);
        }
        match (self.limit, self.offset) {
            (Some(limit), _) => query = query.limit(limit),
            // SQLite only accepts OFFSET after a LIMIT clause.
            (None, Some(_)) => query = query.limit(i64::MAX as u64),
            (None, None) => {}
        }
        query
    }
}
