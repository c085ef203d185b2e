//! Request tickets.
//!
//! A screen issues a ticket when it hands a model call to the host and accepts
//! the outcome only while that ticket is still outstanding. Leaving or
//! resetting the screen drops the ticket, so a late outcome is refused as stale
//! instead of landing in whatever screen is mounted by then.

use serde::Serializer;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(Uuid);

impl Ticket {
    pub fn issue() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Serializes an outstanding-ticket slot as a plain "loading" flag.
pub fn serialize_outstanding<S: Serializer>(
    ticket: &Option<Ticket>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_bool(ticket.is_some())
}
