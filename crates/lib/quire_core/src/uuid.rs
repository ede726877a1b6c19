// Record identifiers.
//
// Users and posts are keyed by UUIDv7 generated app-side, so listing by id
// follows creation order in both the in-memory and PostgreSQL stores.

use uuid::Uuid;

/// Generate a new record id (UUIDv7, timestamp-sortable).
pub fn new_id() -> Uuid {
    Uuid::now_v7()
}

/// Parse a record id from a path segment or token subject.
pub fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}
