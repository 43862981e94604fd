/// Primary-key type for every table (PostgreSQL BIGSERIAL).
pub type DbId = i64;

/// Timestamps are always UTC; periods and check-ins never carry a local zone.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
