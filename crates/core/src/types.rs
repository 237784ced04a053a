/// All primary keys are time-ordered UUIDs (v7).
pub type DbId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Generate a fresh, monotonically sortable primary key.
pub fn new_id() -> DbId {
    uuid::Uuid::now_v7()
}
