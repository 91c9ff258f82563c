/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar dates (campaign windows, delivery dates) carry no timezone.
pub type Date = chrono::NaiveDate;
