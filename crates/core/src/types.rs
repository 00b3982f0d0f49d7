/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Monetary amounts (object cost, payments) map to NUMERIC(15,2).
pub type Money = rust_decimal::Decimal;
