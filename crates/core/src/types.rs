/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Identifier assigned by the document store to a page or media record.
pub type DocumentId = String;
