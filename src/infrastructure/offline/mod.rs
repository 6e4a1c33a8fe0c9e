mod mappers;
mod rows;
mod sqlite_store;

pub use sqlite_store::SqliteRecordStore;
