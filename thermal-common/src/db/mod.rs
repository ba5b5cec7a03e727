//! Record store schema and SQLite adapter

pub mod init;
pub mod records;

pub use init::{create_schema, init_database};
pub use records::SqliteRecordStore;
