pub mod sqlite_store;
pub mod sqlite_transaction;
