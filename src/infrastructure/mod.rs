pub mod cache;
pub mod notify;
pub mod offline;
