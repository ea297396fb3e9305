pub mod document;
pub mod optimization;
pub mod user;
