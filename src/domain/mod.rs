pub mod error;
pub mod region;

// Schema-less table module
pub mod table;
