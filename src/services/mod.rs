pub mod import;
pub mod ranking;
