pub mod catalog;
pub mod sessions;
