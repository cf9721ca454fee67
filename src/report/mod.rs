pub mod display;
pub mod summary;
