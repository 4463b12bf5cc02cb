pub mod app;
pub mod catalog;
pub mod magnetic;
pub mod util;
