pub mod calc;
pub mod config;
pub mod form;
pub mod logging;
pub mod pages;
pub mod server;
pub mod utils;
