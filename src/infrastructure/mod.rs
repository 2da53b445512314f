pub mod browser;
pub mod config;
pub mod dom;
pub mod logging;
pub mod response;
pub mod transport;
