pub mod api;
pub mod capture;
pub mod config;
pub mod page;
pub mod prometheus;
pub mod router;
pub mod sample;
pub mod server;
pub mod sinks;
pub mod time;
