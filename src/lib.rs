pub mod api;
pub mod app;
pub mod config;
pub mod errors;
pub mod results;
pub mod session;
pub mod upload;
pub mod utils;

#[cfg(test)]
mod testing;
