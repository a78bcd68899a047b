pub mod config;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

#[cfg(test)]
mod tests;
