pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod logging;
pub mod recipes;
pub mod repo;
pub mod seed;
pub mod state;
pub mod validation;

#[cfg(test)]
mod test_support;
