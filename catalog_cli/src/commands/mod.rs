//! CLI subcommand implementations.

pub mod auth;
pub mod create;
pub mod product;
pub mod products;
