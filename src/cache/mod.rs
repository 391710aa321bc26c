mod cache;
mod configuration;
mod entry;
mod hooks;
mod key;
mod response_cache;

/// Cache implementations.
pub mod implementation;

/// Cache middleware utilities.
pub mod middleware;

#[allow(unused_imports)]
pub use {cache::*, configuration::*, entry::*, hooks::*, key::*, response_cache::*};
