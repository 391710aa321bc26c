// https://stackoverflow.com/a/61417700
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

mod clock;
mod configuration;
mod context;
mod error;
mod headers;
mod layer;
mod navigation;
mod service;

/// Typed API client.
pub mod api;

/// Authentication.
pub mod auth;

/// Cache.
pub mod cache;

/// Error routing.
pub mod routing;

/// Durable storage.
pub mod storage;

/// Transports.
pub mod transport;

pub use {clock::*, configuration::*, context::*, error::*, headers::*, layer::*, navigation::*, service::*};
