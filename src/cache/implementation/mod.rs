/// Moka cache implementation.
#[cfg(feature = "moka")]
pub mod moka;
