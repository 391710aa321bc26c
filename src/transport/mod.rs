#[cfg(feature = "reqwest")]
mod reqwest;

#[cfg(feature = "reqwest")]
#[allow(unused_imports)]
pub use self::reqwest::*;
