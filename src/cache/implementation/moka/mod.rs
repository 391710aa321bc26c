mod cache;
mod expiry;
mod weigher;

#[allow(unused_imports)]
pub use {cache::*, expiry::*, weigher::*};
