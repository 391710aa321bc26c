mod invalidation;
mod key;
mod resource;

#[allow(unused_imports)]
pub use {invalidation::*, key::*, resource::*};
