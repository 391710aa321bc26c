mod layer;
mod service;

#[allow(unused_imports)]
pub use {layer::*, service::*};
