mod configuration;
mod guard;
mod identity;
mod layer;
mod provider;
mod service;
mod token;

#[allow(unused_imports)]
pub use {configuration::*, guard::*, identity::*, layer::*, provider::*, service::*, token::*};
