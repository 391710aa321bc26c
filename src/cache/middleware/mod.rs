mod configuration;
mod hooks;
mod in_flight;
mod request;
mod upstream;

#[allow(unused_imports)]
pub use {configuration::*, hooks::*, in_flight::*, request::*, upstream::*};
