mod client;
mod clusters;
mod environments;
mod models;
mod projects;
mod teamspaces;
mod users;

#[allow(unused_imports)]
pub use {client::*, clusters::*, environments::*, models::*, projects::*, teamspaces::*, users::*};
