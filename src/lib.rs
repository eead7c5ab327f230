#[macro_use]
extern crate serde_derive;

pub mod capabilities;
pub mod datatypes;
pub mod devices;
pub mod error;
pub mod oscillation;
pub mod protocol;

#[cfg(feature = "async")]
pub mod tokio;

pub use crate::{
    devices::{Config, Shelly1},
    error::{Error, Result},
};
