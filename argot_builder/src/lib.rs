//! Builder module for `argot`.
//! See [documentation root](https://docs.rs/argot/latest/argot/index.html) for full details.
#![deny(missing_docs)]
mod api;
mod constant;
mod matcher;
mod model;
mod parser;

pub use api::*;
pub use model::*;
pub use parser::{validate, ConfigError, GeneralParser, ParseError, ValidationErrors};

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
