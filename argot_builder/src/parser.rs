mod base;
mod interface;
mod middleware;
mod printer;
mod validator;

pub use base::*;
pub use middleware::GeneralParser;
pub use validator::validate;

pub(crate) use interface::{ConsoleInterface, UserInterface};
pub(crate) use printer::Printer;

#[cfg(test)]
pub(crate) use interface::util;
