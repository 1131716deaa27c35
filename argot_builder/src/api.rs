mod arguments;
mod core;
mod registry;
mod schema;

pub use self::core::*;
pub use arguments::*;
pub use registry::*;
pub use schema::*;
