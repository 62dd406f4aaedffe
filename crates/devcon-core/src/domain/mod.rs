//! Command model: the entities every registered command is built from.

pub mod capabilities;
pub mod category;
pub mod command;
pub mod leaf;

pub use capabilities::Capabilities;
pub use category::Category;
pub use command::{Command, Parameter, names_match};
pub use leaf::LeafCommand;
