mod document;
mod message;
mod registry;

pub use document::*;
pub use message::*;
pub use registry::*;

pub extern crate bincode;
pub extern crate serde;
pub extern crate serde_json;
pub extern crate uuid;
