//! Headless core of the StoryProducer drafting tool: keyterm glossaries,
//! story workspaces and the JSON-lines protocol the UI talks to.

pub mod config;
pub mod error;
pub mod model;
pub mod parsers;
pub mod protocol;
pub mod services;

pub use error::{CoreError, Result};
