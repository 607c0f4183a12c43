//! Chat log entities.

pub mod model;

pub use model::{ChatMessage, CreateChatMessage};
