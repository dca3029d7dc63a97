//! Chat room UI components.

pub mod chat_header;
pub mod message_list;
pub mod message_bubble;
pub mod input_bar;
