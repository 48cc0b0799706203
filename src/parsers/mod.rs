//! Chat export parsers for the supported platforms.
//!
//! Each parser implements [`Parser`](crate::parser::Parser) and walks one
//! export layout:
//!
//! - [`WhatsAppParser`] - directory of `*.txt` conversation files
//! - [`TelegramParser`] - directory of HTML conversation directories
//! - [`InstagramParser`] - directory of JSON conversation directories
//! - [`SkypeParser`] - single `messages.json`
//!
//! # Example
//!
//! ```rust
//! use chatcorpus::parser::Parser;
//! use chatcorpus::parsers::TelegramParser;
//!
//! let parser = TelegramParser::new();
//! assert_eq!(parser.name(), "Telegram");
//! ```

#[cfg(feature = "instagram")]
mod instagram;
#[cfg(feature = "skype")]
mod skype;
#[cfg(feature = "telegram")]
mod telegram;
#[cfg(feature = "whatsapp")]
mod whatsapp;

#[cfg(feature = "instagram")]
pub use instagram::InstagramParser;
#[cfg(feature = "skype")]
pub use skype::SkypeParser;
#[cfg(feature = "telegram")]
pub use telegram::TelegramParser;
#[cfg(feature = "whatsapp")]
pub use whatsapp::WhatsAppParser;
