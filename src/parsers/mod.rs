//! Input format sources.
//!
//! Each source turns one export document into a sequence of
//! [`RawMessage`](crate::parser::RawMessage) views through the
//! [`MessageSource`](crate::parser::MessageSource) trait.
//!
//! # Available Sources
//!
//! - [`TelegramHtml`] - Telegram Desktop HTML exports (`messages.html`, `messages2.html`, ...)

mod telegram_html;

pub use telegram_html::TelegramHtml;
