pub mod chat_log;
pub mod faq;
pub mod user;
