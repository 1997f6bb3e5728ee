pub mod router;
pub mod admin;
pub mod chat;
pub mod faqs;
pub mod health;
