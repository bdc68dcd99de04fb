// Presentation layer - HTTP surface over the page model
pub mod app_state;
pub mod handlers;
