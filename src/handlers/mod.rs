pub mod health_handlers;
pub mod link_handlers;
