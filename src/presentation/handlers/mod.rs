mod extract;
mod health;

pub use extract::extract_handler;
pub use health::health_handler;
