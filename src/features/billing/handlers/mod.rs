pub mod billing_handler;

pub use billing_handler::*;
