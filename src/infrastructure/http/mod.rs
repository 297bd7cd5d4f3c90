pub mod dto;
pub mod error;
pub mod handlers;
pub mod server;

pub use server::run_server;
