pub mod api;
pub mod cli;
pub mod config;
pub mod dto;
pub mod events;

pub use {api::Api, config::Config};
