mod application;
mod data;
mod domain;
pub mod infrastructure;
mod presentation;
pub mod server;
