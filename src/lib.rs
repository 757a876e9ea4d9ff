pub mod config;
pub mod editor;
pub mod http_server;
pub mod schema;
pub mod store;
pub mod tools;
