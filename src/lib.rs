pub mod agents;
pub mod app;
pub mod config;
pub mod credential;
pub mod persona;
pub mod session;
pub mod shared;
pub mod ui;
