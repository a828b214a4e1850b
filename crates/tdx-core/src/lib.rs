//! Core tdx library (config, session, auth, todo sync, route guard).

pub mod auth;
pub mod config;
pub mod guard;
pub mod http;
pub mod logging;
pub mod session;
pub mod todos;
