// Web front end: axum routes and tera views.

pub mod server;
pub mod views;
