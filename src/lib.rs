#![doc = "The `collabhub` library crate."]
#![doc = ""]
#![doc = "A minimal team collaboration backend: account registration and login with"]
#![doc = "bcrypt-hashed passwords and JWT bearer tokens, plus projects and tasks owned by"]
#![doc = "the authenticated user. All data lives in process memory behind the"]
#![doc = "`store::Repository` trait. The binary (`main.rs`) reads configuration and"]
#![doc = "serves `routes::configure` over HTTP."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

pub use crate::error::AppError;
pub use crate::state::AppState;
