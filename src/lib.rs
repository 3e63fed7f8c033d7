pub mod args;
pub mod commands;
mod config;
mod db;
mod error;
pub mod model;
pub mod services;
pub mod store;
mod utils;


pub use config::Config;
pub use error::Error;
pub use error::Result;
pub use error::{ErrorType, IntoResult};
