mod client;
mod config;
mod controller;
mod error;
mod report;
mod sequence;
mod types;

pub use client::*;
pub use config::*;
pub use controller::*;
pub use error::*;
pub use report::*;
pub use sequence::*;
pub use types::*;
