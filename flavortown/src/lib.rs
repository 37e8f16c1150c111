mod client;
mod flavortown_url;
pub mod domain;

pub use client::*;
pub use flavortown_url::*;
