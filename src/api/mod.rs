//! API client module for the clinic REST service

mod client;
mod error;
mod traits;

pub use client::ApiClient;
pub use traits::ApiClientTrait;

#[cfg(test)]
pub use traits::MockApiClientTrait;
