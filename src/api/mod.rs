mod client;
pub mod payload;

pub use client::{ApiSource, SofaClient};
