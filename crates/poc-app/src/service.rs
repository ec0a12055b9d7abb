mod client;
mod fetch;
mod resolver;

pub use client::{SignatureClient, StatusReport};
pub use fetch::Fetcher;
pub use resolver::{probe, Resolver};
