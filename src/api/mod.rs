//! Access to the Listinator REST API.

mod client;

pub use client::{ClientError, ListinatorClient, API_PREFIX};
