//! Generation layer: the HTTP client for the remote text-generation backend.

pub mod client;

pub use client::{EventClient, GenerateError};
