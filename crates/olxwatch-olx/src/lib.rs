//! `olxwatch-olx` — client for the public OLX offer-search API.

pub mod client;
pub mod types;

pub use client::OlxClient;
