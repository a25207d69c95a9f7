//! HTTP plumbing shared by the packaging service client.

mod client;

pub use client::HttpClient;
