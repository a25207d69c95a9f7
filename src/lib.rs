pub mod http;
pub mod org;
pub mod tooling;
