//! Client for the packaging org's tooling API.
//!
//! The [`ToolingApi`] trait is the seam between the orchestration layer and
//! the remote service; [`ToolingClient`] is its REST implementation.

mod client;
mod query;
mod types;

pub use client::{ToolingApi, ToolingClient};
pub use query::{Constraint, Filter, build_query};
pub use types::{Package, PackageVersion, Session};

#[cfg(test)]
pub use client::MockToolingApi;
