//! Retrieval of metadata packages and their versions from a packaging org.

use std::collections::HashMap;
use std::fmt;

use log::{debug, warn};

use crate::tooling::{Package, PackageVersion, Session, ToolingApi};

/// A package paired with the versions that belong to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageInfo {
    pub package: Package,
    /// Versions owned by this package, in the order the org returned them.
    pub versions: Vec<PackageVersion>,
}

/// Failure of [`get_package_info`], classified by the step that failed.
///
/// Both variants carry the underlying client error unchanged.
#[derive(Debug)]
pub enum Error {
    /// A session could not be established.
    Authentication(anyhow::Error),
    /// The package or version query failed.
    Query(anyhow::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Authentication(source) => write!(f, "Authentication failed: {}", source),
            Error::Query(source) => write!(f, "Query failed: {}", source),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Authentication(source) | Error::Query(source) => Some(source.as_ref()),
        }
    }
}

/// Fetches every metadata package in the org, with its versions attached.
///
/// Authenticates with the given credentials, queries the package records,
/// queries the version records owned by them, and joins the two in memory.
/// The first failing step aborts the whole operation; no partial result is
/// ever returned.
#[tracing::instrument(skip(api, password))]
pub async fn get_package_info(
    api: &impl ToolingApi,
    username: &str,
    password: &str,
) -> Result<Vec<PackageInfo>, Error> {
    let session = api
        .authenticate(username, password)
        .await
        .map_err(Error::Authentication)?;

    let packages = api.fetch_packages(&session).await.map_err(Error::Query)?;

    let versions = fetch_versions(api, &session, &packages)
        .await
        .map_err(Error::Query)?;

    Ok(attach_versions(packages, versions))
}

/// Fetches the versions owned by the given packages.
///
/// An empty package list yields an empty version list without a query.
async fn fetch_versions(
    api: &impl ToolingApi,
    session: &Session,
    packages: &[Package],
) -> anyhow::Result<Vec<PackageVersion>> {
    if packages.is_empty() {
        debug!("No packages to fetch versions for");
        return Ok(Vec::new());
    }

    let ids: Vec<String> = packages.iter().map(|package| package.id.clone()).collect();
    api.fetch_versions(session, &ids).await
}

/// Attaches each version to the package owning it, preserving version order.
fn attach_versions(packages: Vec<Package>, versions: Vec<PackageVersion>) -> Vec<PackageInfo> {
    // Ids are unique; keep the first owner if the org ever returns duplicates.
    let mut index = HashMap::new();
    for (position, package) in packages.iter().enumerate() {
        index.entry(package.id.clone()).or_insert(position);
    }

    let mut infos: Vec<PackageInfo> = packages
        .into_iter()
        .map(|package| PackageInfo {
            package,
            versions: Vec::new(),
        })
        .collect();

    for version in versions {
        match index.get(version.metadata_package_id.as_str()) {
            Some(&position) => infos[position].versions.push(version),
            None => warn!(
                "Dropping version {} ({}) of unknown package {}",
                version.name, version, version.metadata_package_id,
            ),
        }
    }

    infos
}
