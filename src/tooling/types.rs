use serde::{Deserialize, Serialize};
use std::fmt;

/// An authenticated session against a packaging org.
///
/// Produced by authentication and required by every query. The token is
/// only valid for the instance it was issued by.
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    /// Bearer token accompanying every query.
    pub access_token: String,
    /// Base URL of the org instance the session is bound to.
    pub instance_url: String,
}

/// A metadata package record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Package {
    pub id: String,
    pub name: String,
    /// Namespace prefix of the owning org; empty for unmanaged packages.
    #[serde(default)]
    pub namespace_prefix: String,
}

/// A version record belonging to a metadata package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PackageVersion {
    /// Id of the owning package.
    pub metadata_package_id: String,
    pub name: String,
    pub build_number: u32,
    /// Lifecycle state as reported by the org (e.g. "Released", "Beta").
    pub release_state: String,
    pub major_version: u32,
    pub minor_version: u32,
    pub patch_version: u32,
}

impl fmt::Display for PackageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}",
            self.major_version, self.minor_version, self.patch_version
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_deserialize() {
        let package: Package = serde_json::from_str(
            r#"{
                "attributes": {"type": "MetadataPackage"},
                "Id": "033000000000001",
                "Name": "Alpha",
                "NamespacePrefix": "alp"
            }"#,
        )
        .unwrap();

        assert_eq!(
            package,
            Package {
                id: "033000000000001".to_string(),
                name: "Alpha".to_string(),
                namespace_prefix: "alp".to_string(),
            }
        );
    }

    #[test]
    fn test_package_deserialize_without_namespace() {
        let package: Package =
            serde_json::from_str(r#"{"Id": "033000000000002", "Name": "Beta"}"#).unwrap();
        assert_eq!(package.namespace_prefix, "");
    }

    #[test]
    fn test_version_deserialize() {
        let version: PackageVersion = serde_json::from_str(
            r#"{
                "MetadataPackageId": "033000000000001",
                "Name": "Spring Release",
                "BuildNumber": 4,
                "ReleaseState": "Released",
                "MajorVersion": 1,
                "MinorVersion": 2,
                "PatchVersion": 3
            }"#,
        )
        .unwrap();

        assert_eq!(version.metadata_package_id, "033000000000001");
        assert_eq!(version.build_number, 4);
        assert_eq!(version.release_state, "Released");
    }

    #[test]
    fn test_version_display() {
        let version = PackageVersion {
            metadata_package_id: "033000000000001".to_string(),
            name: "Spring Release".to_string(),
            build_number: 4,
            release_state: "Released".to_string(),
            major_version: 1,
            minor_version: 2,
            patch_version: 3,
        };
        assert_eq!(version.to_string(), "1.2.3");
    }
}
