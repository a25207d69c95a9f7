use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::http::HttpClient;

use super::query::{Constraint, Filter, build_query};
use super::types::{Package, PackageVersion, Session};

/// Default host for establishing sessions.
const DEFAULT_LOGIN_URL: &str = "https://login.salesforce.com";

/// API version path segment used for tooling queries.
const API_VERSION: &str = "v59.0";

/// Operations the packaging org exposes to this crate.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ToolingApi: Send + Sync {
    /// Establishes an authenticated session for the given credentials.
    async fn authenticate(&self, username: &str, password: &str) -> Result<Session>;

    /// Fetches every metadata package record visible to the session.
    async fn fetch_packages(&self, session: &Session) -> Result<Vec<Package>>;

    /// Fetches every version record owned by one of the given packages.
    ///
    /// The id set must not be empty; callers short-circuit the empty case
    /// without issuing a query.
    async fn fetch_versions(
        &self,
        session: &Session,
        package_ids: &[String],
    ) -> Result<Vec<PackageVersion>>;
}

/// Envelope wrapping every tooling query response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryResponse<T> {
    total_size: u64,
    done: bool,
    records: Vec<T>,
}

/// REST implementation of [`ToolingApi`].
pub struct ToolingClient {
    http: HttpClient,
    login_url: String,
}

impl ToolingClient {
    /// Creates a client, defaulting to the production login host.
    #[tracing::instrument(skip(client, login_url))]
    pub fn new(client: Client, login_url: Option<String>) -> Self {
        let login_url = login_url.unwrap_or_else(|| DEFAULT_LOGIN_URL.to_string());
        Self {
            http: HttpClient::new(client),
            login_url,
        }
    }

    async fn run_query<T: DeserializeOwned>(
        &self,
        session: &Session,
        entity: &str,
        fields: &[&str],
        filter: &Filter,
    ) -> Result<Vec<T>> {
        let url = format!(
            "{}/services/data/{}/tooling/query",
            session.instance_url, API_VERSION
        );
        let soql = build_query(entity, fields, filter);

        debug!("Querying {} records from {}...", entity, url);

        let response: QueryResponse<T> = self
            .http
            .get_json(&url, &session.access_token, &[("q", &soql)])
            .await
            .context(format!("Failed to query {} records", entity))?;

        debug!(
            "Received {} of {} {} records",
            response.records.len(),
            response.total_size,
            entity,
        );
        if !response.done {
            // Continuation handles are not followed.
            warn!(
                "{} query result is incomplete; remaining records were not fetched",
                entity,
            );
        }

        Ok(response.records)
    }
}

#[async_trait]
impl ToolingApi for ToolingClient {
    #[tracing::instrument(skip(self, password))]
    async fn authenticate(&self, username: &str, password: &str) -> Result<Session> {
        let url = format!("{}/services/oauth2/token", self.login_url);

        debug!("Authenticating {} against {}...", username, url);

        let params = [
            ("grant_type", "password"),
            ("username", username),
            ("password", password),
        ];
        self.http
            .post_form(&url, &params)
            .await
            .context("Failed to establish a session")
    }

    #[tracing::instrument(skip(self, session))]
    async fn fetch_packages(&self, session: &Session) -> Result<Vec<Package>> {
        self.run_query(
            session,
            "MetadataPackage",
            &["Id", "Name", "NamespacePrefix"],
            &Filter::new(),
        )
        .await
    }

    #[tracing::instrument(skip(self, session, package_ids))]
    async fn fetch_versions(
        &self,
        session: &Session,
        package_ids: &[String],
    ) -> Result<Vec<PackageVersion>> {
        let filter = Filter::new().constrain(
            "MetadataPackageId",
            Constraint::In(package_ids.to_vec()),
        );
        self.run_query(
            session,
            "MetadataPackageVersion",
            &[
                "MetadataPackageId",
                "Name",
                "BuildNumber",
                "ReleaseState",
                "MajorVersion",
                "MinorVersion",
                "PatchVersion",
            ],
            &filter,
        )
        .await
    }
}
