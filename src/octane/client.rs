//! Blocking HTTP client for the Octane REST API
//!
//! Signs in once, keeps the session cookie, then talks to the workspace
//! collections used by the migration. All calls are synchronous.

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Method;
use serde_json::json;
use std::time::Duration;

use crate::core::error::MigrationError;
use crate::core::migration::TestApi;
use crate::octane::entities::{EntityCollection, ManualTest};

/// Header Octane requires on REST calls made outside its own UI
pub const CLIENT_TYPE_HEADER: &str = "hpeclienttype";
pub const CLIENT_TYPE: &str = "HPE_REST_API_TECH_PREVIEW";

/// How to sign in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// API access key
    ApiKey {
        client_id: String,
        client_secret: String,
    },
    User {
        user: String,
        password: String,
    },
}

impl Credentials {
    fn sign_in_body(&self) -> serde_json::Value {
        match self {
            Credentials::ApiKey {
                client_id,
                client_secret,
            } => json!({ "client_id": client_id, "client_secret": client_secret }),
            Credentials::User { user, password } => json!({ "user": user, "password": password }),
        }
    }
}

/// Connection settings for one shared space / workspace
#[derive(Debug, Clone)]
pub struct OctaneSettings {
    pub server: String,
    pub shared_space: u64,
    pub workspace: u64,
    pub credentials: Credentials,
    pub timeout: Duration,
}

impl OctaneSettings {
    fn server_root(&self) -> &str {
        self.server.trim_end_matches('/')
    }

    pub fn sign_in_url(&self) -> String {
        format!("{}/authentication/sign_in", self.server_root())
    }

    /// `{server}/api/shared_spaces/{ss}/workspaces/{ws}`
    pub fn workspace_url(&self) -> String {
        format!(
            "{}/api/shared_spaces/{}/workspaces/{}",
            self.server_root(),
            self.shared_space,
            self.workspace
        )
    }

    pub fn tests_url(&self) -> String {
        format!("{}/tests", self.workspace_url())
    }

    pub fn script_url(&self, test_id: &str) -> String {
        format!("{}/tests/{}/script", self.workspace_url(), test_id)
    }

    pub fn test_data_tables_url(&self) -> String {
        format!("{}/test_data_tables", self.workspace_url())
    }
}

pub struct OctaneClient {
    http: Client,
    settings: OctaneSettings,
}

impl OctaneClient {
    /// Build the HTTP client and sign in
    pub fn connect(settings: OctaneSettings) -> Result<Self, MigrationError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CLIENT_TYPE_HEADER, HeaderValue::from_static(CLIENT_TYPE));

        let http = Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .timeout(settings.timeout)
            .build()?;

        let client = Self { http, settings };
        client.sign_in()?;
        Ok(client)
    }

    fn sign_in(&self) -> Result<(), MigrationError> {
        let url = self.settings.sign_in_url();
        log::debug!("POST {}", url);
        let response = self
            .http
            .post(&url)
            .body(self.settings.credentials.sign_in_body().to_string())
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(MigrationError::Auth {
                status: status.as_u16(),
            });
        }
        log::info!("Signed in to {}", self.settings.server_root());
        Ok(())
    }

    /// Send a JSON body and return the response text, failing on non-2xx
    fn send(&self, method: Method, url: &str, body: String) -> Result<String, MigrationError> {
        log::debug!("{} {}", method, url);
        let response = self.http.request(method.clone(), url).body(body).send()?;
        let status = response.status();
        let text = response.text()?;

        if !status.is_success() {
            return Err(MigrationError::Status {
                method: method.to_string(),
                url: url.to_string(),
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(text)
    }

    fn send_for_entities(
        &self,
        method: Method,
        url: &str,
        body: String,
    ) -> Result<EntityCollection, MigrationError> {
        let text = self.send(method, url, body)?;
        EntityCollection::parse(&text).map_err(|e| MigrationError::InvalidResponse {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

impl TestApi for OctaneClient {
    fn create_manual_test(
        &mut self,
        test: &ManualTest,
    ) -> Result<Option<ManualTest>, MigrationError> {
        let url = self.settings.tests_url();
        let created = self.send_for_entities(Method::POST, &url, test.create_body().to_string())?;
        Ok(created.first_id().map(|id| test.clone().with_id(id)))
    }

    fn upload_steps(&mut self, test_id: &str, steps_json: &str) -> Result<(), MigrationError> {
        let url = self.settings.script_url(test_id);
        self.send(Method::PUT, &url, steps_json.to_string())?;
        Ok(())
    }

    fn upload_parameters_table(
        &mut self,
        _table_name: &str,
        parameters_json: &str,
    ) -> Result<Option<String>, MigrationError> {
        let url = self.settings.test_data_tables_url();
        let created = self.send_for_entities(Method::POST, &url, parameters_json.to_string())?;
        Ok(created.first_id().map(str::to_string))
    }

    fn attach_parameters_table(
        &mut self,
        test: &ManualTest,
        table_id: &str,
    ) -> Result<usize, MigrationError> {
        let Some(test_id) = test.id.as_deref() else {
            return Ok(0);
        };
        let url = self.settings.tests_url();
        let body = ManualTest::attach_table_body(test_id, table_id).to_string();
        let updated = self.send_for_entities(Method::PUT, &url, body)?;
        Ok(updated.len())
    }
}
