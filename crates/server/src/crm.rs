//! HTTP client for the legacy CRM customer API.
//!
//! - `GET {base_url}/api/customers/{id}`         fetch one record
//! - `GET {base_url}/api/customers/search?query=` search by name or email
//! - `GET {base_url}/health`                     liveness check
//!
//! No retries and no client-side timeout beyond reqwest's defaults.

use async_trait::async_trait;
use customer360_core::config::CrmConfig;
use customer360_core::{CrmApi, CrmCustomerResponse, CrmError, CrmSearchResponse};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info};

#[derive(Clone)]
pub struct HttpCrmClient {
    client: Client,
    base_url: String,
}

impl HttpCrmClient {
    pub fn new(client: Client, config: &CrmConfig) -> Self {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        info!(
            event_name = "crm.client.initialized",
            base_url = %base_url,
            "crm api client initialized"
        );
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn customer_url(&self, customer_id: &str) -> String {
        format!("{}/api/customers/{customer_id}", self.base_url)
    }

    // The query goes in verbatim; reqwest's URL parser handles escaping.
    fn search_url(&self, query: &str) -> String {
        format!("{}/api/customers/search?query={query}", self.base_url)
    }

    pub async fn ping(&self) -> Result<(), CrmError> {
        let url = format!("{}/health", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|error| CrmError::Transport { url: url.clone(), message: error.to_string() })?;

        if !response.status().is_success() {
            return Err(CrmError::Status { url, status: response.status().as_u16() });
        }
        Ok(())
    }

    /// `Ok(None)` when the CRM answers 2xx with an empty body.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>, CrmError> {
        let response = self.client.get(url).send().await.map_err(|error| CrmError::Transport {
            url: url.to_string(),
            message: error.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CrmError::Status { url: url.to_string(), status: status.as_u16() });
        }

        let body = response.bytes().await.map_err(|error| CrmError::Transport {
            url: url.to_string(),
            message: error.to_string(),
        })?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        serde_json::from_slice(&body)
            .map(Some)
            .map_err(|error| CrmError::Decode { url: url.to_string(), message: error.to_string() })
    }
}

#[async_trait]
impl CrmApi for HttpCrmClient {
    async fn fetch_by_id(
        &self,
        customer_id: &str,
    ) -> Result<Option<CrmCustomerResponse>, CrmError> {
        let url = self.customer_url(customer_id);
        debug!(event_name = "crm.fetch.start", url = %url, "fetching customer from crm");

        match self.get_json::<CrmCustomerResponse>(&url).await {
            Ok(response) => {
                debug!(
                    event_name = "crm.fetch.completed",
                    customer_id = %customer_id,
                    "fetched customer from crm"
                );
                Ok(response)
            }
            Err(crm_error) => {
                error!(
                    event_name = "crm.fetch.failed",
                    customer_id = %customer_id,
                    error = %crm_error,
                    "error fetching customer from crm"
                );
                Err(crm_error)
            }
        }
    }

    async fn search(&self, query: &str) -> Vec<CrmCustomerResponse> {
        let url = self.search_url(query);
        debug!(event_name = "crm.search.start", query = %query, "searching customers in crm");

        match self.get_json::<CrmSearchResponse>(&url).await {
            Ok(Some(response)) => {
                let customers = response.into_customers();
                debug!(
                    event_name = "crm.search.completed",
                    query = %query,
                    result_count = customers.len(),
                    "crm search completed"
                );
                customers
            }
            Ok(None) => Vec::new(),
            Err(crm_error) => {
                error!(
                    event_name = "crm.search.failed",
                    query = %query,
                    error = %crm_error,
                    "error searching customers in crm"
                );
                Vec::new()
            }
        }
    }
}
