//! Wire contract of the legacy CRM customer API.
//!
//! The transport lives in the server crate; everything here is the shape of
//! what comes back and the trait the customer service talks to.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// `GET /api/customers/{id}` body. Every field is optional on the wire and
/// unknown fields are dropped.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CrmCustomerResponse {
    pub customer_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<String>,
    pub address: Option<AddressDto>,
    pub segment: Option<String>,
    pub status: Option<String>,
    pub lifetime_value: Option<f64>,
    pub risk_score: Option<i32>,
    pub created_at: Option<String>,
    pub last_updated: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddressDto {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
}

/// `GET /api/customers/search` body. Older deployments answer with a bare
/// array, the current one wraps the hits in a `results` envelope.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CrmSearchResponse {
    List(Vec<CrmCustomerResponse>),
    Envelope {
        #[serde(default)]
        results: Vec<CrmCustomerResponse>,
    },
}

impl CrmSearchResponse {
    pub fn into_customers(self) -> Vec<CrmCustomerResponse> {
        match self {
            Self::List(customers) => customers,
            Self::Envelope { results } => results,
        }
    }
}

/// The CRM could not be reached or answered with something unusable.
#[derive(Debug, Error)]
pub enum CrmError {
    #[error("crm request to `{url}` failed: {message}")]
    Transport { url: String, message: String },
    #[error("crm responded to `{url}` with status {status}")]
    Status { url: String, status: u16 },
    #[error("crm response from `{url}` could not be decoded: {message}")]
    Decode { url: String, message: String },
}

impl CrmError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}

#[async_trait]
pub trait CrmApi: Send + Sync {
    /// `Ok(None)` means the CRM answered successfully with an empty body.
    async fn fetch_by_id(
        &self,
        customer_id: &str,
    ) -> Result<Option<CrmCustomerResponse>, CrmError>;

    /// Never fails: upstream problems are logged and reported as no hits.
    async fn search(&self, query: &str) -> Vec<CrmCustomerResponse>;
}
