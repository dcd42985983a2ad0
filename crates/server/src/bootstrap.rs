use std::sync::Arc;

use axum::Router;
use customer360_core::config::{AppConfig, ConfigError};
use customer360_core::{CustomerEntityResolver, CustomerQueryResolver, CustomerService};
use reqwest::Client;
use thiserror::Error;
use tracing::info;

use crate::crm::HttpCrmClient;
use crate::graphql::{build_schema, CustomerSchema};
use crate::health;

pub struct Application {
    pub config: AppConfig,
    pub crm: HttpCrmClient,
    pub schema: CustomerSchema,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("http client construction failed: {0}")]
    HttpClient(#[source] reqwest::Error),
}

impl Application {
    pub fn router(&self) -> Router {
        crate::graphql::router(self.schema.clone(), self.config.server.graphiql)
            .merge(health::router(self.crm.clone()))
    }
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let http = Client::builder()
        .user_agent(concat!("customer360-subgraph/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(BootstrapError::HttpClient)?;
    let crm = HttpCrmClient::new(http, &config.crm);

    let service = CustomerService::new(Arc::new(crm.clone()));
    let schema = build_schema(
        CustomerQueryResolver::new(service.clone()),
        CustomerEntityResolver::new(service),
    );
    info!(
        event_name = "system.bootstrap.schema_ready",
        correlation_id = "bootstrap",
        "federated schema built"
    );

    Ok(Application { config, crm, schema })
}
