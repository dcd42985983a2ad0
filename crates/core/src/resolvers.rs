//! Resolver contracts behind the GraphQL surface.
//!
//! Both entry points funnel into [`CustomerService::get_customer_by_id`], so a
//! customer resolved through a federation reference is identical to the one
//! returned by the direct `customer` query. Routing `_entities`
//! representations by `__typename` is left to the GraphQL layer; only
//! `Customer` references reach [`CustomerEntityResolver`].

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::domain::customer::Customer;
use crate::errors::DomainError;
use crate::service::CustomerService;

#[derive(Clone)]
pub struct CustomerQueryResolver {
    service: CustomerService,
}

impl CustomerQueryResolver {
    pub fn new(service: CustomerService) -> Self {
        Self { service }
    }

    pub async fn customer(&self, customer_id: &str) -> Result<Customer, DomainError> {
        info!(event_name = "graphql.query.customer", customer_id = %customer_id, "customer query");

        self.service.get_customer_by_id(customer_id).await.ok_or_else(|| {
            warn!(
                event_name = "graphql.query.customer_not_found",
                customer_id = %customer_id,
                "customer not found"
            );
            DomainError::CustomerNotFound { customer_id: customer_id.to_string() }
        })
    }

    pub async fn search_customers(&self, query: &str) -> Vec<Customer> {
        info!(event_name = "graphql.query.search_customers", query = %query, "search query");

        let customers = self.service.search_customers(query).await;
        info!(
            event_name = "graphql.query.search_customers_completed",
            result_count = customers.len(),
            "found customers"
        );
        customers
    }
}

/// Federation representation of a `Customer`: only the key is read, every
/// other key (`__typename` included) is dropped on decode.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerReference {
    pub customer_id: String,
}

#[derive(Clone)]
pub struct CustomerEntityResolver {
    service: CustomerService,
}

impl CustomerEntityResolver {
    pub fn new(service: CustomerService) -> Self {
        Self { service }
    }

    pub async fn resolve_reference(
        &self,
        reference: CustomerReference,
    ) -> Result<Customer, DomainError> {
        let CustomerReference { customer_id } = reference;
        debug!(
            event_name = "federation.resolve.start",
            customer_id = %customer_id,
            "resolving customer reference"
        );

        match self.service.get_customer_by_id(&customer_id).await {
            Some(customer) => {
                info!(
                    event_name = "federation.resolve.completed",
                    customer_id = %customer_id,
                    first_name = customer.first_name.as_deref().unwrap_or_default(),
                    last_name = customer.last_name.as_deref().unwrap_or_default(),
                    "resolved customer reference"
                );
                Ok(customer)
            }
            None => {
                warn!(
                    event_name = "federation.resolve.not_found",
                    customer_id = %customer_id,
                    "customer not found for reference"
                );
                Err(DomainError::CustomerNotFound { customer_id })
            }
        }
    }
}
