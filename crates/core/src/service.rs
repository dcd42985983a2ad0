use std::sync::Arc;

use tracing::{error, info, warn};

use crate::crm::CrmApi;
use crate::domain::customer::Customer;
use crate::mapping::{to_customer, MappingError};

/// Read side of the customer profile: CRM lookups mapped into the domain
/// model. Failures never escape; callers only see absent or empty results.
#[derive(Clone)]
pub struct CustomerService {
    crm: Arc<dyn CrmApi>,
}

impl CustomerService {
    pub fn new(crm: Arc<dyn CrmApi>) -> Self {
        Self { crm }
    }

    /// `None` covers both "no such customer" and "CRM unavailable".
    pub async fn get_customer_by_id(&self, customer_id: &str) -> Option<Customer> {
        info!(
            event_name = "customer.lookup.start",
            customer_id = %customer_id,
            "getting customer by id"
        );

        let response = match self.crm.fetch_by_id(customer_id).await {
            Ok(Some(response)) => response,
            Ok(None) => {
                warn!(
                    event_name = "customer.lookup.empty",
                    customer_id = %customer_id,
                    "crm returned no body for customer"
                );
                return None;
            }
            Err(crm_error) => {
                error!(
                    event_name = "customer.lookup.failed",
                    customer_id = %customer_id,
                    not_found = crm_error.is_not_found(),
                    error = %crm_error,
                    "error retrieving customer"
                );
                return None;
            }
        };

        match to_customer(response) {
            Ok(customer) => {
                info!(
                    event_name = "customer.lookup.completed",
                    customer_id = %customer_id,
                    "retrieved customer"
                );
                Some(customer)
            }
            Err(mapping_error) => {
                error!(
                    event_name = "customer.lookup.unmappable",
                    customer_id = %customer_id,
                    error = %mapping_error,
                    "crm record could not be mapped"
                );
                None
            }
        }
    }

    /// Any record that fails to map empties the whole result.
    pub async fn search_customers(&self, query: &str) -> Vec<Customer> {
        info!(event_name = "customer.search.start", query = %query, "searching customers");

        let responses = self.crm.search(query).await;
        let customers: Result<Vec<Customer>, MappingError> =
            responses.into_iter().map(to_customer).collect();

        match customers {
            Ok(customers) => {
                info!(
                    event_name = "customer.search.completed",
                    query = %query,
                    result_count = customers.len(),
                    "customer search completed"
                );
                customers
            }
            Err(mapping_error) => {
                error!(
                    event_name = "customer.search.failed",
                    query = %query,
                    error = %mapping_error,
                    "error searching customers"
                );
                Vec::new()
            }
        }
    }
}
