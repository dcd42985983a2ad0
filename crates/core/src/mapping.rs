//! CRM response to domain model mapping.
//!
//! Malformed `segment` / `status` values never block serving a record: they
//! degrade to the least privileged classification (`BRONZE` / `ACTIVE`) and
//! leave a warning in the logs.

use thiserror::Error;
use tracing::warn;

use crate::crm::{AddressDto, CrmCustomerResponse};
use crate::domain::customer::{Address, Customer, CustomerId, CustomerSegment, CustomerStatus};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MappingError {
    #[error("crm record has no customerId")]
    MissingCustomerId,
}

pub fn to_customer(dto: CrmCustomerResponse) -> Result<Customer, MappingError> {
    let customer_id = dto
        .customer_id
        .and_then(|id| CustomerId::new(id).ok())
        .ok_or(MappingError::MissingCustomerId)?;

    Ok(Customer {
        segment: parse_segment(dto.segment.as_deref()),
        status: parse_status(dto.status.as_deref()),
        customer_id,
        first_name: dto.first_name,
        last_name: dto.last_name,
        email: dto.email,
        phone: dto.phone,
        date_of_birth: dto.date_of_birth,
        address: to_address(dto.address),
        lifetime_value: dto.lifetime_value,
        risk_score: dto.risk_score,
        created_at: dto.created_at,
        last_updated: dto.last_updated,
    })
}

pub fn to_address(dto: Option<AddressDto>) -> Option<Address> {
    dto.map(|address| Address {
        street: address.street,
        city: address.city,
        state: address.state,
        zip_code: address.zip_code,
        country: address.country,
    })
}

pub fn parse_segment(raw: Option<&str>) -> CustomerSegment {
    let parsed = raw.and_then(|value| {
        CustomerSegment::ALL
            .into_iter()
            .find(|segment| segment.as_str().eq_ignore_ascii_case(value))
    });

    parsed.unwrap_or_else(|| {
        warn!(
            event_name = "crm.mapping.invalid_segment",
            raw_value = raw.unwrap_or("<missing>"),
            "invalid segment value, defaulting to BRONZE"
        );
        CustomerSegment::Bronze
    })
}

pub fn parse_status(raw: Option<&str>) -> CustomerStatus {
    let parsed = raw.and_then(|value| {
        CustomerStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(value))
    });

    parsed.unwrap_or_else(|| {
        warn!(
            event_name = "crm.mapping.invalid_status",
            raw_value = raw.unwrap_or("<missing>"),
            "invalid status value, defaulting to ACTIVE"
        );
        CustomerStatus::Active
    })
}
