pub mod config;
pub mod crm;
pub mod domain;
pub mod errors;
pub mod mapping;
pub mod resolvers;
pub mod service;

pub use crm::{AddressDto, CrmApi, CrmCustomerResponse, CrmError, CrmSearchResponse};
pub use domain::customer::{Address, Customer, CustomerId, CustomerSegment, CustomerStatus};
pub use errors::{DomainError, InterfaceError};
pub use resolvers::{CustomerEntityResolver, CustomerQueryResolver, CustomerReference};
pub use service::CustomerService;
