use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("Customer not found: {customer_id}")]
    CustomerNotFound { customer_id: String },
}

/// Error shape handed to API callers: the message plus the correlation id of
/// the request that produced it.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("{message}")]
    NotFound { message: String, customer_id: String, correlation_id: String },
}

impl InterfaceError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::NotFound { correlation_id, .. } => correlation_id,
        }
    }
}

impl DomainError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let message = self.to_string();
        match self {
            DomainError::CustomerNotFound { customer_id } => InterfaceError::NotFound {
                message,
                customer_id,
                correlation_id: correlation_id.into(),
            },
        }
    }
}

impl From<DomainError> for InterfaceError {
    fn from(value: DomainError) -> Self {
        value.into_interface("unassigned")
    }
}
