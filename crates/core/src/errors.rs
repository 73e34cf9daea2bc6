use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// An entity invariant does not hold.
    #[error("validation failed: {0}")]
    Validation(String),
    /// A comparison precondition or strategy rule was broken.
    #[error("business rule violated: {0}")]
    Business(String),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn business(message: impl Into<String>) -> Self {
        Self::Business(message.into())
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Validation(message) | Self::Business(message) => message,
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("persistence failure: {0}")]
    Persistence(String),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("not found: {message}")]
    NotFound { message: String, correlation_id: String },
    #[error("conflict: {message}")]
    Conflict { message: String, correlation_id: String },
    #[error("unprocessable entity: {message}")]
    UnprocessableEntity { message: String, correlation_id: String },
    #[error("service unavailable: {message}")]
    ServiceUnavailable { message: String, correlation_id: String },
    #[error("internal error: {message}")]
    Internal { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => {
                "The request could not be processed. Check inputs and try again."
            }
            Self::NotFound { .. } => "The requested resource does not exist.",
            Self::Conflict { .. } => "The request conflicts with existing data.",
            Self::UnprocessableEntity { .. } => "The request breaks a catalog rule.",
            Self::ServiceUnavailable { .. } => {
                "The service is temporarily unavailable. Please retry shortly."
            }
            Self::Internal { .. } => "An unexpected internal error occurred.",
        }
    }

    /// The message returned to API clients. Infrastructure failures never leak their detail.
    pub fn client_message(&self) -> &str {
        match self {
            Self::BadRequest { message, .. }
            | Self::NotFound { message, .. }
            | Self::Conflict { message, .. }
            | Self::UnprocessableEntity { message, .. } => message,
            Self::ServiceUnavailable { .. } | Self::Internal { .. } => self.user_message(),
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::BadRequest { correlation_id, .. }
            | Self::NotFound { correlation_id, .. }
            | Self::Conflict { correlation_id, .. }
            | Self::UnprocessableEntity { correlation_id, .. }
            | Self::ServiceUnavailable { correlation_id, .. }
            | Self::Internal { correlation_id, .. } => correlation_id,
        }
    }
}

impl ApplicationError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let mut mapped = InterfaceError::from(self);
        match &mut mapped {
            InterfaceError::BadRequest { correlation_id: id, .. }
            | InterfaceError::NotFound { correlation_id: id, .. }
            | InterfaceError::Conflict { correlation_id: id, .. }
            | InterfaceError::UnprocessableEntity { correlation_id: id, .. }
            | InterfaceError::ServiceUnavailable { correlation_id: id, .. }
            | InterfaceError::Internal { correlation_id: id, .. } => *id = correlation_id,
        }
        mapped
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        let correlation_id = "unassigned".to_owned();
        match value {
            ApplicationError::Domain(DomainError::Validation(message)) => {
                Self::BadRequest { message, correlation_id }
            }
            ApplicationError::Domain(DomainError::Business(message)) => {
                Self::UnprocessableEntity { message, correlation_id }
            }
            ApplicationError::NotFound(message) => Self::NotFound { message, correlation_id },
            ApplicationError::Conflict(message) => Self::Conflict { message, correlation_id },
            ApplicationError::Persistence(message) => {
                Self::ServiceUnavailable { message, correlation_id }
            }
            ApplicationError::Configuration(message) => Self::Internal { message, correlation_id },
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::{ApplicationError, DomainError, InterfaceError};

    #[test]
    fn validation_error_maps_to_bad_request_with_detail() {
        let interface = ApplicationError::from(DomainError::validation("Name cannot be empty"))
            .into_interface("req-1");

        assert!(matches!(
            interface,
            InterfaceError::BadRequest {
                ref correlation_id,
                ..
            } if correlation_id == "req-1"
        ));
        assert_eq!(interface.client_message(), "Name cannot be empty");
    }

    #[test]
    fn business_error_maps_to_unprocessable_entity() {
        let interface = ApplicationError::from(DomainError::business(
            "cannot compare products from different categories",
        ))
        .into_interface("req-2");

        assert!(matches!(interface, InterfaceError::UnprocessableEntity { .. }));
        assert_eq!(
            interface.client_message(),
            "cannot compare products from different categories"
        );
    }

    #[test]
    fn not_found_and_conflict_keep_their_messages() {
        let missing = ApplicationError::NotFound("Product not found".into()).into_interface("a");
        let duplicate =
            ApplicationError::Conflict("Product already exists".into()).into_interface("b");

        assert!(matches!(missing, InterfaceError::NotFound { .. }));
        assert_eq!(missing.client_message(), "Product not found");
        assert!(matches!(duplicate, InterfaceError::Conflict { .. }));
        assert_eq!(duplicate.correlation_id(), "b");
    }

    #[test]
    fn persistence_error_hides_detail() {
        let interface = ApplicationError::Persistence("database lock timeout".to_owned())
            .into_interface("req-3");

        assert!(matches!(interface, InterfaceError::ServiceUnavailable { .. }));
        assert_eq!(
            interface.client_message(),
            "The service is temporarily unavailable. Please retry shortly."
        );
    }

    #[test]
    fn configuration_error_maps_to_internal() {
        let interface =
            ApplicationError::Configuration("missing database url".to_owned()).into_interface("req-4");

        assert!(matches!(interface, InterfaceError::Internal { .. }));
        assert_eq!(interface.client_message(), "An unexpected internal error occurred.");
    }

    #[test]
    fn domain_display_includes_message() {
        let error = DomainError::business("cannot compare the same product");
        assert!(error.to_string().contains("cannot compare the same product"));
        assert_eq!(error.message(), "cannot compare the same product");
    }
}
