//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Result type returned by catalog/pricing service implementations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Domain-level error.
///
/// Blocking failures surfaced to the user. Recoverable input problems (a
/// negative rounding, a duplicated list name) are reported as warnings by the
/// session instead and never show up here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A source price list was chosen but holds no rules for the selected products.
    #[error("there are no rental products for the chosen base list")]
    NoCandidates,

    /// A value failed validation (e.g. blank price list name).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// The catalog/pricing service failed. Passed through untouched.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}

/// Failure reported by a catalog/pricing backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// A record referenced by id does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// The backend could not serve the request (lock poisoned, connection lost).
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

impl CatalogError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_errors_pass_through_unchanged() {
        let source = CatalogError::unavailable("connection reset");
        let err: DomainError = source.clone().into();

        assert_eq!(err, DomainError::Catalog(source.clone()));
        assert_eq!(err.to_string(), source.to_string());
    }

    #[test]
    fn not_found_names_the_entity() {
        let err = CatalogError::not_found("pricing rule", 42);
        assert_eq!(err.to_string(), "pricing rule 42 not found");
    }
}
