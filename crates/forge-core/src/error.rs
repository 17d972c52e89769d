/// The single domain failure kind.
///
/// Raised synchronously by guards and aggregate invariants. `field` names the
/// offending parameter (dotted for nested values, e.g.
/// `ingredients.amount_per_cycle`) and `message` reads as a predicate on it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field} {message}")]
pub struct DomainError {
    pub field: String,
    pub message: String,
}

impl DomainError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_joins_field_and_message() {
        let err = DomainError::new("name", "is required.");
        assert_eq!(err.to_string(), "name is required.");
    }
}
