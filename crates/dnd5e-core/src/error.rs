use crate::address::ResourceAddress;

/// Alias for `Result<T, DndError>`.
pub type DndResult<T> = Result<T, DndError>;

/// Errors that can occur while validating, planning, or applying resources.
#[derive(Debug, thiserror::Error)]
pub enum DndError {
    /// A field failed validation. Raised before any derivation runs.
    #[error("validation error: {field}: {reason}")]
    Validation {
        /// The offending field key.
        field: String,
        /// A human-readable description of the problem.
        reason: String,
    },

    /// An error raised while handling one specific resource.
    #[error("{address}: {source}")]
    Resource {
        /// The resource being handled.
        address: ResourceAddress,
        /// What went wrong.
        source: Box<DndError>,
    },

    /// A resource address could not be parsed.
    #[error("invalid resource address: \"{0}\" (expected <kind>.<name>)")]
    InvalidAddress(String),

    /// No resource implementation is registered for this kind.
    #[error("unknown resource kind: {0}")]
    UnknownResourceKind(String),

    /// The resource cannot change in place; it must be replaced.
    #[error("{0} cannot be updated in place; it must be replaced")]
    RequiresReplacement(ResourceAddress),

    /// The addressed resource is not tracked in state.
    #[error("resource not found in state: {0}")]
    ResourceNotFound(ResourceAddress),

    /// Reading or writing a state or configuration file failed.
    #[error("i/o error on {path}: {source}")]
    Io {
        /// The file involved.
        path: String,
        /// The underlying error.
        source: std::io::Error,
    },

    /// A state or configuration file is not valid JSON for its schema.
    #[error("malformed JSON in {path}: {source}")]
    Json {
        /// The file involved.
        path: String,
        /// The underlying error.
        source: serde_json::Error,
    },
}

impl DndError {
    /// Shorthand for a [`DndError::Validation`] on `field`.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Attach the address of the resource being handled.
    pub fn at(self, address: &ResourceAddress) -> Self {
        Self::Resource {
            address: address.clone(),
            source: Box::new(self),
        }
    }

    /// Returns true if this is a validation error, directly or for a
    /// specific resource.
    pub fn is_validation(&self) -> bool {
        match self {
            Self::Validation { .. } => true,
            Self::Resource { source, .. } => source.is_validation(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_display_names_field() {
        let err = DndError::validation("experience_points", "cannot decrease");
        assert_eq!(
            err.to_string(),
            "validation error: experience_points: cannot decrease"
        );
        assert!(err.is_validation());
    }

    #[test]
    fn resource_context_prefixes_address() {
        let address = ResourceAddress::new("dnd5e_character", "aria");
        let err = DndError::validation("strength", "expected 1..=30, got 31").at(&address);
        assert_eq!(
            err.to_string(),
            "dnd5e_character.aria: validation error: strength: expected 1..=30, got 31"
        );
        assert!(err.is_validation());
    }

    #[test]
    fn unknown_kind_is_not_validation() {
        let err = DndError::UnknownResourceKind("dnd5e_spell".to_string());
        assert!(!err.is_validation());
        assert_eq!(err.to_string(), "unknown resource kind: dnd5e_spell");
    }
}
