//! # Metadata Adapters

use crate::domain::value_objects::UnitId;
use crate::ports::outbound::MetadataProvider;

/// Provider that appends the unit id to a fixed base URI.
#[derive(Clone, Debug)]
pub struct BaseUriProvider {
    base: String,
}

impl BaseUriProvider {
    /// Creates a provider rooted at `base`.
    #[must_use]
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }
}

impl MetadataProvider for BaseUriProvider {
    fn unit_uri(&self, id: UnitId) -> String {
        format!("{}{id}", self.base)
    }
}

// =============================================================================
// TESTS
// =============================================================================
