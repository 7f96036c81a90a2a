/// Probe Registry
///
/// The fixed set of dependency checks the readiness endpoint evaluates.
/// Built once at startup and never mutated afterwards. Registration
/// mistakes (no probes, empty or duplicate names) are rejected here so they
/// surface as a startup failure instead of a malformed readiness body.

use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::probe::DependencyCheck;
use crate::shared::error::RegistryError;

pub struct ProbeRegistry {
    probes: Vec<Arc<dyn DependencyCheck>>,
}

impl ProbeRegistry {
    /// Validates and freezes the probe set; order is preserved
    pub fn new(probes: Vec<Arc<dyn DependencyCheck>>) -> Result<Self, RegistryError> {
        if probes.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut seen = HashSet::with_capacity(probes.len());
        for probe in &probes {
            let name = probe.name();
            if name.trim().is_empty() {
                return Err(RegistryError::EmptyName);
            }
            if !seen.insert(name.to_string()) {
                return Err(RegistryError::DuplicateName(name.to_string()));
            }
        }

        Ok(Self { probes })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn DependencyCheck>> {
        self.probes.iter()
    }

    /// Registered names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.probes.iter().map(|probe| probe.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }
}

impl std::fmt::Debug for ProbeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProbeRegistry")
            .field("probes", &self.names())
            .finish()
    }
}
