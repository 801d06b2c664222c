//! In-process artifact registry

use std::collections::HashMap;

use parking_lot::RwLock;

use super::aggregator::{aggregator_arguments, Aggregator};
use super::contract::{ContractShape, AGGREGATOR_CONTRACT};
use super::{ContractArguments, ImplementationHandle, ImplementationLoader, LoadError, LoadResult};

/// A deployable artifact description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Fully-qualified name
    pub name: String,
    /// Contracts implemented, with their type arguments
    contracts: HashMap<&'static str, ContractArguments>,
    /// Set when the artifact is present but cannot be linked
    linkage_error: Option<String>,
}

impl Artifact {
    /// Create an artifact implementing no contracts
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contracts: HashMap::new(),
            linkage_error: None,
        }
    }

    /// Declare a contract implementation
    #[must_use]
    pub fn implementing(mut self, contract: &ContractShape, arguments: ContractArguments) -> Self {
        self.contracts.insert(contract.name, arguments);
        self
    }

    /// Mark the artifact as failing to link
    #[must_use]
    pub fn broken(mut self, reason: impl Into<String>) -> Self {
        self.linkage_error = Some(reason.into());
        self
    }
}

#[derive(Debug, Default)]
struct Deployed {
    artifacts: HashMap<String, (u64, Artifact)>,
    generation: u64,
}

/// Registry of deployed artifacts, safe to share between compiling threads
#[derive(Debug, Default)]
pub struct ClassPath {
    inner: RwLock<Deployed>,
}

impl ClassPath {
    /// Create an empty class path
    pub fn new() -> Self {
        Self::default()
    }

    /// Deploy an artifact, replacing any previous one with the same name
    pub fn deploy(&self, artifact: Artifact) {
        let mut inner = self.inner.write();
        inner.generation += 1;
        let generation = inner.generation;
        tracing::debug!(artifact = %artifact.name, generation, "artifact deployed");
        inner
            .artifacts
            .insert(artifact.name.clone(), (generation, artifact));
    }

    /// Deploy a Rust aggregator under `name`
    pub fn deploy_aggregator<A: Aggregator>(&self, name: impl Into<String>) {
        self.deploy(
            Artifact::new(name).implementing(&AGGREGATOR_CONTRACT, aggregator_arguments::<A>()),
        );
    }

    /// Remove an artifact; returns whether it was deployed
    pub fn undeploy(&self, name: &str) -> bool {
        self.inner.write().artifacts.remove(name).is_some()
    }

    /// Check if an artifact is deployed
    pub fn contains(&self, name: &str) -> bool {
        self.inner.read().artifacts.contains_key(name)
    }
}

impl ImplementationLoader for ClassPath {
    fn load(&self, qualified_name: &str) -> LoadResult<ImplementationHandle> {
        let inner = self.inner.read();
        let (generation, artifact) = inner
            .artifacts
            .get(qualified_name)
            .ok_or_else(|| LoadError::ClassNotFound(qualified_name.to_string()))?;

        if let Some(reason) = &artifact.linkage_error {
            return Err(LoadError::Linkage {
                class: qualified_name.to_string(),
                reason: reason.clone(),
            });
        }

        Ok(ImplementationHandle {
            qualified_name: qualified_name.to_string(),
            generation: *generation,
        })
    }

    fn contract_arguments(
        &self,
        handle: &ImplementationHandle,
        contract: &ContractShape,
    ) -> LoadResult<Option<ContractArguments>> {
        let inner = self.inner.read();
        let (generation, artifact) = inner
            .artifacts
            .get(&handle.qualified_name)
            .ok_or_else(|| LoadError::ClassNotFound(handle.qualified_name.clone()))?;

        if *generation != handle.generation {
            return Err(LoadError::Linkage {
                class: handle.qualified_name.clone(),
                reason: format!(
                    "redeployed while loading (generation {} -> {})",
                    handle.generation, generation
                ),
            });
        }

        Ok(artifact.contracts.get(contract.name).cloned())
    }
}
