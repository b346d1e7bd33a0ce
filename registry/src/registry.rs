//! Registry: the two allowlists behind one administrator gate.

use crate::access::AdminGate;
use crate::allowlist::{Allowlist, MemoryAllowlist};
use crate::error::RegistryError;
use attest_types::{AlgorithmRef, Identity};
use tracing::info;

pub struct Registry {
    gate: AdminGate,
    algorithms: Box<dyn Allowlist<AlgorithmRef>>,
    verifiers: Box<dyn Allowlist<Identity>>,
}

impl Registry {
    /// Create a registry with empty in-memory allowlists.
    pub fn new(admin: Identity) -> Self {
        Self::with_allowlists(
            admin,
            Box::new(MemoryAllowlist::new()),
            Box::new(MemoryAllowlist::new()),
        )
    }

    /// Create a registry over injected allowlist backends.
    pub fn with_allowlists(
        admin: Identity,
        algorithms: Box<dyn Allowlist<AlgorithmRef>>,
        verifiers: Box<dyn Allowlist<Identity>>,
    ) -> Self {
        Self {
            gate: AdminGate::new(admin),
            algorithms,
            verifiers,
        }
    }

    pub fn admin(&self) -> &Identity {
        self.gate.admin()
    }

    /// Approve an algorithm. Returns `false` if it was already approved.
    pub fn add_algorithm(
        &mut self,
        caller: &Identity,
        algorithm: AlgorithmRef,
    ) -> Result<bool, RegistryError> {
        self.gate.authorize(caller)?;
        let added = self.algorithms.add(algorithm.clone());
        if added {
            info!(%algorithm, "algorithm approved");
        }
        Ok(added)
    }

    /// Approve a verifier. Returns `false` if it was already approved.
    pub fn add_verifier(
        &mut self,
        caller: &Identity,
        verifier: Identity,
    ) -> Result<bool, RegistryError> {
        self.gate.authorize(caller)?;
        let added = self.verifiers.add(verifier.clone());
        if added {
            info!(%verifier, "verifier approved");
        }
        Ok(added)
    }

    /// Transfer the administrator role. Returns the previous administrator.
    pub fn transfer_admin(
        &mut self,
        caller: &Identity,
        new_admin: Identity,
    ) -> Result<Identity, RegistryError> {
        let previous = self.gate.transfer(caller, new_admin)?;
        info!(%previous, new = %self.gate.admin(), "administrator transferred");
        Ok(previous)
    }

    pub fn is_algorithm_approved(&self, algorithm: &AlgorithmRef) -> bool {
        self.algorithms.contains(algorithm)
    }

    pub fn is_verifier(&self, identity: &Identity) -> bool {
        self.verifiers.contains(identity)
    }

    pub fn authorize_verifier(&self, caller: &Identity) -> Result<(), RegistryError> {
        if !self.is_verifier(caller) {
            return Err(RegistryError::NotVerifier(caller.to_string()));
        }
        Ok(())
    }

    pub fn algorithm_count(&self) -> usize {
        self.algorithms.len()
    }

    pub fn verifier_count(&self) -> usize {
        self.verifiers.len()
    }
}
