//! Administrator capability check.

use crate::error::RegistryError;
use attest_types::Identity;

/// Holds the single administrator identity.
#[derive(Clone, Debug)]
pub struct AdminGate {
    admin: Identity,
}

impl AdminGate {
    pub fn new(admin: Identity) -> Self {
        Self { admin }
    }

    pub fn admin(&self) -> &Identity {
        &self.admin
    }

    pub fn authorize(&self, caller: &Identity) -> Result<(), RegistryError> {
        if *caller != self.admin {
            return Err(RegistryError::NotAdmin(caller.to_string()));
        }
        Ok(())
    }

    /// Hand the administrator role to `new_admin`, returning the previous holder.
    pub fn transfer(
        &mut self,
        caller: &Identity,
        new_admin: Identity,
    ) -> Result<Identity, RegistryError> {
        self.authorize(caller)?;
        Ok(std::mem::replace(&mut self.admin, new_admin))
    }
}
