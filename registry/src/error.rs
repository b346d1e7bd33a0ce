use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("{0} is not the administrator")]
    NotAdmin(String),

    #[error("{0} is not an approved verifier")]
    NotVerifier(String),
}
