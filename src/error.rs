use thiserror::Error;

/// Failures surfaced by remote collaborators (RPC reads, contract calls).
/// Propagated unmodified; nothing in this crate retries.
pub type RemoteError = Box<dyn std::error::Error + Send + Sync>;

/// Operation-boundary failures for the range-order lifecycle.
///
/// Precondition variants are raised synchronously before any remote call is
/// made; `Remote` wraps collaborator failures as-is; `NoTransaction` covers
/// the case where a remote call succeeds but yields no transaction handle.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Could not reach range orders library")]
    NoLibrary,
    #[error("No chainId")]
    NoChainId,
    #[error("No signer")]
    NoSigner,
    #[error("No pool")]
    NoPool,
    #[error("No account")]
    NoAccount,
    #[error("No amount in")]
    NoAmountIn,
    #[error("No tick threshold")]
    NoTickThreshold,
    #[error("No max fee configured for chain {0}")]
    NoFeeConfig(u64),
    #[error("No transaction")]
    NoTransaction,
    #[error("{0}")]
    Remote(RemoteError),
}

impl From<RemoteError> for OrderError {
    fn from(err: RemoteError) -> Self {
        OrderError::Remote(err)
    }
}
