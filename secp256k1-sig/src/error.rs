//! Error types

/// Result type with the `secp256k1-sig` crate's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors returned by key construction, signing and public key recovery.
///
/// Signature verification never returns an error: malformed input simply
/// fails to verify.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Private key bytes are malformed, zero, or not less than the group order.
    #[error("invalid private key")]
    InvalidPrivateKey,

    /// Public key is the identity, or is not a point on the curve.
    #[error("invalid public key")]
    InvalidPublicKey,

    /// Scalar is zero or not canonically encoded.
    #[error("invalid scalar")]
    InvalidScalar,

    /// Message digest has the wrong length for the configured hash.
    #[error("invalid digest length: expected {expected} bytes, got {actual}")]
    InvalidDigest {
        /// Length implied by the configured hash algorithm.
        expected: usize,
        /// Length of the digest that was supplied.
        actual: usize,
    },

    /// Key encoding is structurally malformed.
    #[error("invalid encoding")]
    InvalidEncoding,

    /// Signature encoding is structurally malformed.
    #[error("invalid signature encoding")]
    InvalidSignatureEncoding,

    /// Recovery id is outside of `[0, 3]`.
    #[error("invalid recovery id")]
    InvalidRecoveryId,

    /// No public key can be recovered from the signature.
    #[error("public key recovery failed")]
    RecoveryFailed,

    /// The caller supplied entropy source failed.
    #[error("entropy source failure")]
    EntropySource,

    /// Rejection sampling exhausted its retry bound.
    #[error("failed rejection sampling")]
    RejectionSampling,

    /// BIP-0340 nonce derivation produced zero.
    #[error("nonce is zero")]
    NonceIsZero,

    /// A freshly produced signature did not verify.
    #[error("signature failed self-verification")]
    SignatureSelfCheck,

    /// Domain separation name is empty.
    #[error("invalid domain separation name")]
    InvalidDomain,
}

impl From<der::Error> for Error {
    fn from(_: der::Error) -> Error {
        Error::InvalidSignatureEncoding
    }
}

/// Emit a `tracing` event for failures that are expected to never happen in
/// practice, then hand the error back.
#[inline]
pub(crate) fn fatal(err: Error) -> Error {
    #[cfg(feature = "tracing")]
    tracing::warn!(error = %err, "secp256k1 signing failure");

    err
}
