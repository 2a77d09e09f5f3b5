//! Nonce sources used when signing.
//!
//! Signing never reads scalars straight out of a caller RNG. Nonces are
//! sampled from a [`NonceSource`], which is either the deterministic
//! [`Rfc6979`] DRBG or an [`EntropyMixer`] that binds caller entropy to the
//! private key and the message.

mod mixer;
mod rfc6979;

pub use self::{mixer::EntropyMixer, rfc6979::Rfc6979};

use crate::{arithmetic::scalar, error::fatal, Error, FieldBytes, Result, Scalar, SCALAR_SIZE};
use core::fmt;
use rand_core::{CryptoRngCore, OsRng};
use zeroize::Zeroizing;

/// Maximum number of candidates drawn when rejection sampling a scalar.
///
/// A uniformly random 256-bit string is rejected with probability below
/// `2^-127`, so exhausting this bound indicates a broken source.
pub const MAX_SCALAR_RESAMPLES: usize = 8;

/// A stream of bytes that signing nonces are sampled from.
///
/// Reads are strictly ordered: each read advances the source, and an
/// instance must not be shared between signing operations.
pub trait NonceSource {
    /// Fill `out` with the next bytes of the stream.
    fn fill_bytes(&mut self, out: &mut [u8]) -> Result<()>;
}

/// Entropy used to derive ECDSA signing nonces.
#[derive(Default)]
pub enum Entropy<'a> {
    /// Mix entropy from the operating system's CSPRNG with the private key
    /// and the message.
    #[default]
    System,

    /// Mix entropy from the given RNG with the private key and the message.
    Rng(&'a mut dyn CryptoRngCore),

    /// Derive nonces deterministically as described in RFC 6979, using
    /// HMAC-SHA256.
    Rfc6979,
}

impl Entropy<'_> {
    /// Build the nonce source selected by `self` and hand it to `f`.
    pub(crate) fn with_source<T>(
        self,
        domain: &[u8],
        private_scalar: &Scalar,
        message_scalar: &Scalar,
        f: impl FnOnce(&mut dyn NonceSource) -> Result<T>,
    ) -> Result<T> {
        match self {
            Entropy::System => f(&mut EntropyMixer::new(
                &mut OsRng,
                domain,
                private_scalar,
                message_scalar,
            )?),
            Entropy::Rng(rng) => f(&mut EntropyMixer::new(
                rng,
                domain,
                private_scalar,
                message_scalar,
            )?),
            Entropy::Rfc6979 => f(&mut Rfc6979::new(private_scalar, message_scalar)),
        }
    }
}

impl fmt::Debug for Entropy<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entropy::System => f.write_str("Entropy::System"),
            Entropy::Rng(_) => f.write_str("Entropy::Rng(..)"),
            Entropy::Rfc6979 => f.write_str("Entropy::Rfc6979"),
        }
    }
}

/// Caller RNG used directly, without mixing. Only used for key generation.
pub(crate) struct RngSource<'a>(pub(crate) &'a mut dyn CryptoRngCore);

impl NonceSource for RngSource<'_> {
    fn fill_bytes(&mut self, out: &mut [u8]) -> Result<()> {
        self.0
            .try_fill_bytes(out)
            .map_err(|_| fatal(Error::EntropySource))
    }
}

/// Sample a non-zero scalar from `source` by rejection sampling.
///
/// Candidates which are zero or not less than the group order are discarded;
/// after [`MAX_SCALAR_RESAMPLES`] candidates sampling fails.
pub(crate) fn sample_scalar<S: NonceSource + ?Sized>(source: &mut S) -> Result<Scalar> {
    let mut bytes = Zeroizing::new([0u8; SCALAR_SIZE]);

    for _ in 0..MAX_SCALAR_RESAMPLES {
        source.fill_bytes(&mut bytes[..])?;

        if let Some(k) = scalar::from_canonical_bytes(&FieldBytes::from(*bytes)) {
            if !bool::from(k.is_zero()) {
                return Ok(k);
            }
        }
    }

    Err(fatal(Error::RejectionSampling))
}


#[cfg(test)]
mod tests {
    use super::{test_rng::*, *};

    #[test]
    fn sampling_accepts_first_valid_candidate() {
        let k = sample_scalar(&mut RngSource(&mut ConstantRng(0x01))).unwrap();
        assert_eq!(k.to_bytes().as_slice(), &[0x01; 32]);
    }

    #[test]
    fn sampling_rejects_zero_and_overflow() {
        assert_eq!(
            sample_scalar(&mut RngSource(&mut ConstantRng(0x00))),
            Err(Error::RejectionSampling)
        );
        assert_eq!(
            sample_scalar(&mut RngSource(&mut ConstantRng(0xff))),
            Err(Error::RejectionSampling)
        );
    }

    #[test]
    fn sampling_propagates_source_failure() {
        assert_eq!(
            sample_scalar(&mut RngSource(&mut FailingRng)),
            Err(Error::EntropySource)
        );
    }

    fn sample(entropy: Entropy<'_>) -> Result<Scalar> {
        let d = Scalar::ONE;
        let e = Scalar::ONE + Scalar::ONE;
        entropy.with_source(b"test", &d, &e, |source| sample_scalar(source))
    }

    #[test]
    fn entropy_selects_source() {
        assert_eq!(sample(Entropy::Rfc6979).unwrap(), sample(Entropy::Rfc6979).unwrap());
        assert_eq!(sample(Entropy::Rng(&mut FailingRng)), Err(Error::EntropySource));
        assert_ne!(sample(Entropy::System).unwrap(), sample(Entropy::System).unwrap());
    }
}
