//! Entropy hardening for signing nonces.

use super::NonceSource;
use crate::{error::fatal, Error, Result, Scalar};
use rand_core::CryptoRngCore;
use sha3::{
    digest::{ExtendableOutput, Update, XofReader},
    CShake256, CShake256Core,
};
use zeroize::Zeroizing;

/// Number of bytes read from the caller's RNG per signature.
pub const ENTROPY_SIZE: usize = 32;

/// Nonce source which binds caller entropy to the private key and message.
///
/// The output is cSHAKE256, customized with a per-algorithm domain tag,
/// over `entropy || d || e`. A healthy RNG contributes full entropy, while
/// a broken one (all zeros, repeated output) still yields nonces that
/// differ across private keys and messages.
pub struct EntropyMixer {
    reader: <CShake256 as ExtendableOutput>::Reader,
}

impl EntropyMixer {
    /// Read [`ENTROPY_SIZE`] bytes from `rng` and absorb them together with
    /// the private and message scalars.
    pub fn new(
        rng: &mut dyn CryptoRngCore,
        domain: &[u8],
        private_scalar: &Scalar,
        message_scalar: &Scalar,
    ) -> Result<Self> {
        let mut entropy = Zeroizing::new([0u8; ENTROPY_SIZE]);
        rng.try_fill_bytes(&mut entropy[..])
            .map_err(|_| fatal(Error::EntropySource))?;

        let mut xof = CShake256::from_core(CShake256Core::new(domain));
        xof.update(&entropy[..]);
        xof.update(&private_scalar.to_bytes());
        xof.update(&message_scalar.to_bytes());

        Ok(Self {
            reader: xof.finalize_xof(),
        })
    }
}

impl NonceSource for EntropyMixer {
    fn fill_bytes(&mut self, out: &mut [u8]) -> Result<()> {
        self.reader.read(out);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nonce::test_rng::{ConstantRng, FailingRng};

    fn first_block(domain: &[u8], d: &Scalar, e: &Scalar) -> [u8; 32] {
        let mut out = [0u8; 32];
        EntropyMixer::new(&mut ConstantRng(0), domain, d, e)
            .unwrap()
            .fill_bytes(&mut out)
            .unwrap();
        out
    }

    #[test]
    fn broken_rng_still_separates_keys_and_messages() {
        let one = Scalar::ONE;
        let two = Scalar::ONE + Scalar::ONE;

        let base = first_block(b"ECDSA-Sign", &one, &one);
        assert_eq!(base, first_block(b"ECDSA-Sign", &one, &one));
        assert_ne!(base, first_block(b"ECDSA-Sign", &two, &one));
        assert_ne!(base, first_block(b"ECDSA-Sign", &one, &two));
        assert_ne!(base, first_block(b"Other", &one, &one));
    }

    #[test]
    fn rng_contributes_entropy() {
        let mut zero = [0u8; 32];
        let mut ones = [0u8; 32];

        EntropyMixer::new(&mut ConstantRng(0), b"ECDSA-Sign", &Scalar::ONE, &Scalar::ONE)
            .unwrap()
            .fill_bytes(&mut zero)
            .unwrap();
        EntropyMixer::new(&mut ConstantRng(1), b"ECDSA-Sign", &Scalar::ONE, &Scalar::ONE)
            .unwrap()
            .fill_bytes(&mut ones)
            .unwrap();

        assert_ne!(zero, ones);
    }

    #[test]
    fn rng_failure_is_surfaced() {
        let result = EntropyMixer::new(&mut FailingRng, b"ECDSA-Sign", &Scalar::ONE, &Scalar::ONE);
        assert_eq!(result.err(), Some(Error::EntropySource));
    }
}
