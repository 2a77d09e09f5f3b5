//! Deterministic nonce generation as described in [RFC 6979] section 3.2,
//! instantiated with HMAC-SHA256.
//!
//! [RFC 6979]: https://datatracker.ietf.org/doc/html/rfc6979

use super::NonceSource;
use crate::{Result, Scalar, SCALAR_SIZE};
use rfc6979::HmacDrbg;
use sha2::Sha256;
use zeroize::Zeroizing;

/// HMAC-DRBG seeded with a private scalar and a message scalar.
///
/// Each read ends with the `K = HMAC_K(V || 0x00), V = HMAC_K(V)` step, so
/// consecutive reads yield the sequence of candidates described in step 3.h.
pub struct Rfc6979 {
    drbg: HmacDrbg<Sha256>,
}

impl Rfc6979 {
    /// Seed the DRBG with `int2octets(x) || bits2octets(h1)`.
    pub fn new(private_scalar: &Scalar, message_scalar: &Scalar) -> Self {
        let mut x = Zeroizing::new([0u8; SCALAR_SIZE]);
        x.copy_from_slice(&private_scalar.to_bytes());
        let h = message_scalar.to_bytes();

        Self {
            drbg: HmacDrbg::new(&x[..], &h, &[]),
        }
    }
}

impl NonceSource for Rfc6979 {
    fn fill_bytes(&mut self, out: &mut [u8]) -> Result<()> {
        self.drbg.fill_bytes(out);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash_to_scalar;
    use hex_literal::hex;
    use sha2::Digest;

    #[test]
    fn matches_known_nonce() {
        let e = hash_to_scalar(&Sha256::digest(b"Satoshi Nakamoto"));
        let mut drbg = Rfc6979::new(&Scalar::ONE, &e);

        let mut k = [0u8; 32];
        drbg.fill_bytes(&mut k).unwrap();
        assert_eq!(
            k,
            hex!("8F8A276C19F4149656B280621E358CCE24F5F52542772691EE69063B74F15D15")
        );
    }

    #[test]
    fn reads_advance_deterministically() {
        let e = hash_to_scalar(&Sha256::digest(b"test message"));

        let mut first = [[0u8; 32]; 3];
        let mut drbg = Rfc6979::new(&Scalar::ONE, &e);
        for out in first.iter_mut() {
            drbg.fill_bytes(out).unwrap();
        }

        let mut second = [[0u8; 32]; 3];
        let mut drbg = Rfc6979::new(&Scalar::ONE, &e);
        for out in second.iter_mut() {
            drbg.fill_bytes(out).unwrap();
        }

        assert_eq!(first, second);
        assert_ne!(first[0], first[1]);
        assert_ne!(first[1], first[2]);
    }

    #[test]
    fn long_reads_use_consecutive_blocks() {
        let e = hash_to_scalar(&Sha256::digest(b"test message"));

        let mut long = [0u8; 48];
        Rfc6979::new(&Scalar::ONE, &e).fill_bytes(&mut long).unwrap();

        let mut short = [0u8; 32];
        Rfc6979::new(&Scalar::ONE, &e).fill_bytes(&mut short).unwrap();

        assert_eq!(long[..32], short);
    }
}
