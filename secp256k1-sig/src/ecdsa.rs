//! Elliptic Curve Digital Signature Algorithm (ECDSA)
//!
//! Signatures are always produced in low-S form: when `s > n/2` it is
//! replaced by `n - s` and the Y-parity bit of the [`RecoveryId`] is flipped
//! accordingly, so `(r, s, recovery_id)` always recovers the signer's key.
//!
//! ## Signing/Verification Example
//!
//! ```
//! use secp256k1_sig::{Encoding, Entropy, PrivateKey, PublicKey, SignOptions, VerifyOptions};
//! use sha2::{Digest, Sha256};
//!
//! let private_key = PrivateKey::generate()?;
//! let digest = Sha256::digest(b"ECDSA proves knowledge of a secret number");
//!
//! // Deterministic nonces, recoverable encoding
//! let signature = private_key.sign(
//!     &digest,
//!     SignOptions {
//!         encoding: Encoding::CompactRecoverable,
//!         entropy: Entropy::Rfc6979,
//!         ..Default::default()
//!     },
//! )?;
//!
//! let options = VerifyOptions {
//!     encoding: Encoding::CompactRecoverable,
//!     reject_malleable: true,
//!     ..Default::default()
//! };
//! assert!(private_key.public_key().verify(&digest, &signature, &options));
//!
//! let recovered = PublicKey::recover_from_signature(&digest, &signature)?;
//! assert_eq!(&recovered, private_key.public_key());
//! # Ok::<(), secp256k1_sig::Error>(())
//! ```

pub mod encoding;

pub use ecdsa_core::RecoveryId;

use crate::{
    arithmetic::{affine, scalar},
    error::fatal,
    hash_to_scalar,
    nonce::{sample_scalar, Entropy, NonceSource, MAX_SCALAR_RESAMPLES},
    Error, FieldBytes, PrivateKey, ProjectivePoint, PublicKey, Result, Scalar, FIELD_MODULUS,
    ORDER,
};
use alloc::vec::Vec;
use elliptic_curve::{
    bigint::{Encoding as _, U256},
    ops::LinearCombination,
    point::AffineCoordinates,
    scalar::IsHigh,
    Group,
};
use subtle::{Choice, ConditionallySelectable};
use zeroize::Zeroizing;

/// Domain separation tag for the nonce [`EntropyMixer`](crate::EntropyMixer).
const SIGN_DOMAIN: &[u8] = b"ECDSA-Sign";

/// Digest size expected when no [`HashAlgorithm`] is configured.
pub const DEFAULT_DIGEST_SIZE: usize = 32;

/// Hash algorithm the message digest was computed with.
///
/// Only the digest length is checked; the leftmost 256 bits of longer
/// digests are used.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HashAlgorithm {
    /// SHA-224
    Sha224,
    /// SHA-256
    Sha256,
    /// SHA-384
    Sha384,
    /// SHA-512
    Sha512,
}

impl HashAlgorithm {
    /// Size of the digest in bytes.
    pub const fn output_size(self) -> usize {
        match self {
            HashAlgorithm::Sha224 => 28,
            HashAlgorithm::Sha256 => 32,
            HashAlgorithm::Sha384 => 48,
            HashAlgorithm::Sha512 => 64,
        }
    }
}

/// Signature wire encoding.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Encoding {
    /// ASN.1 DER `SEQUENCE { r INTEGER, s INTEGER }`.
    #[default]
    Asn1,
    /// `r || s`, 64 bytes.
    Compact,
    /// `r || s || v`, 65 bytes.
    CompactRecoverable,
}

/// Options for [`PrivateKey::sign`] and [`PrivateKey::sign_raw`].
#[derive(Debug, Default)]
pub struct SignOptions<'a> {
    /// Hash the digest was produced with, if not a 32-byte digest.
    pub hash: Option<HashAlgorithm>,

    /// Encoding of the produced signature.
    pub encoding: Encoding,

    /// Source of nonce entropy.
    pub entropy: Entropy<'a>,

    /// Verify the signature before returning it, guarding against faults.
    pub self_verify: bool,
}

/// Options for [`PublicKey::verify`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct VerifyOptions {
    /// Hash the digest was produced with, if not a 32-byte digest.
    pub hash: Option<HashAlgorithm>,

    /// Encoding of the signature.
    pub encoding: Encoding,

    /// Reject signatures with `s > n/2`.
    pub reject_malleable: bool,
}

fn check_digest(digest: &[u8], hash: Option<HashAlgorithm>) -> Result<()> {
    let expected = hash.map_or(DEFAULT_DIGEST_SIZE, HashAlgorithm::output_size);
    if digest.len() != expected {
        return Err(Error::InvalidDigest {
            expected,
            actual: digest.len(),
        });
    }

    Ok(())
}

impl PrivateKey {
    /// Sign a message digest, returning the encoded signature.
    pub fn sign(&self, digest: &[u8], options: SignOptions<'_>) -> Result<Vec<u8>> {
        let encoding = options.encoding;
        let (r, s, recovery_id) = self.sign_raw(digest, options)?;
        encoding::encode(&r, &s, recovery_id, encoding)
    }

    /// Sign a message digest, returning `(r, s, recovery_id)`.
    ///
    /// `s` is always normalized to the lower half of the scalar field. The
    /// encoding in `options` is ignored.
    pub fn sign_raw(
        &self,
        digest: &[u8],
        options: SignOptions<'_>,
    ) -> Result<(Scalar, Scalar, RecoveryId)> {
        check_digest(digest, options.hash)?;

        let d = self.as_scalar();
        let e = hash_to_scalar(digest);

        let (r, s, recovery_id) = options
            .entropy
            .with_source(SIGN_DOMAIN, d, &e, |source| sign_with_source(d, &e, source))?;

        if options.self_verify && !self.verify_raw(digest, &r, &s) {
            return Err(fatal(Error::SignatureSelfCheck));
        }

        Ok((r, s, recovery_id))
    }

    /// Verify a signature over `digest` made by this key.
    ///
    /// Computes `R = (u1 + u2·d)·G` with a single constant-time scalar
    /// multiplication instead of the double-scalar multiplication done by
    /// [`PublicKey::verify_raw`].
    pub fn verify_raw(&self, digest: &[u8], r: &Scalar, s: &Scalar) -> bool {
        let (u1, u2) = match verification_scalars(digest, r, s) {
            Some(u) => u,
            None => return false,
        };

        let big_r = ProjectivePoint::GENERATOR * (u1 + u2 * self.as_scalar());
        x_matches_r(&big_r, r)
    }
}

#[allow(non_snake_case)]
fn sign_with_source(
    d: &Scalar,
    e: &Scalar,
    source: &mut dyn NonceSource,
) -> Result<(Scalar, Scalar, RecoveryId)> {
    for _ in 0..MAX_SCALAR_RESAMPLES {
        let k = Zeroizing::new(sample_scalar(source)?);

        // 𝑹 = 𝑘×𝑮
        let R = (ProjectivePoint::GENERATOR * *k).to_affine();

        // Lift x-coordinate of 𝑹 (element of base field) into a serialized big
        // integer, then reduce it into an element of the scalar field
        let (r, is_x_reduced) = scalar::from_bytes_reducing(&R.x());
        if bool::from(r.is_zero()) {
            continue;
        }

        let k_inv = match Option::<Scalar>::from(k.invert()) {
            Some(k_inv) => Zeroizing::new(k_inv),
            None => continue,
        };

        let s = *k_inv * (*e + r * d);
        if bool::from(s.is_zero()) {
            continue;
        }

        // Normalize to low-S; negating s corresponds to negating R.
        let is_high = s.is_high();
        let s = Scalar::conditional_select(&s, &-s, is_high);
        let is_y_odd = bool::from(R.y_is_odd() ^ is_high);

        return Ok((r, s, RecoveryId::new(is_y_odd, is_x_reduced)));
    }

    Err(fatal(Error::RejectionSampling))
}

/// Compute `(u1, u2) = (e·s⁻¹, r·s⁻¹)`, rejecting zero `r` or `s`.
fn verification_scalars(digest: &[u8], r: &Scalar, s: &Scalar) -> Option<(Scalar, Scalar)> {
    if bool::from(r.is_zero() | s.is_zero()) {
        return None;
    }

    let e = hash_to_scalar(digest);
    let s_inv = Option::<Scalar>::from(s.invert())?;
    Some((e * s_inv, *r * s_inv))
}

/// Does `R` reduce to `r`? The identity never matches.
fn x_matches_r(big_r: &ProjectivePoint, r: &Scalar) -> bool {
    if bool::from(big_r.is_identity()) {
        return false;
    }

    let (x, _) = scalar::from_bytes_reducing(&big_r.to_affine().x());
    x == *r
}

impl PublicKey {
    /// Verify an encoded signature over a message digest.
    ///
    /// Malformed digests and signatures fail verification.
    pub fn verify(&self, digest: &[u8], signature: &[u8], options: &VerifyOptions) -> bool {
        if check_digest(digest, options.hash).is_err() {
            return false;
        }

        let (r, s) = match encoding::decode(signature, options.encoding) {
            Ok((r, s, _)) => (r, s),
            Err(_) => return false,
        };

        if options.reject_malleable && bool::from(s.is_high()) {
            return false;
        }

        self.verify_raw(digest, &r, &s)
    }

    /// Verify `(r, s)` over a message digest.
    ///
    /// Computes `R = u1·G + u2·Q` as a single linear combination.
    pub fn verify_raw(&self, digest: &[u8], r: &Scalar, s: &Scalar) -> bool {
        let (u1, u2) = match verification_scalars(digest, r, s) {
            Some(u) => u,
            None => return false,
        };

        let big_r = ProjectivePoint::lincomb(
            &ProjectivePoint::GENERATOR,
            &u1,
            &ProjectivePoint::from(*self.as_affine()),
            &u2,
        );
        x_matches_r(&big_r, r)
    }

    /// Recover the public key which produced `(r, s)` over `digest`.
    ///
    /// Fails with [`Error::InvalidRecoveryId`] if `recovery_id` is not in
    /// `[0, 3]` and with [`Error::InvalidScalar`] if `r` or `s` is zero.
    pub fn recover(digest: &[u8], r: &Scalar, s: &Scalar, recovery_id: u8) -> Result<Self> {
        let recovery_id = RecoveryId::from_byte(recovery_id).ok_or(Error::InvalidRecoveryId)?;
        Self::recover_with_id(digest, r, s, recovery_id)
    }

    /// Recover the public key from a compact recoverable `r || s || v`
    /// signature.
    pub fn recover_from_signature(digest: &[u8], signature: &[u8]) -> Result<Self> {
        let (r, s, recovery_id) = encoding::parse_compact_recoverable(signature)?;
        Self::recover_with_id(digest, &r, &s, recovery_id)
    }

    /// `Q = r⁻¹·(s·R − e·G) = (−e·r⁻¹)·G + (s·r⁻¹)·R`
    #[allow(non_snake_case)]
    fn recover_with_id(
        digest: &[u8],
        r: &Scalar,
        s: &Scalar,
        recovery_id: RecoveryId,
    ) -> Result<Self> {
        if bool::from(r.is_zero() | s.is_zero()) {
            return Err(Error::InvalidScalar);
        }

        let mut x = r.to_bytes();
        if recovery_id.is_x_reduced() {
            // R.x = r + n, which must still be an element of the base field.
            let r_int = U256::from_be_slice(&x);
            if r_int >= FIELD_MODULUS.wrapping_sub(&ORDER) {
                return Err(Error::RecoveryFailed);
            }
            x = FieldBytes::from(r_int.wrapping_add(&ORDER).to_be_bytes());
        }

        let R = affine::lift_x(&x, Choice::from(recovery_id.is_y_odd() as u8))
            .ok_or(Error::RecoveryFailed)?;
        if affine::is_identity(&R) {
            return Err(Error::RecoveryFailed);
        }

        let e = hash_to_scalar(digest);
        let r_inv = Option::<Scalar>::from(r.invert()).ok_or(Error::InvalidScalar)?;
        let u1 = -(e * r_inv);
        let u2 = *s * r_inv;

        let Q = ProjectivePoint::lincomb(
            &ProjectivePoint::GENERATOR,
            &u1,
            &ProjectivePoint::from(R),
            &u2,
        );

        Self::from_point(Q.to_affine()).map_err(|_| Error::RecoveryFailed)
    }
}
