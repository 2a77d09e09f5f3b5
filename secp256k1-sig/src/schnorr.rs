//! Schnorr signatures as defined in [BIP-0340].
//!
//! Public keys are 32-byte x-only encodings of a point with even Y.
//! Signatures are 64 bytes: `R.x || s`. Messages may be of any length.
//!
//! ## Example
//!
//! ```
//! use secp256k1_sig::SchnorrPrivateKey;
//!
//! let private_key = SchnorrPrivateKey::generate()?;
//! let signature = private_key.sign(b"hello")?;
//!
//! let public_key = private_key.public_key();
//! assert!(public_key.verify(b"hello", &signature));
//! assert!(!public_key.verify(b"goodbye", &signature));
//! # Ok::<(), secp256k1_sig::Error>(())
//! ```
//!
//! [BIP-0340]: https://github.com/bitcoin/bips/blob/master/bip-0340.mediawiki

#![allow(non_snake_case)]

use crate::{
    arithmetic::{affine, scalar},
    error::fatal,
    AffinePoint, Error, FieldBytes, PrivateKey, ProjectivePoint, PublicKey, Result, Scalar,
    FIELD_MODULUS,
};
use core::{
    fmt,
    hash::{Hash, Hasher},
};
use elliptic_curve::{
    bigint::U256,
    ops::{LinearCombination, Reduce},
    point::AffineCoordinates,
    subtle::{Choice, ConditionallySelectable},
};
use rand_core::{CryptoRngCore, OsRng};
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, Zeroizing};

const AUX_TAG: &[u8] = b"BIP0340/aux";
const NONCE_TAG: &[u8] = b"BIP0340/nonce";
const CHALLENGE_TAG: &[u8] = b"BIP0340/challenge";

/// Size of an x-only public key.
pub const PUBLIC_KEY_SIZE: usize = 32;

/// Size of a Schnorr signature.
pub const SIGNATURE_SIZE: usize = 64;

/// Size of the auxiliary randomness mixed into the nonce.
pub const AUX_RAND_SIZE: usize = 32;

/// BIP-0340 x-only public key.
///
/// The wrapped point always has even Y.
#[derive(Clone, Copy, Debug)]
pub struct SchnorrPublicKey {
    point: AffinePoint,
    x: FieldBytes,
}

impl SchnorrPublicKey {
    /// Parse a 32-byte x-only public key.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != PUBLIC_KEY_SIZE {
            return Err(Error::InvalidEncoding);
        }

        let x = FieldBytes::clone_from_slice(bytes);
        let point = affine::lift_x(&x, Choice::from(0)).ok_or(Error::InvalidPublicKey)?;
        Ok(Self { point, x })
    }

    /// Convert an ECDSA public key, negating it if its Y is odd.
    pub fn from_public_key(public_key: &PublicKey) -> Self {
        let (x, y_is_odd) = affine::split_uncompressed(public_key.as_uncompressed_bytes());
        Self {
            point: affine::conditional_negate(public_key.as_affine(), y_is_odd),
            x,
        }
    }

    /// Serialize as the 32-byte x-coordinate.
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_SIZE] {
        self.x.into()
    }

    /// Borrow the inner [`AffinePoint`].
    pub fn as_affine(&self) -> &AffinePoint {
        &self.point
    }

    /// Verify a signature over `msg`.
    ///
    /// Malformed signatures fail to verify.
    pub fn verify(&self, msg: &[u8], signature: &[u8]) -> bool {
        if signature.len() != SIGNATURE_SIZE {
            return false;
        }

        // r is an x-coordinate, so it is range checked against p rather than n
        let r = FieldBytes::from_slice(&signature[..32]);
        if U256::from_be_slice(r) >= FIELD_MODULUS {
            return false;
        }

        let s = match scalar::from_canonical_bytes(FieldBytes::from_slice(&signature[32..])) {
            Some(s) => s,
            None => return false,
        };

        let e = challenge(r, &self.x, msg);

        let R = ProjectivePoint::lincomb(
            &ProjectivePoint::GENERATOR,
            &s,
            &ProjectivePoint::from(self.point),
            &-e,
        )
        .to_affine();

        if affine::is_identity(&R) || bool::from(R.y_is_odd()) {
            return false;
        }

        R.x() == *r
    }
}

impl From<&PublicKey> for SchnorrPublicKey {
    fn from(public_key: &PublicKey) -> SchnorrPublicKey {
        SchnorrPublicKey::from_public_key(public_key)
    }
}

impl From<&SchnorrPrivateKey> for SchnorrPublicKey {
    fn from(private_key: &SchnorrPrivateKey) -> SchnorrPublicKey {
        private_key.public_key
    }
}

impl PartialEq for SchnorrPublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x
    }
}

impl Eq for SchnorrPublicKey {}

impl Hash for SchnorrPublicKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.x.as_slice().hash(state);
    }
}

/// BIP-0340 signing key.
///
/// Holds the private key it was created from alongside the sign-adjusted
/// scalar `d`, chosen so that `d·G` has even Y.
#[derive(Clone)]
pub struct SchnorrPrivateKey {
    original: PrivateKey,
    scalar: Scalar,
    public_key: SchnorrPublicKey,
}

impl SchnorrPrivateKey {
    /// Parse a 32-byte big endian private key.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        PrivateKey::from_bytes(bytes).map(|key| Self::from_private_key(&key))
    }

    /// Convert an ECDSA private key.
    ///
    /// If `d'·G` has odd Y, the scalar and the point are both negated.
    pub fn from_private_key(private_key: &PrivateKey) -> Self {
        let public_key = SchnorrPublicKey::from_public_key(private_key.public_key());
        let (_, y_is_odd) =
            affine::split_uncompressed(private_key.public_key().as_uncompressed_bytes());

        let d = private_key.as_scalar();
        Self {
            original: private_key.clone(),
            scalar: Scalar::conditional_select(d, &-*d, y_is_odd),
            public_key,
        }
    }

    /// Generate a random key using the operating system's CSPRNG.
    pub fn generate() -> Result<Self> {
        PrivateKey::generate().map(|key| Self::from_private_key(&key))
    }

    /// Generate a random key using `rng`.
    pub fn generate_with_rng(rng: &mut dyn CryptoRngCore) -> Result<Self> {
        PrivateKey::generate_with_rng(rng).map(|key| Self::from_private_key(&key))
    }

    /// Get the x-only public key.
    pub fn public_key(&self) -> &SchnorrPublicKey {
        &self.public_key
    }

    /// Borrow the private key this was created from, before sign adjustment.
    pub fn to_private_key(&self) -> &PrivateKey {
        &self.original
    }

    /// Sign `msg`, drawing auxiliary randomness from the operating system's
    /// CSPRNG.
    pub fn sign(&self, msg: &[u8]) -> Result<[u8; SIGNATURE_SIZE]> {
        self.sign_with_rng(&mut OsRng, msg)
    }

    /// Sign `msg`, drawing auxiliary randomness from `rng`.
    pub fn sign_with_rng(
        &self,
        rng: &mut dyn CryptoRngCore,
        msg: &[u8],
    ) -> Result<[u8; SIGNATURE_SIZE]> {
        let mut aux_rand = Zeroizing::new([0u8; AUX_RAND_SIZE]);
        rng.try_fill_bytes(&mut aux_rand[..])
            .map_err(|_| fatal(Error::EntropySource))?;
        self.sign_with_aux_rand(&aux_rand, msg)
    }

    /// Sign `msg` with explicit auxiliary randomness.
    ///
    /// The signature is checked before it is returned.
    pub fn sign_with_aux_rand(
        &self,
        aux_rand: &[u8; AUX_RAND_SIZE],
        msg: &[u8],
    ) -> Result<[u8; SIGNATURE_SIZE]> {
        let d = &self.scalar;

        let mut t = Zeroizing::new([0u8; 32]);
        t.copy_from_slice(&d.to_bytes());
        let aux_hash = tagged_hash(AUX_TAG).chain_update(aux_rand).finalize();
        for (t, a) in t.iter_mut().zip(aux_hash.iter()) {
            *t ^= a;
        }

        let mut rand = Zeroizing::new([0u8; 32]);
        rand.copy_from_slice(
            &tagged_hash(NONCE_TAG)
                .chain_update(&t[..])
                .chain_update(self.public_key.x)
                .chain_update(msg)
                .finalize(),
        );

        let k_prime = Zeroizing::new(<Scalar as Reduce<U256>>::reduce_bytes(
            FieldBytes::from_slice(&rand[..]),
        ));
        if bool::from(k_prime.is_zero()) {
            return Err(fatal(Error::NonceIsZero));
        }

        let R = (ProjectivePoint::GENERATOR * *k_prime).to_affine();
        let k = Zeroizing::new(Scalar::conditional_select(
            &*k_prime,
            &-*k_prime,
            R.y_is_odd(),
        ));

        let r = R.x();
        let e = challenge(&r, &self.public_key.x, msg);
        let s = *k + e * *d;

        // (s - e·d)·G must reproduce R with even Y
        let check = (ProjectivePoint::GENERATOR * (s - e * *d)).to_affine();
        if bool::from(check.y_is_odd()) || check.x() != r {
            return Err(fatal(Error::SignatureSelfCheck));
        }

        let mut signature = [0u8; SIGNATURE_SIZE];
        signature[..32].copy_from_slice(&r);
        signature[32..].copy_from_slice(&s.to_bytes());
        Ok(signature)
    }
}

impl From<&PrivateKey> for SchnorrPrivateKey {
    fn from(private_key: &PrivateKey) -> SchnorrPrivateKey {
        SchnorrPrivateKey::from_private_key(private_key)
    }
}

impl fmt::Debug for SchnorrPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchnorrPrivateKey")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

impl Drop for SchnorrPrivateKey {
    fn drop(&mut self) {
        self.scalar.zeroize();
    }
}

/// Domain separated hash of `msg`: `TaggedHash(name, msg)`.
///
/// Lets higher layers separate the payloads they sign. `name` must not be
/// empty.
pub fn pre_hash(name: &str, msg: &[u8]) -> Result<[u8; 32]> {
    if name.is_empty() {
        return Err(Error::InvalidDomain);
    }

    Ok(tagged_hash(name.as_bytes()).chain_update(msg).finalize().into())
}

/// `SHA256(SHA256(tag) || SHA256(tag))`, ready for the data to be appended.
fn tagged_hash(tag: &[u8]) -> Sha256 {
    let tag_hash = Sha256::digest(tag);
    let mut digest = Sha256::new();
    digest.update(tag_hash);
    digest.update(tag_hash);
    digest
}

fn challenge(r: &FieldBytes, public_key: &FieldBytes, msg: &[u8]) -> Scalar {
    let e = tagged_hash(CHALLENGE_TAG)
        .chain_update(r)
        .chain_update(public_key)
        .chain_update(msg)
        .finalize();
    <Scalar as Reduce<U256>>::reduce_bytes(&e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        nonce::test_rng::{ConstantRng, FailingRng},
        test_vectors::schnorr::{SIGN_VECTORS, VERIFY_VECTORS},
    };
    use hex_literal::hex;

    const ORDER_MINUS_ONE: [u8; 32] =
        hex!("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364140");

    #[test]
    fn bip340_sign_vectors() {
        for vector in SIGN_VECTORS {
            let key = SchnorrPrivateKey::from_bytes(&vector.secret_key).unwrap();
            assert_eq!(key.public_key().to_bytes(), vector.public_key, "vector {}", vector.index);

            let signature = key.sign_with_aux_rand(&vector.aux_rand, &vector.message).unwrap();
            assert_eq!(signature, vector.signature, "vector {}", vector.index);

            let public_key = SchnorrPublicKey::from_bytes(&vector.public_key).unwrap();
            assert!(public_key.verify(&vector.message, &signature), "vector {}", vector.index);
        }
    }

    #[test]
    fn bip340_verify_vectors() {
        for vector in VERIFY_VECTORS {
            let valid = match SchnorrPublicKey::from_bytes(&vector.public_key) {
                Ok(public_key) => public_key.verify(&vector.message, &vector.signature),
                Err(_) => false,
            };
            assert_eq!(valid, vector.valid, "vector {}", vector.index);
        }
    }

    #[test]
    fn bad_public_keys() {
        // not on the curve
        assert_eq!(
            SchnorrPublicKey::from_bytes(&VERIFY_VECTORS[1].public_key),
            Err(Error::InvalidPublicKey)
        );
        // exceeds the field size
        assert_eq!(SchnorrPublicKey::from_bytes(&[0xff; 32]), Err(Error::InvalidPublicKey));
        assert_eq!(SchnorrPublicKey::from_bytes(&[0x01; 33]), Err(Error::InvalidEncoding));
    }

    #[test]
    fn odd_y_keys_are_negated() {
        // (n - 1)·G = -G has odd Y, so it signs as the key 1
        let odd = PrivateKey::from_bytes(&ORDER_MINUS_ONE).unwrap();
        let one = SchnorrPrivateKey::from_bytes(&Scalar::ONE.to_bytes()).unwrap();
        let negated = SchnorrPrivateKey::from(&odd);

        assert_eq!(negated.public_key(), one.public_key());
        assert_eq!(negated.public_key().as_affine(), &AffinePoint::GENERATOR);
        assert_eq!(negated.to_private_key(), &odd);
        assert_eq!(SchnorrPublicKey::from(odd.public_key()), *one.public_key());

        let aux = [0x07; 32];
        assert_eq!(
            negated.sign_with_aux_rand(&aux, b"msg").unwrap(),
            one.sign_with_aux_rand(&aux, b"msg").unwrap()
        );
    }

    #[test]
    fn public_key_points_have_even_y() {
        for byte in 1..=16u8 {
            let key = SchnorrPrivateKey::generate_with_rng(&mut ConstantRng(byte)).unwrap();
            assert!(!bool::from(key.public_key().as_affine().y_is_odd()));

            let reparsed = SchnorrPublicKey::from_bytes(&key.public_key().to_bytes()).unwrap();
            assert_eq!(reparsed.as_affine(), key.public_key().as_affine());
        }
    }

    #[test]
    fn variable_length_messages() {
        let key = SchnorrPrivateKey::generate().unwrap();
        let public_key = SchnorrPublicKey::from(&key);

        let msgs: [&[u8]; 3] = [b"", &[0x11], &[0x22; 100]];
        for msg in msgs {
            let signature = key.sign(msg).unwrap();
            assert!(public_key.verify(msg, &signature));
        }
    }

    #[test]
    fn tampering_fails_verification() {
        let key = SchnorrPrivateKey::generate().unwrap();
        let signature = key.sign(b"test message").unwrap();
        let public_key = key.public_key();

        for i in 0..SIGNATURE_SIZE {
            let mut tampered = signature;
            tampered[i] ^= 0x01;
            assert!(!public_key.verify(b"test message", &tampered), "byte {}", i);
        }

        assert!(!public_key.verify(b"test message", &signature[..63]));
        assert!(!public_key.verify(b"test messagf", &signature));
    }

    #[test]
    fn aux_rand_failure() {
        let key = SchnorrPrivateKey::generate().unwrap();
        assert_eq!(key.sign_with_rng(&mut FailingRng, b"msg"), Err(Error::EntropySource));
    }

    #[test]
    fn pre_hash_is_tagged_hash() {
        assert_eq!(pre_hash("", b"payload"), Err(Error::InvalidDomain));

        let tag = Sha256::digest(b"app/payload");
        let expected: [u8; 32] = Sha256::new()
            .chain_update(tag)
            .chain_update(tag)
            .chain_update(b"payload")
            .finalize()
            .into();
        assert_eq!(pre_hash("app/payload", b"payload").unwrap(), expected);
        assert_ne!(pre_hash("app/other", b"payload").unwrap(), expected);
    }

    #[test]
    fn debug_does_not_leak_scalar() {
        let key = SchnorrPrivateKey::generate_with_rng(&mut ConstantRng(0x42)).unwrap();
        let debug = alloc::format!("{:?}", key);
        assert!(debug.starts_with("SchnorrPrivateKey"));
        assert!(!debug.contains("42424242"));
    }
}
