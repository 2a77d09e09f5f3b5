//! Private and public keys

use crate::{
    arithmetic::{affine, scalar},
    nonce::{sample_scalar, RngSource},
    AffinePoint, Error, FieldBytes, ProjectivePoint, Result, Scalar, COMPRESSED_PUBLIC_KEY_SIZE,
    SCALAR_SIZE, UNCOMPRESSED_PUBLIC_KEY_SIZE,
};
use core::{
    fmt,
    hash::{Hash, Hasher},
};
use rand_core::{CryptoRngCore, OsRng};
use subtle::{Choice, ConstantTimeEq};
use zeroize::{Zeroize, Zeroizing};

#[cfg(feature = "pkcs8")]
use {
    alloc::vec::Vec,
    k256::pkcs8::{DecodePublicKey, EncodePublicKey},
};

/// secp256k1 private key: a scalar `d` in `[1, n)`.
///
/// The corresponding [`PublicKey`] is computed once, on construction. The
/// scalar is zeroized when the key is dropped.
#[derive(Clone)]
pub struct PrivateKey {
    scalar: Scalar,
    public_key: PublicKey,
}

impl PrivateKey {
    /// Parse a private key from a 32-byte big endian scalar.
    ///
    /// Values which are zero or not less than the group order are rejected
    /// rather than reduced.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != SCALAR_SIZE {
            return Err(Error::InvalidPrivateKey);
        }

        let scalar = scalar::from_canonical_bytes(FieldBytes::from_slice(bytes))
            .ok_or(Error::InvalidPrivateKey)?;
        Self::from_scalar(scalar)
    }

    /// Create a private key from a scalar, rejecting zero.
    pub fn from_scalar(scalar: Scalar) -> Result<Self> {
        if bool::from(scalar.is_zero()) {
            return Err(Error::InvalidPrivateKey);
        }

        let point = (ProjectivePoint::GENERATOR * scalar).to_affine();
        Ok(Self {
            scalar,
            public_key: PublicKey::from_point_unchecked(point),
        })
    }

    /// Generate a random private key using the operating system's CSPRNG.
    pub fn generate() -> Result<Self> {
        Self::generate_with_rng(&mut OsRng)
    }

    /// Generate a random private key by rejection sampling from `rng`.
    pub fn generate_with_rng(rng: &mut dyn CryptoRngCore) -> Result<Self> {
        Self::from_scalar(sample_scalar(&mut RngSource(rng))?)
    }

    /// Serialize as a 32-byte big endian scalar.
    pub fn to_bytes(&self) -> Zeroizing<[u8; SCALAR_SIZE]> {
        let mut bytes = Zeroizing::new([0u8; SCALAR_SIZE]);
        bytes.copy_from_slice(&self.scalar.to_bytes());
        bytes
    }

    /// Get the [`PublicKey`] which corresponds to this private key.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Borrow the secret scalar.
    pub(crate) fn as_scalar(&self) -> &Scalar {
        &self.scalar
    }
}

impl ConstantTimeEq for PrivateKey {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.scalar.ct_eq(&other.scalar)
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for PrivateKey {}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.scalar.zeroize();
    }
}

/// secp256k1 public key: a curve point `Q` other than the identity.
///
/// The SEC1 uncompressed encoding is cached on construction.
#[derive(Clone, Copy, Debug)]
pub struct PublicKey {
    point: AffinePoint,
    uncompressed: [u8; UNCOMPRESSED_PUBLIC_KEY_SIZE],
}

impl PublicKey {
    /// Parse a SEC1 compressed (33-byte) or uncompressed (65-byte) public key.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        affine::decode_sec1(bytes).map(Self::from_point_unchecked)
    }

    /// Create a public key from a curve point, rejecting the identity.
    pub fn from_point(point: AffinePoint) -> Result<Self> {
        if affine::is_identity(&point) {
            return Err(Error::InvalidPublicKey);
        }

        Ok(Self::from_point_unchecked(point))
    }

    /// Caller guarantees that `point` is not the identity.
    pub(crate) fn from_point_unchecked(point: AffinePoint) -> Self {
        Self {
            point,
            uncompressed: affine::to_uncompressed(&point),
        }
    }

    /// Parse a DER-encoded `SubjectPublicKeyInfo` with the `id-ecPublicKey`
    /// algorithm and the `secp256k1` named curve (SEC1 Appendix C.3).
    #[cfg(feature = "pkcs8")]
    #[cfg_attr(docsrs, doc(cfg(feature = "pkcs8")))]
    pub fn from_spki_der(bytes: &[u8]) -> Result<Self> {
        let public_key =
            k256::PublicKey::from_public_key_der(bytes).map_err(|_| Error::InvalidEncoding)?;
        Self::from_point(*public_key.as_affine())
    }

    /// Serialize as a DER-encoded `SubjectPublicKeyInfo`.
    #[cfg(feature = "pkcs8")]
    #[cfg_attr(docsrs, doc(cfg(feature = "pkcs8")))]
    pub fn to_spki_der(&self) -> Result<Vec<u8>> {
        let public_key =
            k256::PublicKey::from_affine(self.point).map_err(|_| Error::InvalidPublicKey)?;
        let document = public_key
            .to_public_key_der()
            .map_err(|_| Error::InvalidEncoding)?;
        Ok(document.as_bytes().to_vec())
    }

    /// Borrow the inner [`AffinePoint`].
    pub fn as_affine(&self) -> &AffinePoint {
        &self.point
    }

    /// Borrow the SEC1 uncompressed encoding.
    pub fn as_uncompressed_bytes(&self) -> &[u8; UNCOMPRESSED_PUBLIC_KEY_SIZE] {
        &self.uncompressed
    }

    /// SEC1 uncompressed encoding: `0x04 || X || Y`.
    pub fn to_uncompressed_bytes(&self) -> [u8; UNCOMPRESSED_PUBLIC_KEY_SIZE] {
        self.uncompressed
    }

    /// SEC1 compressed encoding: `0x02 | parity(Y) || X`.
    pub fn to_compressed_bytes(&self) -> [u8; COMPRESSED_PUBLIC_KEY_SIZE] {
        affine::to_compressed(&self.point)
    }
}

impl From<&PrivateKey> for PublicKey {
    fn from(private_key: &PrivateKey) -> PublicKey {
        private_key.public_key
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.uncompressed[..] == other.uncompressed[..]
    }
}

impl Eq for PublicKey {}

impl Hash for PublicKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uncompressed[..].hash(state);
    }
}
