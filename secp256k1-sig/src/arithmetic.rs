//! Adapter over the `k256` group and scalar arithmetic.
//!
//! Everything in this crate touches curve points and scalars through the
//! helpers in this module, which encode the range and identity checks the
//! signature schemes rely on.

pub(crate) mod affine;
pub(crate) mod scalar;

pub use self::scalar::hash_to_scalar;

use elliptic_curve::bigint::U256;

/// Order of the secp256k1 group, `n`.
pub const ORDER: U256 =
    U256::from_be_hex("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141");

/// Modulus of the secp256k1 base field, `p`.
pub const FIELD_MODULUS: U256 =
    U256::from_be_hex("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F");
