//! Affine points

use crate::{Error, FieldBytes, Result, FIELD_MODULUS, UNCOMPRESSED_PUBLIC_KEY_SIZE};
use elliptic_curve::{
    bigint::U256,
    point::DecompressPoint,
    sec1::{FromEncodedPoint, Tag, ToEncodedPoint},
    subtle::{Choice, ConditionallySelectable},
    Group,
};
use k256::{AffinePoint, EncodedPoint, ProjectivePoint};

/// Is this point the identity point?
pub(crate) fn is_identity(point: &AffinePoint) -> bool {
    ProjectivePoint::from(*point).is_identity().into()
}

/// Decode a SEC1 compressed or uncompressed point.
///
/// Only the `0x02`/`0x03` and `0x04` tags are accepted. The identity
/// encoding is rejected, as are points which are not on the curve.
pub(crate) fn decode_sec1(bytes: &[u8]) -> Result<AffinePoint> {
    if bytes.len() != 33 && bytes.len() != UNCOMPRESSED_PUBLIC_KEY_SIZE {
        return Err(Error::InvalidEncoding);
    }

    let encoded = EncodedPoint::from_bytes(bytes).map_err(|_| Error::InvalidEncoding)?;
    match encoded.tag() {
        Tag::CompressedEvenY | Tag::CompressedOddY | Tag::Uncompressed => {}
        _ => return Err(Error::InvalidEncoding),
    }

    let point = Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded))
        .ok_or(Error::InvalidPublicKey)?;

    if is_identity(&point) {
        return Err(Error::InvalidPublicKey);
    }

    Ok(point)
}

/// SEC1 uncompressed encoding of a non-identity point.
pub(crate) fn to_uncompressed(point: &AffinePoint) -> [u8; UNCOMPRESSED_PUBLIC_KEY_SIZE] {
    let mut out = [0u8; UNCOMPRESSED_PUBLIC_KEY_SIZE];
    out.copy_from_slice(point.to_encoded_point(false).as_bytes());
    out
}

/// SEC1 compressed encoding of a non-identity point.
pub(crate) fn to_compressed(point: &AffinePoint) -> [u8; 33] {
    let mut out = [0u8; 33];
    out.copy_from_slice(point.to_encoded_point(true).as_bytes());
    out
}

/// Split an uncompressed encoding into the x-coordinate and the parity of y.
pub(crate) fn split_uncompressed(bytes: &[u8; UNCOMPRESSED_PUBLIC_KEY_SIZE]) -> (FieldBytes, Choice) {
    let x = FieldBytes::clone_from_slice(&bytes[1..33]);
    (x, Choice::from(bytes[64] & 1))
}

/// Decompress point from x coordinate and oddness of y.
///
/// Returns `None` if `x` is not less than the field modulus or if there is
/// no point with that x-coordinate.
pub(crate) fn lift_x(x: &FieldBytes, y_is_odd: Choice) -> Option<AffinePoint> {
    if U256::from_be_slice(x) >= FIELD_MODULUS {
        return None;
    }

    AffinePoint::decompress(x, y_is_odd).into()
}

/// Negate `point` if `choice` is set, in constant time.
pub(crate) fn conditional_negate(point: &AffinePoint, choice: Choice) -> AffinePoint {
    AffinePoint::conditional_select(point, &-*point, choice)
}
