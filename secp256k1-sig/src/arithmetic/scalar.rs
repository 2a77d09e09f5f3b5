//! Scalar helpers

use crate::{FieldBytes, Scalar, SCALAR_SIZE};
use elliptic_curve::{bigint::U256, ops::Reduce, PrimeField};

/// Decode a big endian scalar, rejecting values which are not less than the
/// group order.
pub(crate) fn from_canonical_bytes(bytes: &FieldBytes) -> Option<Scalar> {
    Scalar::from_repr(*bytes).into()
}

/// Decode a big endian scalar, reducing it modulo the group order.
///
/// Also returns whether a reduction took place.
pub(crate) fn from_bytes_reducing(bytes: &FieldBytes) -> (Scalar, bool) {
    let did_reduce = bool::from(Scalar::from_repr(*bytes).is_none());
    (<Scalar as Reduce<U256>>::reduce_bytes(bytes), did_reduce)
}

/// Convert a message digest to a scalar.
///
/// The leftmost 256 bits of the digest are interpreted as a big endian
/// integer (shorter digests are left padded with zeros) and reduced modulo
/// the group order. As `2^256 < 2n` this is at most a single subtraction.
pub fn hash_to_scalar(digest: &[u8]) -> Scalar {
    let mut bytes = FieldBytes::default();

    if digest.len() >= SCALAR_SIZE {
        bytes.copy_from_slice(&digest[..SCALAR_SIZE]);
    } else {
        bytes[SCALAR_SIZE - digest.len()..].copy_from_slice(digest);
    }

    <Scalar as Reduce<U256>>::reduce_bytes(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    const ORDER_BYTES: [u8; 32] =
        hex!("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141");

    #[test]
    fn canonical_decode() {
        let one = FieldBytes::from(hex!(
            "0000000000000000000000000000000000000000000000000000000000000001"
        ));
        assert_eq!(from_canonical_bytes(&one), Some(Scalar::ONE));
        assert_eq!(from_canonical_bytes(&FieldBytes::from(ORDER_BYTES)), None);
    }

    #[test]
    fn reducing_decode() {
        let (zero, did_reduce) = from_bytes_reducing(&FieldBytes::from(ORDER_BYTES));
        assert!(did_reduce);
        assert!(bool::from(zero.is_zero()));

        let (one, did_reduce) = from_bytes_reducing(&Scalar::ONE.to_bytes());
        assert!(!did_reduce);
        assert_eq!(one, Scalar::ONE);
    }

    #[test]
    fn digest_truncation_and_padding() {
        let mut long = [0u8; 64];
        long[31] = 1;
        long[63] = 0xff;
        assert_eq!(hash_to_scalar(&long), Scalar::ONE);
        assert_eq!(hash_to_scalar(&[1]), Scalar::ONE);
        assert_eq!(hash_to_scalar(&ORDER_BYTES), Scalar::ZERO);
    }
}
