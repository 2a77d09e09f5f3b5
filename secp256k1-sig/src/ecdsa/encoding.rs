//! ECDSA signature encodings.
//!
//! - ASN.1 DER: `SEQUENCE { r INTEGER, s INTEGER }`, variable length.
//! - Compact: `r || s`, 64 bytes.
//! - Compact recoverable: `r || s || v`, 65 bytes, `v` in `[0, 3]`.
//!
//! Decoders reject malformed structure, trailing data, and scalars which
//! are zero or not less than the group order, so the signature engine never
//! sees a zero `r` or `s`.

use super::{Encoding, RecoveryId};
use crate::{arithmetic::scalar, Error, FieldBytes, Result, Scalar, SCALAR_SIZE};
use alloc::vec::Vec;
use der::{asn1::UintRef, Decode, Encode, Sequence};

/// Size of a compact `r || s` signature.
pub const COMPACT_SIGNATURE_SIZE: usize = 64;

/// Size of a compact recoverable `r || s || v` signature.
pub const COMPACT_RECOVERABLE_SIGNATURE_SIZE: usize = 65;

/// Maximum size of an ASN.1 DER signature.
pub const MAX_ASN1_SIGNATURE_SIZE: usize = 72;

/// `ECDSA-Sig-Value` from RFC 3279.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Sequence)]
struct Asn1Signature<'a> {
    r: UintRef<'a>,
    s: UintRef<'a>,
}

/// Parse an ASN.1 DER signature.
pub fn parse_asn1(bytes: &[u8]) -> Result<(Scalar, Scalar)> {
    let signature = Asn1Signature::from_der(bytes)?;
    Ok((
        uint_to_scalar(signature.r)?,
        uint_to_scalar(signature.s)?,
    ))
}

/// Serialize as a minimal ASN.1 DER signature.
pub fn build_asn1(r: &Scalar, s: &Scalar) -> Result<Vec<u8>> {
    let r = r.to_bytes();
    let s = s.to_bytes();

    let signature = Asn1Signature {
        r: UintRef::new(&r)?,
        s: UintRef::new(&s)?,
    };
    Ok(signature.to_der()?)
}

/// Parse a compact `r || s` signature.
pub fn parse_compact(bytes: &[u8]) -> Result<(Scalar, Scalar)> {
    if bytes.len() != COMPACT_SIGNATURE_SIZE {
        return Err(Error::InvalidSignatureEncoding);
    }

    let (r, s) = bytes.split_at(SCALAR_SIZE);
    Ok((
        non_zero_scalar(FieldBytes::from_slice(r))?,
        non_zero_scalar(FieldBytes::from_slice(s))?,
    ))
}

/// Serialize as a compact `r || s` signature.
pub fn build_compact(r: &Scalar, s: &Scalar) -> [u8; COMPACT_SIGNATURE_SIZE] {
    let mut out = [0u8; COMPACT_SIGNATURE_SIZE];
    out[..SCALAR_SIZE].copy_from_slice(&r.to_bytes());
    out[SCALAR_SIZE..].copy_from_slice(&s.to_bytes());
    out
}

/// Parse a compact recoverable `r || s || v` signature.
pub fn parse_compact_recoverable(bytes: &[u8]) -> Result<(Scalar, Scalar, RecoveryId)> {
    if bytes.len() != COMPACT_RECOVERABLE_SIGNATURE_SIZE {
        return Err(Error::InvalidSignatureEncoding);
    }

    let recovery_id =
        RecoveryId::from_byte(bytes[COMPACT_SIGNATURE_SIZE]).ok_or(Error::InvalidRecoveryId)?;
    let (r, s) = parse_compact(&bytes[..COMPACT_SIGNATURE_SIZE])?;
    Ok((r, s, recovery_id))
}

/// Serialize as a compact recoverable `r || s || v` signature.
pub fn build_compact_recoverable(
    r: &Scalar,
    s: &Scalar,
    recovery_id: RecoveryId,
) -> [u8; COMPACT_RECOVERABLE_SIGNATURE_SIZE] {
    let mut out = [0u8; COMPACT_RECOVERABLE_SIGNATURE_SIZE];
    out[..COMPACT_SIGNATURE_SIZE].copy_from_slice(&build_compact(r, s));
    out[COMPACT_SIGNATURE_SIZE] = recovery_id.to_byte();
    out
}

/// Parse a signature in the given encoding.
///
/// The recovery id is only present for [`Encoding::CompactRecoverable`].
pub fn decode(bytes: &[u8], encoding: Encoding) -> Result<(Scalar, Scalar, Option<RecoveryId>)> {
    match encoding {
        Encoding::Asn1 => parse_asn1(bytes).map(|(r, s)| (r, s, None)),
        Encoding::Compact => parse_compact(bytes).map(|(r, s)| (r, s, None)),
        Encoding::CompactRecoverable => {
            parse_compact_recoverable(bytes).map(|(r, s, v)| (r, s, Some(v)))
        }
    }
}

/// Serialize a signature in the given encoding.
pub fn encode(r: &Scalar, s: &Scalar, recovery_id: RecoveryId, encoding: Encoding) -> Result<Vec<u8>> {
    match encoding {
        Encoding::Asn1 => build_asn1(r, s),
        Encoding::Compact => Ok(build_compact(r, s).to_vec()),
        Encoding::CompactRecoverable => Ok(build_compact_recoverable(r, s, recovery_id).to_vec()),
    }
}

fn uint_to_scalar(uint: UintRef<'_>) -> Result<Scalar> {
    let bytes = uint.as_bytes();
    if bytes.len() > SCALAR_SIZE {
        return Err(Error::InvalidScalar);
    }

    let mut padded = FieldBytes::default();
    padded[SCALAR_SIZE - bytes.len()..].copy_from_slice(bytes);
    non_zero_scalar(&padded)
}

fn non_zero_scalar(bytes: &FieldBytes) -> Result<Scalar> {
    scalar::from_canonical_bytes(bytes)
        .filter(|scalar| !bool::from(scalar.is_zero()))
        .ok_or(Error::InvalidScalar)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    const R: [u8; 32] = hex!("934B1EA10A4B3C1757E2B0C017D0B6143CE3C9A7E6A4A49860D7A6AB210EE3D8");
    const S: [u8; 32] = hex!("2442CE9D2B916064108014783E923EC36B49743E2FFA1C4496F01A512AAFD9E5");

    fn scalars() -> (Scalar, Scalar) {
        (
            non_zero_scalar(&FieldBytes::from(R)).unwrap(),
            non_zero_scalar(&FieldBytes::from(S)).unwrap(),
        )
    }

    fn asn1(r: &[u8], s: &[u8]) -> Vec<u8> {
        let mut out = alloc::vec![0x30, (r.len() + s.len() + 4) as u8, 0x02, r.len() as u8];
        out.extend_from_slice(r);
        out.extend_from_slice(&[0x02, s.len() as u8]);
        out.extend_from_slice(s);
        out
    }

    #[test]
    fn asn1_is_minimal() {
        let (r, s) = scalars();

        let mut padded_r = alloc::vec![0x00];
        padded_r.extend_from_slice(&R);
        let expected = asn1(&padded_r, &S);

        assert_eq!(build_asn1(&r, &s).unwrap(), expected);
        assert_eq!(parse_asn1(&expected).unwrap(), (r, s));

        let one = Scalar::ONE;
        assert_eq!(build_asn1(&one, &one).unwrap(), asn1(&[1], &[1]));
        assert!(build_asn1(&r, &s).unwrap().len() <= MAX_ASN1_SIGNATURE_SIZE);
    }

    #[test]
    fn asn1_rejects_malformed() {
        let mut padded_r = alloc::vec![0x00];
        padded_r.extend_from_slice(&R);
        let valid = asn1(&padded_r, &S);

        // trailing data
        let mut trailing = valid.clone();
        trailing.push(0x00);
        assert_eq!(parse_asn1(&trailing), Err(Error::InvalidSignatureEncoding));

        // negative r
        assert_eq!(parse_asn1(&asn1(&R, &S)), Err(Error::InvalidSignatureEncoding));

        // redundant leading zero
        let mut padded_s = alloc::vec![0x00];
        padded_s.extend_from_slice(&S);
        assert_eq!(parse_asn1(&asn1(&padded_r, &padded_s)), Err(Error::InvalidSignatureEncoding));

        // truncated
        assert_eq!(parse_asn1(&valid[..valid.len() - 1]), Err(Error::InvalidSignatureEncoding));
        assert_eq!(parse_asn1(&[]), Err(Error::InvalidSignatureEncoding));
    }

    #[test]
    fn asn1_rejects_out_of_range() {
        assert_eq!(parse_asn1(&asn1(&[0], &S)), Err(Error::InvalidScalar));
        assert_eq!(parse_asn1(&asn1(&S, &[0])), Err(Error::InvalidScalar));

        let order = hex!("00FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141");
        assert_eq!(parse_asn1(&asn1(&order, &S)), Err(Error::InvalidScalar));

        let mut too_long = alloc::vec![0x01];
        too_long.extend_from_slice(&R);
        assert_eq!(parse_asn1(&asn1(&too_long, &S)), Err(Error::InvalidScalar));
    }

    #[test]
    fn compact() {
        let (r, s) = scalars();
        let bytes = build_compact(&r, &s);
        assert_eq!(bytes[..32], R);
        assert_eq!(bytes[32..], S);
        assert_eq!(parse_compact(&bytes).unwrap(), (r, s));

        assert_eq!(parse_compact(&bytes[1..]), Err(Error::InvalidSignatureEncoding));
        assert_eq!(parse_compact(&[0u8; 64]), Err(Error::InvalidScalar));
        assert_eq!(parse_compact(&[0xff; 64]), Err(Error::InvalidScalar));
    }

    #[test]
    fn compact_recoverable() {
        let (r, s) = scalars();

        for v in 0..=3 {
            let recovery_id = RecoveryId::from_byte(v).unwrap();
            let bytes = build_compact_recoverable(&r, &s, recovery_id);
            assert_eq!(bytes[64], v);
            assert_eq!(parse_compact_recoverable(&bytes).unwrap(), (r, s, recovery_id));
        }

        let mut bytes = build_compact_recoverable(&r, &s, RecoveryId::from_byte(0).unwrap());
        bytes[64] = 4;
        assert_eq!(parse_compact_recoverable(&bytes), Err(Error::InvalidRecoveryId));
        assert_eq!(parse_compact_recoverable(&bytes[..64]), Err(Error::InvalidSignatureEncoding));
    }

    #[test]
    fn dispatch_by_encoding() {
        let (r, s) = scalars();
        let recovery_id = RecoveryId::new(true, false);

        for encoding in [Encoding::Asn1, Encoding::Compact, Encoding::CompactRecoverable] {
            let bytes = encode(&r, &s, recovery_id, encoding).unwrap();
            let (r2, s2, v) = decode(&bytes, encoding).unwrap();
            assert_eq!((r2, s2), (r, s));
            assert_eq!(v.is_some(), encoding == Encoding::CompactRecoverable);
        }
    }
}
