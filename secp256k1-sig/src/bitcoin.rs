//! Bitcoin consensus signature checks.
//!
//! Script signatures are ASN.1 DER followed by a one byte sighash flag and
//! must satisfy the strict encoding rules of [BIP-0066].
//!
//! [BIP-0066]: https://github.com/bitcoin/bips/blob/master/bip-0066.mediawiki

use crate::{Encoding, PublicKey, VerifyOptions};

const SEQUENCE_TAG: u8 = 0x30;
const INTEGER_TAG: u8 = 0x02;

/// Minimum size of a DER signature with sighash flag.
pub const MIN_SIGNATURE_SIZE: usize = 9;

/// Maximum size of a DER signature with sighash flag.
pub const MAX_SIGNATURE_SIZE: usize = 73;

/// Check the BIP-0066 strict DER grammar of a signature that ends with a
/// sighash flag.
///
/// Only the byte structure is checked; `r` and `s` may still be out of
/// range.
pub fn is_valid_signature_encoding(sig: &[u8]) -> bool {
    // 0x30 [total-length] 0x02 [R-length] [R] 0x02 [S-length] [S] [sighash]
    let len = sig.len();
    if !(MIN_SIGNATURE_SIZE..=MAX_SIGNATURE_SIZE).contains(&len) {
        return false;
    }

    if sig[0] != SEQUENCE_TAG {
        return false;
    }

    // covers everything but the sighash flag
    if usize::from(sig[1]) != len - 3 {
        return false;
    }

    // R must leave room for the S length
    let len_r = usize::from(sig[3]);
    if 5 + len_r >= len {
        return false;
    }

    let len_s = usize::from(sig[5 + len_r]);
    if len_r + len_s + 7 != len {
        return false;
    }

    if !is_strict_integer(sig[2], &sig[4..4 + len_r]) {
        return false;
    }

    is_strict_integer(sig[len_r + 4], &sig[len_r + 6..len_r + 6 + len_s])
}

/// Non-empty, non-negative, minimally encoded INTEGER.
fn is_strict_integer(tag: u8, value: &[u8]) -> bool {
    if tag != INTEGER_TAG {
        return false;
    }

    match value {
        [] => false,
        [first, ..] if first & 0x80 != 0 => false,
        [0x00, second, ..] if second & 0x80 == 0 => false,
        _ => true,
    }
}

/// Verify a Bitcoin script signature (DER plus sighash flag) over a 32-byte
/// sighash digest.
///
/// Signatures must satisfy the strict DER grammar and have a low `s`.
pub fn verify(public_key: &PublicKey, digest: &[u8], sig: &[u8]) -> bool {
    if !is_valid_signature_encoding(sig) {
        return false;
    }

    let options = VerifyOptions {
        hash: None,
        encoding: Encoding::Asn1,
        reject_malleable: true,
    };
    public_key.verify(digest, &sig[..sig.len() - 1], &options)
}
