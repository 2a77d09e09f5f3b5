//! Pure Rust implementation of digital signatures over the [secp256k1]
//! elliptic curve, including:
//!
//! - the [Elliptic Curve Digital Signature Algorithm (ECDSA)][ECDSA] with
//!   low-S normalization and public key recovery,
//! - [BIP-0340] Schnorr signatures,
//! - ASN.1 DER, compact (`[R|S]`) and compact-recoverable (`[R|S|V]`)
//!   signature encodings,
//! - the [BIP-0066] strict DER grammar used by Bitcoin consensus.
//!
//! Group and field arithmetic is provided by the [`k256`] crate.
//!
//! ## About nonces
//!
//! ECDSA nonces are never taken directly from the caller's RNG. By default
//! 32 bytes of entropy are mixed with the private key and the message digest
//! through cSHAKE256, so a broken RNG still produces distinct nonces for
//! distinct keys and messages. Deterministic [RFC 6979] nonces are available
//! through [`Entropy::Rfc6979`].
//!
//! ## Signing/Verification Example
//!
//! ```
//! use secp256k1_sig::{PrivateKey, SignOptions, VerifyOptions};
//! use sha2::{Digest, Sha256};
//!
//! let private_key = PrivateKey::generate()?;
//! let digest = Sha256::digest(b"test message");
//!
//! let signature = private_key.sign(&digest, SignOptions::default())?;
//! assert!(private_key
//!     .public_key()
//!     .verify(&digest, &signature, &VerifyOptions::default()));
//! # Ok::<(), secp256k1_sig::Error>(())
//! ```
//!
//! ## ⚠️ Security Warning
//!
//! This crate has been designed with the goal of ensuring that secret-dependent
//! operations are performed in constant time (using the `subtle` crate and
//! constant-time formulas). However, it has not been thoroughly assessed to ensure
//! that generated assembly is constant time on common CPU architectures.
//!
//! USE AT YOUR OWN RISK!
//!
//! [secp256k1]: https://en.bitcoin.it/wiki/Secp256k1
//! [ECDSA]: https://en.wikipedia.org/wiki/Elliptic_Curve_Digital_Signature_Algorithm
//! [BIP-0340]: https://github.com/bitcoin/bips/blob/master/bip-0340.mediawiki
//! [BIP-0066]: https://github.com/bitcoin/bips/blob/master/bip-0066.mediawiki
//! [RFC 6979]: https://datatracker.ietf.org/doc/html/rfc6979

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc(
    html_logo_url = "https://raw.githubusercontent.com/RustCrypto/meta/master/logo.svg",
    html_favicon_url = "https://raw.githubusercontent.com/RustCrypto/meta/master/logo.svg",
    html_root_url = "https://docs.rs/secp256k1-sig/0.1.0"
)]
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod arithmetic;
mod error;
mod keys;
mod nonce;

pub mod bitcoin;
pub mod ecdsa;
pub mod schnorr;

#[cfg(any(feature = "test-vectors", test))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-vectors")))]
pub mod test_vectors;

pub use crate::{
    arithmetic::{hash_to_scalar, FIELD_MODULUS, ORDER},
    ecdsa::{Encoding, HashAlgorithm, RecoveryId, SignOptions, VerifyOptions},
    error::{Error, Result},
    keys::{PrivateKey, PublicKey},
    nonce::{Entropy, EntropyMixer, NonceSource, Rfc6979, MAX_SCALAR_RESAMPLES},
    schnorr::{SchnorrPrivateKey, SchnorrPublicKey},
};
pub use k256::{self, AffinePoint, ProjectivePoint, Scalar, Secp256k1};

use elliptic_curve::generic_array::{
    typenum::{U32, U33},
    GenericArray,
};

/// Compressed SEC1-encoded secp256k1 curve point.
pub type CompressedPoint = GenericArray<u8, U33>;

/// secp256k1 field element serialized as bytes.
///
/// Byte array containing a serialized field element value (base field or scalar).
pub type FieldBytes = GenericArray<u8, U32>;

/// Size of a serialized private key or scalar.
pub const SCALAR_SIZE: usize = 32;

/// Size of a SEC1 compressed public key.
pub const COMPRESSED_PUBLIC_KEY_SIZE: usize = 33;

/// Size of a SEC1 uncompressed public key.
pub const UNCOMPRESSED_PUBLIC_KEY_SIZE: usize = 65;
