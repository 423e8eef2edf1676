// Path: crates/types/src/cid.rs

//! Content identifiers.
//!
//! A [`Cid`] is a CIDv1 with a sha2-256 multihash. The binary form is
//! `version || varint(codec) || 0x12 || 0x20 || digest`; the string form is
//! the binary form in lowercase base16 multibase (prefix `f`).

use crate::error::CidError;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// The only CID version produced and accepted.
pub const CID_VERSION: u8 = 1;
/// Multihash code for sha2-256.
pub const SHA2_256: u8 = 0x12;
/// Length in bytes of a sha2-256 digest.
pub const DIGEST_LEN: usize = 32;
/// Multibase prefix for lowercase base16.
pub const MULTIBASE_BASE16: char = 'f';

/// A multicodec code naming the codec a block's bytes are encoded with.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Multicodec(pub u64);

impl Multicodec {
    /// DAG-JSON (`0x0129`).
    pub const DAG_JSON: Multicodec = Multicodec(0x0129);
    /// The workspace's binary codec, in the multicodec private use range.
    pub const DAG_BINCODE: Multicodec = Multicodec(0x30_0000);

    /// Returns the registered name of a well-known codec.
    pub fn name(&self) -> Option<&'static str> {
        match *self {
            Self::DAG_JSON => Some("dag-json"),
            Self::DAG_BINCODE => Some("dag-bincode"),
            _ => None,
        }
    }
}

impl fmt::Debug for Multicodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Multicodec({self})")
    }
}

impl fmt::Display for Multicodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "0x{:x}", self.0),
        }
    }
}

/// A content identifier addressing exactly one block.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cid {
    codec: Multicodec,
    digest: [u8; DIGEST_LEN],
}

impl Cid {
    /// Builds a CID from a codec and an already computed sha2-256 digest.
    pub fn new(codec: Multicodec, digest: [u8; DIGEST_LEN]) -> Self {
        Self { codec, digest }
    }

    /// Addresses `data` encoded with `codec`.
    pub fn hash(codec: Multicodec, data: &[u8]) -> Self {
        let mut digest = [0u8; DIGEST_LEN];
        digest.copy_from_slice(&Sha256::digest(data));
        Self { codec, digest }
    }

    /// The codec the addressed block is encoded with.
    pub fn codec(&self) -> Multicodec {
        self.codec
    }

    /// The sha2-256 digest of the addressed block.
    pub fn digest(&self) -> &[u8; DIGEST_LEN] {
        &self.digest
    }

    /// Returns the binary form.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(DIGEST_LEN + 8);
        out.push(CID_VERSION);
        write_varint(self.codec.0, &mut out);
        out.push(SHA2_256);
        out.push(DIGEST_LEN as u8);
        out.extend_from_slice(&self.digest);
        out
    }

    /// Parses the binary form.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CidError> {
        let (&version, rest) = bytes.split_first().ok_or(CidError::Truncated)?;
        if version != CID_VERSION {
            return Err(CidError::UnsupportedVersion(version));
        }
        let (code, used) = read_varint(rest)?;
        let multihash = rest.get(used..).ok_or(CidError::Truncated)?;
        match multihash {
            [SHA2_256, len, digest @ ..] if usize::from(*len) == DIGEST_LEN => {
                let digest: [u8; DIGEST_LEN] = digest
                    .try_into()
                    .map_err(|_| CidError::DigestLength(digest.len()))?;
                Ok(Self::new(Multicodec(code), digest))
            }
            [SHA2_256, len, ..] => Err(CidError::DigestLength(usize::from(*len))),
            [hash, ..] => Err(CidError::UnsupportedMultihash(*hash)),
            [] => Err(CidError::Truncated),
        }
    }
}

fn write_varint(mut value: u64, out: &mut Vec<u8>) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

/// Reads an unsigned varint, accepting only the minimal encoding so that
/// every identifier has exactly one binary form.
fn read_varint(bytes: &[u8]) -> Result<(u64, usize), CidError> {
    let mut value = 0u64;
    // A u64 needs at most ten 7-bit groups, the last holding a single bit.
    for (i, &byte) in bytes.iter().take(10).enumerate() {
        if i == 9 && byte > 1 {
            return Err(CidError::Encoding("varint overflows u64".into()));
        }
        value |= u64::from(byte & 0x7f) << (7 * i);
        if byte & 0x80 == 0 {
            if byte == 0 && i > 0 {
                return Err(CidError::Encoding("non-minimal varint".into()));
            }
            return Ok((value, i + 1));
        }
    }
    Err(CidError::Truncated)
}

impl fmt::Display for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", MULTIBASE_BASE16, hex::encode(self.to_bytes()))
    }
}

impl fmt::Debug for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cid({self})")
    }
}

impl FromStr for Cid {
    type Err = CidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match chars.next() {
            Some(MULTIBASE_BASE16) => {}
            Some(other) => return Err(CidError::UnsupportedMultibase(other)),
            None => return Err(CidError::Truncated),
        }
        let digits = chars.as_str();
        // Display writes lowercase, so uppercase input would not round-trip.
        if digits.bytes().any(|b| b.is_ascii_uppercase()) {
            return Err(CidError::Encoding("base16 digits must be lowercase".into()));
        }
        let bytes = hex::decode(digits).map_err(|e| CidError::Encoding(e.to_string()))?;
        Self::from_bytes(&bytes)
    }
}

impl Serialize for Cid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.collect_str(self)
        } else {
            serializer.serialize_bytes(&self.to_bytes())
        }
    }
}

impl<'de> Deserialize<'de> for Cid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CidVisitor;

        impl<'de> Visitor<'de> for CidVisitor {
            type Value = Cid;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a CID string or its binary form")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Cid, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Cid, E> {
                Cid::from_bytes(v).map_err(E::custom)
            }

            fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Cid, A::Error> {
                let mut bytes = Vec::with_capacity(seq.size_hint().unwrap_or(DIGEST_LEN + 8));
                while let Some(byte) = seq.next_element::<u8>()? {
                    bytes.push(byte);
                }
                Cid::from_bytes(&bytes).map_err(de::Error::custom)
            }
        }

        if deserializer.is_human_readable() {
            deserializer.deserialize_str(CidVisitor)
        } else {
            deserializer.deserialize_bytes(CidVisitor)
        }
    }
}
