use std::fmt;
use std::io::{self, Read, Write};
use std::str::FromStr;

use md5::Md5;
use sha2::{Digest, Sha256};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unsupported hash algorithm: {0}")]
pub struct UnknownAlgorithm(pub String);

/// Hash algorithms a checksum manifest entry can be verified with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HashAlgorithm {
    Sha256,
    Md5,
}

impl HashAlgorithm {
    /// Order in which an entry's algorithms are considered. Only the first
    /// one the entry offers is ever checked.
    pub const PREFERENCE: [HashAlgorithm; 2] = [HashAlgorithm::Sha256, HashAlgorithm::Md5];

    /// Name used for this algorithm in checksum payloads.
    pub fn name(self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Md5 => "md5",
        }
    }

    /// Compute the lowercase hex digest of `bytes`.
    pub fn digest_bytes(self, bytes: &[u8]) -> String {
        match self {
            HashAlgorithm::Sha256 => hex::encode(Sha256::digest(bytes)),
            HashAlgorithm::Md5 => hex::encode(Md5::digest(bytes)),
        }
    }

    /// Compute the lowercase hex digest of everything `reader` yields.
    pub fn digest_reader<R: Read + ?Sized>(self, reader: &mut R) -> io::Result<String> {
        match self {
            HashAlgorithm::Sha256 => stream(reader, Sha256::new()),
            HashAlgorithm::Md5 => stream(reader, Md5::new()),
        }
    }
}

fn stream<R, D>(reader: &mut R, mut hasher: D) -> io::Result<String>
where
    R: Read + ?Sized,
    D: Digest + Write,
{
    io::copy(reader, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sha256" => Ok(HashAlgorithm::Sha256),
            "md5" => Ok(HashAlgorithm::Md5),
            other => Err(UnknownAlgorithm(other.to_string())),
        }
    }
}
