// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: calchash
// File: algorithm.rs
// Author: calchash maintainers

use crate::chash::error::HashError;
use digest::Digest;
use md5::Md5;
use sha1::Sha1;
use sha2::{Sha256, Sha512};
use std::fmt;
use std::str::FromStr;
use strum::{EnumIter, IntoEnumIterator};

/// Digest algorithms understood by the aggregator.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, EnumIter)]
pub enum Algorithm {
	Md5,
	Sha1,
	Sha256,
	Sha512,
}

impl Algorithm {
	/// Selector string accepted on the command line.
	pub fn name(self) -> &'static str {
		match self {
			Algorithm::Md5 => "md5",
			Algorithm::Sha1 => "sha1",
			Algorithm::Sha256 => "sha256",
			Algorithm::Sha512 => "sha512",
		}
	}

	/// Native digest length in bytes.
	pub fn output_len(self) -> usize {
		match self {
			Algorithm::Md5 => 16,
			Algorithm::Sha1 => 20,
			Algorithm::Sha256 => 32,
			Algorithm::Sha512 => 64,
		}
	}

	pub fn hex_len(self) -> usize {
		self.output_len() * 2
	}

	pub fn hasher(self) -> DigestInstance {
		match self {
			Algorithm::Md5 => DigestInstance::Md5(Md5::new()),
			Algorithm::Sha1 => DigestInstance::Sha1(Sha1::new()),
			Algorithm::Sha256 => DigestInstance::Sha256(Sha256::new()),
			Algorithm::Sha512 => DigestInstance::Sha512(Sha512::new()),
		}
	}

	pub fn selectors() -> Vec<&'static str> {
		Algorithm::iter().map(Algorithm::name).collect()
	}
}

impl fmt::Display for Algorithm {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl FromStr for Algorithm {
	type Err = HashError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Algorithm::iter()
			.find(|alg| alg.name() == s)
			.ok_or_else(|| HashError::UnknownAlgorithm {
				name: s.to_string(),
			})
	}
}

macro_rules! with_hasher {
	($instance:expr, $hasher:ident => $body:expr) => {
		match $instance {
			DigestInstance::Md5($hasher) => $body,
			DigestInstance::Sha1($hasher) => $body,
			DigestInstance::Sha256($hasher) => $body,
			DigestInstance::Sha512($hasher) => $body,
		}
	};
}

/// Single-use accumulator bound to one [`Algorithm`].
///
/// `finalize` takes the instance by value, so a finished digest can
/// neither be fed again nor finalized twice.
#[derive(Clone)]
pub enum DigestInstance {
	Md5(Md5),
	Sha1(Sha1),
	Sha256(Sha256),
	Sha512(Sha512),
}

impl DigestInstance {
	pub fn algorithm(&self) -> Algorithm {
		match self {
			DigestInstance::Md5(_) => Algorithm::Md5,
			DigestInstance::Sha1(_) => Algorithm::Sha1,
			DigestInstance::Sha256(_) => Algorithm::Sha256,
			DigestInstance::Sha512(_) => Algorithm::Sha512,
		}
	}

	pub fn update(&mut self, data: &[u8]) {
		with_hasher!(self, hasher => Digest::update(hasher, data))
	}

	pub fn finalize(self) -> HexDigest {
		HexDigest(with_hasher!(self, hasher => {
			hex::encode(hasher.finalize())
		}))
	}
}

impl fmt::Debug for DigestInstance {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("DigestInstance")
			.field(&self.algorithm())
			.finish()
	}
}

/// Lowercase hexadecimal digest, no prefix or separators.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct HexDigest(String);

impl HexDigest {
	pub fn as_str(&self) -> &str {
		&self.0
	}

	pub fn as_bytes(&self) -> &[u8] {
		self.0.as_bytes()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl fmt::Display for HexDigest {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl PartialEq<&str> for HexDigest {
	fn eq(&self, other: &&str) -> bool {
		self.0 == *other
	}
}
