// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: calchash
// File: lib.rs
// Author: calchash maintainers

pub mod chash {
	pub mod aggregate;
	pub mod algorithm;
	pub mod app;
	pub mod collect;
	pub mod error;
	pub mod logging;
}

pub use chash::aggregate::{
	aggregate, aggregate_named, digest_file, Aggregator, ThreadStrategy,
};
pub use chash::algorithm::{Algorithm, DigestInstance, HexDigest};
pub use chash::collect::collect_files;
pub use chash::error::{FileError, HashError};
