// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: calchash
// File: aggregate.rs
// Author: calchash maintainers

//! Per-file digesting and ordered aggregation.
//!
//! The aggregate digest is the digest of the concatenated lowercase hex
//! strings of every file digest, in the order the paths were given.

use crate::chash::algorithm::{Algorithm, HexDigest};
use crate::chash::error::{FileError, HashError};
use crate::chash::logging::digest_line;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::num::NonZeroUsize;
use std::path::Path;
use std::thread;
use tracing::{debug, trace};

/// Read buffer size used while streaming a file.
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Stream one file through a fresh instance of `algorithm`.
pub fn digest_file(
	path: &Path,
	algorithm: Algorithm,
) -> Result<HexDigest, FileError> {
	let mut reader =
		BufReader::with_capacity(CHUNK_SIZE, File::open(path)?);
	let mut buffer = vec![0; reader.capacity()];
	let mut instance = algorithm.hasher();
	loop {
		let count = match reader.read(&mut buffer) {
			Ok(0) => break,
			Ok(count) => count,
			Err(err) if err.kind() == io::ErrorKind::Interrupted => {
				continue
			}
			Err(err) => return Err(FileError::Other(err)),
		};
		instance.update(&buffer[..count]);
	}
	Ok(instance.finalize())
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ThreadStrategy {
	#[default]
	Single,
	Auto,
	Fixed(u16),
}

impl ThreadStrategy {
	/// `0` means one worker per available CPU.
	pub fn from_count(count: u16) -> Self {
		match count {
			0 => ThreadStrategy::Auto,
			1 => ThreadStrategy::Single,
			n => ThreadStrategy::Fixed(n),
		}
	}

	pub fn worker_count(self, jobs: usize) -> usize {
		let wanted = match self {
			ThreadStrategy::Single => 1,
			ThreadStrategy::Auto => thread::available_parallelism()
				.map(NonZeroUsize::get)
				.unwrap_or(1),
			ThreadStrategy::Fixed(n) => usize::from(n),
		};
		wanted.clamp(1, jobs.max(1))
	}
}

#[derive(Clone, Debug)]
pub struct Aggregator {
	pub algorithm: Algorithm,
	pub threads: ThreadStrategy,
}

impl Default for Aggregator {
	fn default() -> Self {
		Aggregator {
			algorithm: Algorithm::Sha1,
			threads: ThreadStrategy::Single,
		}
	}
}

impl Aggregator {
	pub fn new(algorithm: Algorithm) -> Self {
		Aggregator {
			algorithm,
			..Default::default()
		}
	}

	pub fn with_threads(mut self, threads: ThreadStrategy) -> Self {
		self.threads = threads;
		self
	}

	/// Digest every path in order and fold the hex results into one
	/// digest. The first failing path aborts the whole run.
	pub fn run<P>(&self, paths: &[P]) -> Result<HexDigest, HashError>
	where
		P: AsRef<Path> + Sync,
	{
		let workers = self.threads.worker_count(paths.len());
		debug!(
			algorithm = %self.algorithm,
			files = paths.len(),
			workers,
			"aggregating file digests"
		);
		if workers <= 1 {
			let algorithm = self.algorithm;
			self.fold(
				paths,
				paths.iter().map(|p| digest_file(p.as_ref(), algorithm)),
			)
		} else {
			let digests = self.digest_parallel(paths, workers);
			self.fold(paths, digests.into_iter())
		}
	}

	fn fold<P, I>(
		&self,
		paths: &[P],
		digests: I,
	) -> Result<HexDigest, HashError>
	where
		P: AsRef<Path>,
		I: Iterator<Item = Result<HexDigest, FileError>>,
	{
		let mut overall = self.algorithm.hasher();
		for (path, result) in paths.iter().zip(digests) {
			let path = path.as_ref();
			let digest =
				result.map_err(|source| HashError::FileFailed {
					path: path.to_path_buf(),
					source,
				})?;
			debug!("{}", digest_line(self.algorithm, path, &digest));
			overall.update(digest.as_bytes());
		}
		let digest = overall.finalize();
		trace!(digest = %digest, "aggregate finalized");
		Ok(digest)
	}

	/// Leaf digests only; results come back in path order.
	fn digest_parallel<P>(
		&self,
		paths: &[P],
		workers: usize,
	) -> Vec<Result<HexDigest, FileError>>
	where
		P: AsRef<Path> + Sync,
	{
		let algorithm = self.algorithm;
		let chunk_len = paths.len().div_ceil(workers);
		thread::scope(|scope| {
			let handles: Vec<_> = paths
				.chunks(chunk_len)
				.map(|chunk| {
					scope.spawn(move || {
						chunk
							.iter()
							.map(|p| digest_file(p.as_ref(), algorithm))
							.collect::<Vec<_>>()
					})
				})
				.collect();
			handles
				.into_iter()
				.flat_map(|handle| match handle.join() {
					Ok(results) => results,
					Err(panic) => std::panic::resume_unwind(panic),
				})
				.collect()
		})
	}
}

/// Aggregate `paths` sequentially with `algorithm`.
///
/// An empty list yields the algorithm's digest of zero bytes.
pub fn aggregate<P>(
	paths: &[P],
	algorithm: Algorithm,
) -> Result<HexDigest, HashError>
where
	P: AsRef<Path> + Sync,
{
	Aggregator::new(algorithm).run(paths)
}

/// Like [`aggregate`], resolving the selector before touching any file.
pub fn aggregate_named<P>(
	paths: &[P],
	selector: &str,
) -> Result<HexDigest, HashError>
where
	P: AsRef<Path> + Sync,
{
	let algorithm: Algorithm = selector.parse()?;
	aggregate(paths, algorithm)
}
