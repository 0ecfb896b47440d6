// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: calchash
// File: main.rs
// Author: calchash maintainers

use calchash::chash::app;

fn main() -> Result<(), Box<dyn std::error::Error>> {
	app::run()?;
	Ok(())
}
