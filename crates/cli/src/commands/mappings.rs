// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::display::format_mappings;
use crate::error::Result;

pub fn run() -> Result<()> {
    print!("{}", format_mappings());
    Ok(())
}
