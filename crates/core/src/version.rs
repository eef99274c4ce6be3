// SPDX-License-Identifier: MIT

//! Version string in the `major.minor.build[status]` form the spec's
//! external interfaces section documents (spec §6), e.g. `"0.6.6p1"`.

pub const VERSION_MAJOR: u32 = 0;
pub const VERSION_MINOR: u32 = 1;
pub const VERSION_BUILD: u32 = 0;
/// Either `"dev"` or `""`; never anything else.
pub const VERSION_STATUS: &str = "dev";

pub fn version_string() -> String {
    format!("{VERSION_MAJOR}.{VERSION_MINOR}.{VERSION_BUILD}{VERSION_STATUS}")
}

#[cfg(test)]
#[path = "version_tests.rs"]
mod tests;
