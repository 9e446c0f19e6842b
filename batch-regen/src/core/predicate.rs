//! Match predicate for qualifying directories.

use std::ffi::OsStr;

pub const DEFAULT_BUILD_FILE: &str = "Makefile";
pub const DEFAULT_GENERATED_FILE: &str = "cbmc-batch.yaml";

/// The pair of file names a directory must contain to be regenerated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerFiles {
    /// Build descriptor that knows how to produce the generated file.
    pub build_file: String,
    /// File that is deleted and rebuilt. Also the build target name.
    pub generated_file: String,
}

impl Default for MarkerFiles {
    fn default() -> Self {
        Self {
            build_file: DEFAULT_BUILD_FILE.to_string(),
            generated_file: DEFAULT_GENERATED_FILE.to_string(),
        }
    }
}

impl MarkerFiles {
    /// True when `file_names` (the non-directory entries of one directory)
    /// contains both markers. Comparison is exact and case-sensitive.
    pub fn qualifies<I, S>(&self, file_names: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut has_build = false;
        let mut has_generated = false;
        for name in file_names {
            let name = name.as_ref();
            if name == OsStr::new(&self.build_file) {
                has_build = true;
            } else if name == OsStr::new(&self.generated_file) {
                has_generated = true;
            }
            if has_build && has_generated {
                return true;
            }
        }
        false
    }
}
