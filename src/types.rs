use serde::{Deserialize, Serialize};

/// Ordered list of scan results. Directory entries carry a trailing separator.
pub type PathList = Vec<String>;

/// Resolve results against the current working directory.
pub const ABSOLUTE_PATHS: u32 = 1 << 0;
/// Sort results ignoring case.
pub const CASELESS_SORT: u32 = 1 << 1;
/// Sort results by ordinal comparison. Applied after [`CASELESS_SORT`].
pub const CASE_SORT: u32 = 1 << 2;
/// Emit directory entries in addition to files.
pub const INCLUDE_DIRECTORIES: u32 = 1 << 3;
/// Descend into directories whose name starts with `.`.
pub const INCLUDE_HIDDEN: u32 = 1 << 4;
/// Only list the top level of the root.
pub const NON_RECURSIVE: u32 = 1 << 5;
/// Drop entries that fail to list or stat instead of failing the scan.
pub const IGNORE_ERRORS: u32 = 1 << 6;

/// Options controlling a single scan. All flags default to off.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    pub absolute_paths: bool,
    pub caseless_sort: bool,
    pub case_sort: bool,
    pub include_directories: bool,
    pub include_hidden: bool,
    pub non_recursive: bool,
    pub ignore_errors: bool,
    /// Glob patterns matched against root-relative paths while walking.
    /// A matching directory is pruned together with its subtree.
    pub excludes: Vec<String>,
}

impl ScanOptions {
    /// Builds options from a flag mask. Unknown bits are ignored.
    pub fn from_bits(bits: u32) -> Self {
        Self {
            absolute_paths: bits & ABSOLUTE_PATHS != 0,
            caseless_sort: bits & CASELESS_SORT != 0,
            case_sort: bits & CASE_SORT != 0,
            include_directories: bits & INCLUDE_DIRECTORIES != 0,
            include_hidden: bits & INCLUDE_HIDDEN != 0,
            non_recursive: bits & NON_RECURSIVE != 0,
            ignore_errors: bits & IGNORE_ERRORS != 0,
            excludes: Vec::new(),
        }
    }

    /// The flag mask equivalent of these options. `excludes` has no bit.
    pub fn bits(&self) -> u32 {
        [
            (self.absolute_paths, ABSOLUTE_PATHS),
            (self.caseless_sort, CASELESS_SORT),
            (self.case_sort, CASE_SORT),
            (self.include_directories, INCLUDE_DIRECTORIES),
            (self.include_hidden, INCLUDE_HIDDEN),
            (self.non_recursive, NON_RECURSIVE),
            (self.ignore_errors, IGNORE_ERRORS),
        ]
        .iter()
        .filter(|(set, _)| *set)
        .fold(0, |acc, (_, bit)| acc | bit)
    }

    pub fn with_excludes<I, S>(mut self, excludes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excludes = excludes.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateListResponse {
    pub templates: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReloadResponse {
    pub templates: usize,
}
