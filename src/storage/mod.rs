//! Output file storage.
//!
//! Each run writes two JSON files next to each other:
//!
//! ```text
//! trends_data.json          # Raw: CollectionResult, one entry per region
//! trends_data_simple.json   # Simplified: trending queries of successful regions
//! ```

pub mod local;

use std::path::{Path, PathBuf};

// Re-export for convenience
pub use local::{read_collection, read_simplified, write_outputs};

/// Paths and sizes of the files written by a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFiles {
    pub raw_path: PathBuf,
    pub raw_bytes: usize,
    pub simple_path: PathBuf,
    pub simple_bytes: usize,
}

/// Path of the simplified file: `_simple` inserted before the extension.
pub fn simple_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let file_name = match path.extension() {
        Some(ext) => format!("{stem}_simple.{}", ext.to_string_lossy()),
        None => format!("{stem}_simple"),
    };
    path.with_file_name(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inserts_suffix_before_extension() {
        assert_eq!(
            simple_path(Path::new("trends_data.json")),
            PathBuf::from("trends_data_simple.json")
        );
        assert_eq!(
            simple_path(Path::new("out/daily.trends.json")),
            PathBuf::from("out/daily.trends_simple.json")
        );
    }

    #[test]
    fn handles_missing_extension() {
        assert_eq!(simple_path(Path::new("data/output")), PathBuf::from("data/output_simple"));
    }
}
