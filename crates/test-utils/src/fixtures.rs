//! Scratch-file fixtures for dataset open-path tests.

use tempfile::NamedTempFile;

use wind_grid::axes;

/// A sparse temp file of exactly the dataset byte length.
///
/// Sparse allocation means no actual 19 GB hit the disk; unwritten pages
/// read back as zeros, which is enough for the open and raw-read paths.
pub fn exact_size_dataset_file() -> NamedTempFile {
    sized_file(axes::DATASET_BYTES)
}

/// A sparse temp file of an arbitrary byte length.
pub fn sized_file(len: u64) -> NamedTempFile {
    let file = NamedTempFile::new().expect("create temp file");
    file.as_file().set_len(len).expect("extend temp file");
    file
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sized_file_reports_requested_length() {
        let file = sized_file(4096);
        assert_eq!(file.as_file().metadata().unwrap().len(), 4096);
    }
}
