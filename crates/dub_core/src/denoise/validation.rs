//! Path checks run before any tool is invoked.

use std::path::Path;

use super::types::{CleanResult, DenoiseError};

/// Check that `input` is an existing file and `output`'s directory exists.
///
/// An output with no parent component refers to the current directory.
pub fn validate_paths(input: &Path, output: &Path) -> CleanResult<()> {
    if !input.is_file() {
        return Err(DenoiseError::validation(format!(
            "Input audio file does not exist: {}",
            input.display()
        )));
    }

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            return Err(DenoiseError::validation(format!(
                "Output directory does not exist: {}",
                parent.display()
            )));
        }
    }

    Ok(())
}
