//! Guide output formats.
//!
//! Writers only read a finished [`Guide`]; they never reorder or drop blocks.

mod listing;
mod xmltv;

pub use listing::ListingWriter;
pub use xmltv::XmltvWriter;

use std::io::Write;
use std::path::Path;

use crate::error::EmitError;
use crate::timeline::Guide;

/// Renders a guide into some output format.
pub trait GuideWriter {
    fn write(&self, guide: &Guide, out: &mut dyn Write) -> Result<(), EmitError>;
}

/// Render `guide` in memory, then write it to `path`, creating parent directories.
///
/// # Errors
/// Returns an error if rendering fails or the file cannot be written.
pub fn write_file(writer: &dyn GuideWriter, guide: &Guide, path: &Path) -> Result<(), EmitError> {
    let mut buf = Vec::new();
    writer.write(guide, &mut buf)?;

    let file_error = |source| EmitError::File {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(file_error)?;
    }
    std::fs::write(path, buf).map_err(file_error)
}
