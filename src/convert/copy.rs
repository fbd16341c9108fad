//! Verbatim copy, the default strategy.
//!
//! Text files with a substitutable extension (see
//! [`crate::placeholder::SUBSTITUTABLE_EXTENSIONS`]) are read, substituted
//! and written back out; everything else is copied byte for byte. Existing
//! destinations are overwritten.

use super::{ConvertError, Converted, Converter, ensure_parent, output_path};
use crate::config::ProjectSettings;
use crate::placeholder;
use std::fs;
use std::path::Path;

#[derive(Debug, Default, Clone, Copy)]
pub struct CopyConverter;

impl Converter for CopyConverter {
    fn name(&self) -> &'static str {
        "copy"
    }

    fn convert(&self, source: &Path, settings: &ProjectSettings) -> Result<Converted, ConvertError> {
        let destination = output_path(source, settings, None)?;
        tracing::info!(
            source = %source.display(),
            destination = %destination.display(),
            "Copying"
        );
        ensure_parent(&destination)?;

        if placeholder::is_substitutable(&extension_of(source)) {
            let content = fs::read(source)?;
            fs::write(&destination, placeholder::substitute_bytes(&content, settings))?;
        } else {
            fs::copy(source, &destination)?;
        }
        Ok(Converted::new(destination))
    }
}

/// Extension with its leading dot, or empty.
pub(crate) fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default()
}
