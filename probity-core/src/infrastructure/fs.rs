use crate::infrastructure::error::InfrastructureError;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

/// Write content to a file atomically using a temporary file.
///
/// This function:
/// 1. Creates the parent directory when it does not exist yet.
/// 2. Writes the content to a temporary file in that directory.
/// 3. Persists (renames) the temporary file to the target path.
///
/// Readers see either the previous artifact or the new one, never a partial write.
pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
) -> Result<(), InfrastructureError> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    // Same directory as the target so the rename never crosses filesystems
    let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
    temp_file.write_all(content.as_ref())?;
    temp_file
        .persist(path)
        .map_err(|e| InfrastructureError::Io(e.error))?;

    Ok(())
}

/// Pretty JSON with `indent` spaces per level.
pub fn to_json_indented<T: Serialize>(
    value: &T,
    indent: usize,
) -> Result<Vec<u8>, InfrastructureError> {
    let indent = " ".repeat(indent);
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    Ok(buffer)
}

/// `None` when the file does not exist; any other failure is an error.
pub fn read_if_exists(path: &Path) -> Result<Option<String>, InfrastructureError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(InfrastructureError::Io(e)),
    }
}
