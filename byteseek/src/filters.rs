use std::fs;
use std::path::Path;

/// Checks whether a directory entry may be handed to the scanner: a regular
/// file that is not a symbolic link. Links are never followed.
pub fn is_searchable_file(path: &Path) -> bool {
    match fs::symlink_metadata(path) {
        Ok(meta) => meta.is_file(),
        Err(_) => false,
    }
}

/// Strips at most one enclosing quotation mark from each end of a name
/// before it is printed.
pub fn trim_quotation_marks(name: &str) -> &str {
    let mut trimmed = name;
    if trimmed.len() > 1 && trimmed.ends_with('"') {
        trimmed = &trimmed[..trimmed.len() - 1];
    }
    if trimmed.starts_with('"') {
        trimmed = &trimmed[1..];
    }
    trimmed
}

/// The name a file is reported under: its base name, quote-trimmed.
pub fn display_name(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned());
    trim_quotation_marks(&name).to_string()
}
