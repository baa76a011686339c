/*!
 * Utility functions for extcopy
 */

use std::ffi::OsStr;

/// Format a human-readable file size
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}

/// Entries whose name starts with a dot are hidden
pub fn is_hidden(name: &OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

/// Shorten a file name for single-line progress messages
pub fn display_name(file_name: &str, max_len: usize) -> String {
    let count = file_name.chars().count();
    if count <= max_len {
        return file_name.to_string();
    }

    let keep = max_len.saturating_sub(3);
    let tail: String = file_name.chars().skip(count - keep).collect();
    format!("...{}", tail)
}
