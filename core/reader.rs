use crate::error::{AppError, Result};
use std::fs;
use std::path::Path;

pub const READ_FAILURE_PLACEHOLDER: &str = "[Error: file could not be read - encoding problem]";

/// Reads a file as text: UTF-8 (BOM stripped) first, then Latin-1.
/// Line endings are normalized to `\n`.
///
/// Latin-1 maps every byte to a char, so only I/O failures are errors.
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| AppError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(decode_text(bytes))
}

pub fn decode_text(bytes: Vec<u8>) -> String {
    let text = match String::from_utf8(bytes) {
        Ok(mut text) => {
            if text.starts_with('\u{feff}') {
                text.replace_range(..'\u{feff}'.len_utf8(), "");
            }
            text
        }
        Err(e) => {
            log::trace!("Not valid UTF-8 ({}), decoding as Latin-1", e.utf8_error());
            e.into_bytes().into_iter().map(char::from).collect()
        }
    };
    normalize_newlines(text)
}

fn normalize_newlines(text: String) -> String {
    if !text.contains('\r') {
        return text;
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Like [`read_text`], but substitutes [`READ_FAILURE_PLACEHOLDER`] on failure.
pub fn read_text_or_placeholder(path: &Path) -> String {
    match read_text(path) {
        Ok(text) => text,
        Err(e) => {
            log::warn!("{}", e);
            READ_FAILURE_PLACEHOLDER.to_string()
        }
    }
}
