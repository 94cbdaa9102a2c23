//! Deterministic archive filenames.
//!
//! A file's presence is the only record that work was done, so every name here
//! must be a pure function of the post and asset identity.

use crate::api::types::PostSummary;
use crate::error::{Error, Result};
use crate::post::AssetDescriptor;

/// Listing snapshot filename.
pub const LISTING_FILENAME: &str = "list.json";

/// Suffix of in-progress writes.
pub const PARTIAL_SUFFIX: &str = ".part";

/// Byte budget for the title part of a text filename. Leaves room for the id,
/// date, extension and `.part` suffix within the usual 255-byte name limit.
const MAX_TITLE_BYTES: usize = 160;

/// Reject identifiers that could escape the archive directory.
pub fn validate_component(name: &str) -> Result<&str> {
    if name.is_empty() {
        return Err(Error::InvalidFilename("Empty identifier".to_string()));
    }

    if name.contains("..") {
        return Err(Error::InvalidFilename(format!(
            "Path traversal detected: '{}'",
            name
        )));
    }

    if name.contains('/') || name.contains('\\') {
        return Err(Error::InvalidFilename(format!(
            "Path separators not allowed in filename: '{}'",
            name
        )));
    }

    if name.contains('\0') {
        return Err(Error::InvalidFilename(format!(
            "Null bytes not allowed in filename: '{}'",
            name
        )));
    }

    Ok(name)
}

/// Strip the characters `? \ / * |` from a post title and cap its length
/// at [`MAX_TITLE_BYTES`], cutting on a character boundary.
pub fn sanitize_title(title: &str) -> String {
    let mut out = String::new();
    for c in title
        .chars()
        .filter(|c| !matches!(c, '?' | '\\' | '/' | '*' | '|' | '\0'))
    {
        if out.len() + c.len_utf8() > MAX_TITLE_BYTES {
            break;
        }
        out.push(c);
    }
    out
}

/// `<postId>_<date>.json`
pub fn metadata_filename(summary: &PostSummary) -> Result<String> {
    Ok(format!(
        "{}_{}.json",
        validate_component(&summary.id)?,
        summary.date_key()
    ))
}

/// `<postId>_<date>_<title>.txt`
pub fn text_filename(summary: &PostSummary) -> Result<String> {
    Ok(format!(
        "{}_{}_{}.txt",
        validate_component(&summary.id)?,
        summary.date_key(),
        sanitize_title(&summary.title)
    ))
}

/// `<postId>_<assetId>.<ext>`, or `<postId>_<assetId>` without an extension.
pub fn asset_filename(asset: &AssetDescriptor) -> Result<String> {
    let stem = format!(
        "{}_{}",
        validate_component(&asset.post_id)?,
        validate_component(&asset.asset_id)?
    );

    if asset.extension.is_empty() {
        Ok(stem)
    } else {
        Ok(format!("{}.{}", stem, validate_component(&asset.extension)?))
    }
}
