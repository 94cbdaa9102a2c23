//! Asset descriptors derived from post payloads.

use url::Url;

use crate::api::types::{FileAsset, ImageAsset, PostDetail};

/// Kind of downloadable asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Image,
    File,
    Cover,
}

/// A downloadable asset referenced by a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetDescriptor {
    /// Owning post.
    pub post_id: String,

    /// Image id, file name, or `cover`.
    pub asset_id: String,

    /// Download URL.
    pub url: String,

    /// File extension (without dot). Empty if unknown.
    pub extension: String,

    pub kind: AssetKind,
}

impl AssetDescriptor {
    pub fn image(post_id: &str, image: &ImageAsset) -> Self {
        Self {
            post_id: post_id.to_string(),
            asset_id: image.id.clone(),
            url: image.original_url.clone(),
            extension: image.extension.clone(),
            kind: AssetKind::Image,
        }
    }

    pub fn file(post_id: &str, file: &FileAsset) -> Self {
        Self {
            post_id: post_id.to_string(),
            asset_id: file.name.clone(),
            url: file.url.clone(),
            extension: file.extension.clone(),
            kind: AssetKind::File,
        }
    }

    /// Whether the download carries the session cookie.
    ///
    /// Covers are public and fetched anonymously.
    pub fn requires_session(&self) -> bool {
        self.kind != AssetKind::Cover
    }
}

/// Cover image of a post, if it has one. Available even for paywalled posts.
pub fn cover_asset(post: &PostDetail) -> Option<AssetDescriptor> {
    let url = post.cover_image_url.as_deref().filter(|u| !u.is_empty())?;

    Some(AssetDescriptor {
        post_id: post.id.clone(),
        asset_id: "cover".to_string(),
        url: url.to_string(),
        extension: extension_from_url(url).unwrap_or_default(),
        kind: AssetKind::Cover,
    })
}

/// Extension of the last path segment of a URL, ignoring query and fragment.
pub fn extension_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let filename = parsed.path_segments()?.last()?;
    let (stem, ext) = filename.rsplit_once('.')?;

    if stem.is_empty() || ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }

    Some(ext.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extension_from_url() {
        assert_eq!(
            extension_from_url("https://downloads.fanbox.cc/images/post/1/cover/abc.jpeg"),
            Some("jpeg".to_string())
        );
        assert_eq!(
            extension_from_url("https://example.com/a/b.png?x=y.z#frag"),
            Some("png".to_string())
        );
        assert_eq!(extension_from_url("https://example.com/a/noext"), None);
        assert_eq!(extension_from_url("https://example.com/a/.hidden"), None);
        assert_eq!(extension_from_url("not a url"), None);
    }

    #[test]
    fn test_cover_asset_without_body() {
        let post = PostDetail::from_value(
            "7",
            json!({
                "id": "7",
                "type": "image",
                "coverImageUrl": "https://downloads.fanbox.cc/images/post/7/cover/x.png",
                "body": null
            }),
        )
        .unwrap();

        let cover = cover_asset(&post).unwrap();
        assert_eq!(cover.asset_id, "cover");
        assert_eq!(cover.extension, "png");
        assert!(!cover.requires_session());
    }

    #[test]
    fn test_no_cover() {
        let post = PostDetail::from_value(
            "7",
            json!({ "id": "7", "type": "text", "coverImageUrl": null, "body": null }),
        )
        .unwrap();
        assert!(cover_asset(&post).is_none());
    }
}
