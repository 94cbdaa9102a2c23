//! Post normalization: canonical text plus asset list.
//!
//! Everything here is pure. Unrecognized providers, embeds and block types are
//! reported as [`Diagnostic`]s and never abort rendering.

use std::fmt;

use crate::api::types::{AssetTable, Block, BodyContent, Embed, PostBody, PostDetail, PostKind};
use crate::post::asset::AssetDescriptor;

/// Something the normalizer could not render faithfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    UnknownVideoProvider(String),
    UnknownEmbed(String),
    UnknownEmbedProvider(String),
    UnknownBlockType(String),
    /// Attachment table entry that did not have the expected shape.
    UnreadableEntry(String),
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnknownVideoProvider(p) => write!(f, "UNKNOWN VIDEO PROVIDER: {}", p),
            Diagnostic::UnknownEmbed(id) => write!(f, "UNKNOWN EMBED: {}", id),
            Diagnostic::UnknownEmbedProvider(p) => write!(f, "UNKNOWN EMBED PROVIDER: {}", p),
            Diagnostic::UnknownBlockType(t) => write!(f, "UNKNOWN BLOCK TYPE: {}", t),
            Diagnostic::UnreadableEntry(key) => write!(f, "UNREADABLE ENTRY: {}", key),
        }
    }
}

/// Rendered text of a post.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedText {
    pub text: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Full normalization result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub text: String,
    pub assets: Vec<AssetDescriptor>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Normalize a post. Returns `None` for paywalled posts (no body).
pub fn normalize(post: &PostDetail) -> Option<Normalized> {
    let body = post.body.as_ref()?;
    let rendered = render_text(post.kind, body);

    Some(Normalized {
        text: rendered.text,
        assets: collect_assets(&post.id, body),
        diagnostics: rendered.diagnostics,
    })
}

/// Render the canonical text of a post body.
pub fn render_text(kind: PostKind, body: &PostBody) -> RenderedText {
    let mut out = RenderedText::default();

    if kind == PostKind::Video {
        if let Some(video) = &body.video {
            match video_url(&video.service_provider, &video.video_id) {
                Some(url) => {
                    out.text.push_str(&format!("[{}]\n", url));
                }
                None => out
                    .diagnostics
                    .push(Diagnostic::UnknownVideoProvider(video.service_provider.clone())),
            }
        }
    }

    if kind == PostKind::Image {
        if let Some(images) = &body.images {
            for image in images.values() {
                out.text.push_str(&format!("[image][{}]\n", image.id));
            }
        }
    }

    match &body.content {
        BodyContent::Text(text) => out.text.push_str(text),
        BodyContent::Blocks { blocks, embed_map } => {
            for block in blocks {
                if !out.text.is_empty() {
                    out.text.push('\n');
                }
                render_block(block, embed_map.as_ref(), &mut out);
            }
        }
        BodyContent::Empty => {}
    }

    report_skipped(body, &mut out);

    out
}

fn report_skipped(body: &PostBody, out: &mut RenderedText) {
    let images = [&body.images, &body.image_map]
        .into_iter()
        .flatten()
        .flat_map(|table| table.skipped());
    let files = [&body.files, &body.file_map]
        .into_iter()
        .flatten()
        .flat_map(|table| table.skipped());
    let embeds: &[String] = match &body.content {
        BodyContent::Blocks {
            embed_map: Some(table),
            ..
        } => table.skipped(),
        _ => &[],
    };

    out.diagnostics.extend(
        images
            .chain(files)
            .chain(embeds)
            .map(|key| Diagnostic::UnreadableEntry(key.clone())),
    );
}

fn render_block(block: &Block, embed_map: Option<&AssetTable<Embed>>, out: &mut RenderedText) {
    match block {
        Block::Paragraph(text) | Block::Header(text) => out.text.push_str(text),
        Block::Image { image_id } => out.text.push_str(&format!("[image][{}]", image_id)),
        Block::File { file_id } => out.text.push_str(&format!("[file][{}]", file_id)),
        Block::Embed { embed_id } => {
            // Without a side-table there is nothing to resolve against
            let Some(embed_map) = embed_map else {
                return;
            };
            let Some(embed) = embed_map.get(embed_id) else {
                out.diagnostics.push(Diagnostic::UnknownEmbed(embed_id.clone()));
                return;
            };
            match embed_url(&embed.service_provider, &embed.content_id) {
                Some(url) => out.text.push_str(&format!("[embed][{}]", url)),
                None => out
                    .diagnostics
                    .push(Diagnostic::UnknownEmbedProvider(embed.service_provider.clone())),
            }
        }
        Block::Other(kind) => {
            out.text.push_str(&format!("[{}]", kind));
            out.diagnostics.push(Diagnostic::UnknownBlockType(kind.clone()));
        }
    }
}

/// Collect image and file assets of a post body, in table order.
pub fn collect_assets(post_id: &str, body: &PostBody) -> Vec<AssetDescriptor> {
    let images = body
        .image_assets()
        .into_iter()
        .flat_map(|table| table.values())
        .map(|image| AssetDescriptor::image(post_id, image));

    let files = body
        .file_assets()
        .into_iter()
        .flat_map(|table| table.values())
        .map(|file| AssetDescriptor::file(post_id, file));

    images.chain(files).collect()
}

/// Canonical watch URL of an attached video.
fn video_url(provider: &str, video_id: &str) -> Option<String> {
    match provider {
        "youtube" => Some(format!("https://www.youtube.com/watch?v={}", video_id)),
        _ => None,
    }
}

/// Canonical URL of embedded content.
fn embed_url(provider: &str, content_id: &str) -> Option<String> {
    match provider {
        "youtube" => Some(format!("https://www.youtube.com/watch?v={}", content_id)),
        "twitter" => Some(format!("https://twitter.com/user/status/{}", content_id)),
        "fanbox" => Some(format!("https://www.pixiv.net/fanbox/{}", content_id)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::asset::AssetKind;
    use serde_json::{json, Value};

    fn post(value: Value) -> PostDetail {
        PostDetail::from_value("p1", value).unwrap()
    }

    #[test]
    fn test_plain_text_is_verbatim() {
        let text = "line one\nline two\n\n  indented [not a tag]";
        let normalized = normalize(&post(json!({
            "id": "p1",
            "type": "text",
            "body": { "text": text }
        })))
        .unwrap();

        assert_eq!(normalized.text, text);
        assert!(normalized.assets.is_empty());
        assert!(normalized.diagnostics.is_empty());
    }

    #[test]
    fn test_paywalled_post_is_skipped() {
        assert!(normalize(&post(json!({ "id": "p1", "type": "text", "body": null }))).is_none());
    }

    #[test]
    fn test_video_post() {
        let normalized = normalize(&post(json!({
            "id": "p1",
            "type": "video",
            "body": {
                "text": "watch this",
                "video": { "serviceProvider": "youtube", "videoId": "xyz" }
            }
        })))
        .unwrap();

        assert_eq!(
            normalized.text,
            "[https://www.youtube.com/watch?v=xyz]\nwatch this"
        );
    }

    #[test]
    fn test_unknown_video_provider() {
        let normalized = normalize(&post(json!({
            "id": "p1",
            "type": "video",
            "body": {
                "text": "watch this",
                "video": { "serviceProvider": "soundcloud", "videoId": "xyz" }
            }
        })))
        .unwrap();

        assert_eq!(normalized.text, "watch this");
        assert_eq!(
            normalized.diagnostics,
            vec![Diagnostic::UnknownVideoProvider("soundcloud".into())]
        );
    }

    #[test]
    fn test_only_youtube_videos_are_linked() {
        let normalized = normalize(&post(json!({
            "id": "p1",
            "type": "video",
            "body": { "video": { "serviceProvider": "vimeo", "videoId": "1" } }
        })))
        .unwrap();

        assert_eq!(normalized.text, "");
        assert_eq!(
            normalized.diagnostics,
            vec![Diagnostic::UnknownVideoProvider("vimeo".into())]
        );
    }

    #[test]
    fn test_unreadable_entries_are_reported_and_rest_kept() {
        let normalized = normalize(&post(json!({
            "id": "p1",
            "type": "article",
            "body": {
                "blocks": [
                    { "type": "p", "text": null },
                    { "type": "p", "text": "kept" },
                    { "type": "image", "imageId": "img1" }
                ],
                "imageMap": {
                    "img1": { "id": "img1", "extension": "png", "originalUrl": "https://x/img1.png" },
                    "img2": { "id": "img2", "extension": "png" }
                }
            }
        })))
        .unwrap();

        assert_eq!(normalized.text, "kept\n[image][img1]");
        let ids: Vec<_> = normalized.assets.iter().map(|a| a.asset_id.as_str()).collect();
        assert_eq!(ids, ["img1"]);
        assert_eq!(
            normalized.diagnostics,
            vec![Diagnostic::UnreadableEntry("img2".into())]
        );
    }

    #[test]
    fn test_flat_image_post() {
        let normalized = normalize(&post(json!({
            "id": "p1",
            "type": "image",
            "body": {
                "text": "caption",
                "images": [
                    { "id": "i1", "extension": "jpeg", "originalUrl": "https://x/i1.jpeg" },
                    { "id": "i2", "extension": "png", "originalUrl": "https://x/i2.png" }
                ]
            }
        })))
        .unwrap();

        assert_eq!(normalized.text, "[image][i1]\n[image][i2]\ncaption");
        assert_eq!(normalized.assets.len(), 2);
        assert_eq!(normalized.assets[1].asset_id, "i2");
        assert_eq!(normalized.assets[1].extension, "png");
        assert_eq!(normalized.assets[1].kind, AssetKind::Image);
    }

    #[test]
    fn test_flat_file_post() {
        let normalized = normalize(&post(json!({
            "id": "p1",
            "type": "file",
            "body": {
                "text": "download",
                "files": [
                    { "id": "f1", "name": "archive", "extension": "zip", "url": "https://x/f1.zip" }
                ]
            }
        })))
        .unwrap();

        assert_eq!(normalized.text, "download");
        assert_eq!(normalized.assets.len(), 1);
        assert_eq!(normalized.assets[0].asset_id, "archive");
        assert_eq!(normalized.assets[0].kind, AssetKind::File);
        assert!(normalized.assets[0].requires_session());
    }

    #[test]
    fn test_article_blocks() {
        let normalized = normalize(&post(json!({
            "id": "p1",
            "type": "article",
            "body": {
                "blocks": [
                    { "type": "header", "text": "Title" },
                    { "type": "p", "text": "Intro" },
                    { "type": "image", "imageId": "img1" },
                    { "type": "file", "fileId": "f1" },
                    { "type": "embed", "embedId": "e1" },
                    { "type": "embed", "embedId": "e2" },
                    { "type": "embed", "embedId": "e3" },
                    { "type": "p", "text": "" },
                    { "type": "p", "text": "Outro" }
                ],
                "imageMap": {
                    "img1": { "id": "img1", "extension": "png", "originalUrl": "https://x/img1.png" }
                },
                "fileMap": {
                    "f1": { "id": "f1", "name": "notes", "extension": "pdf", "url": "https://x/f1.pdf" }
                },
                "embedMap": {
                    "e1": { "id": "e1", "serviceProvider": "twitter", "contentId": "42" },
                    "e2": { "id": "e2", "serviceProvider": "fanbox", "contentId": "creator/posts/9" },
                    "e3": { "id": "e3", "serviceProvider": "youtube", "contentId": "abc" }
                }
            }
        })))
        .unwrap();

        assert_eq!(
            normalized.text,
            "Title\nIntro\n[image][img1]\n[file][f1]\n\
             [embed][https://twitter.com/user/status/42]\n\
             [embed][https://www.pixiv.net/fanbox/creator/posts/9]\n\
             [embed][https://www.youtube.com/watch?v=abc]\n\nOutro"
        );
        let ids: Vec<_> = normalized.assets.iter().map(|a| a.asset_id.as_str()).collect();
        assert_eq!(ids, ["img1", "notes"]);
        assert!(normalized.diagnostics.is_empty());
    }

    #[test]
    fn test_unknown_block_type_degrades() {
        let normalized = normalize(&post(json!({
            "id": "p1",
            "type": "article",
            "body": {
                "blocks": [
                    { "type": "p", "text": "before" },
                    { "type": "url_embed", "urlEmbedId": "u1" },
                    { "type": "p", "text": "after" }
                ]
            }
        })))
        .unwrap();

        assert_eq!(normalized.text, "before\n[url_embed]\nafter");
        assert_eq!(
            normalized.diagnostics,
            vec![Diagnostic::UnknownBlockType("url_embed".into())]
        );
    }

    #[test]
    fn test_unresolvable_embeds() {
        let normalized = normalize(&post(json!({
            "id": "p1",
            "type": "article",
            "body": {
                "blocks": [
                    { "type": "p", "text": "a" },
                    { "type": "embed", "embedId": "missing" },
                    { "type": "embed", "embedId": "e1" },
                    { "type": "p", "text": "b" }
                ],
                "embedMap": {
                    "e1": { "id": "e1", "serviceProvider": "gist", "contentId": "1" }
                }
            }
        })))
        .unwrap();

        // Unrenderable blocks still take their line
        assert_eq!(normalized.text, "a\n\n\nb");
        assert_eq!(
            normalized.diagnostics,
            vec![
                Diagnostic::UnknownEmbed("missing".into()),
                Diagnostic::UnknownEmbedProvider("gist".into()),
            ]
        );
    }

    #[test]
    fn test_embed_without_map_is_silent() {
        let normalized = normalize(&post(json!({
            "id": "p1",
            "type": "article",
            "body": { "blocks": [{ "type": "embed", "embedId": "e1" }] }
        })))
        .unwrap();

        assert_eq!(normalized.text, "");
        assert!(normalized.diagnostics.is_empty());
    }

    #[test]
    fn test_image_post_with_blocks() {
        let normalized = normalize(&post(json!({
            "id": "p1",
            "type": "image",
            "body": {
                "blocks": [
                    { "type": "image", "imageId": "img1" },
                    { "type": "image", "imageId": "img2" },
                    { "type": "embed", "embedId": "e1" }
                ],
                "imageMap": {
                    "img1": { "id": "img1", "extension": "jpeg", "originalUrl": "https://x/img1.jpeg" },
                    "img2": { "id": "img2", "extension": "png", "originalUrl": "https://x/img2.png" }
                },
                "embedMap": {
                    "e1": { "id": "e1", "serviceProvider": "youtube", "contentId": "abc123" }
                }
            }
        })))
        .unwrap();

        assert_eq!(
            normalized.text,
            "[image][img1]\n[image][img2]\n[embed][https://www.youtube.com/watch?v=abc123]"
        );
        assert_eq!(normalized.assets.len(), 2);
    }

    #[test]
    fn test_diagnostic_messages() {
        assert_eq!(
            Diagnostic::UnknownBlockType("poll".into()).to_string(),
            "UNKNOWN BLOCK TYPE: poll"
        );
        assert_eq!(
            Diagnostic::UnknownEmbed("e9".into()).to_string(),
            "UNKNOWN EMBED: e9"
        );
    }
}
