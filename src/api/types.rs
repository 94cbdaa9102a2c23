//! API response type definitions.
//!
//! Payloads are persisted verbatim as `serde_json::Value`; these types are the
//! typed view the normalizer works on.

use chrono::DateTime;
use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};

/// Envelope around every API payload.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub body: Option<T>,
}

/// Creator listing payload.
#[derive(Debug, Deserialize)]
pub struct PostListing {
    #[serde(default)]
    pub items: Vec<Value>,
}

/// One entry of a creator's post listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(alias = "updatedDate")]
    pub updated_datetime: String,
    #[serde(default)]
    pub fee_required: u64,
}

impl PostSummary {
    /// Calendar date of the last update, `YYYY-MM-DD`, in the offset the API reports.
    pub fn date_key(&self) -> String {
        match DateTime::parse_from_rfc3339(&self.updated_datetime) {
            Ok(dt) => dt.format("%Y-%m-%d").to_string(),
            Err(_) => self.updated_datetime.chars().take(10).collect(),
        }
    }
}

/// Post format as reported by the `type` field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostKind {
    Text,
    Image,
    Video,
    File,
    Article,
    #[serde(other)]
    #[default]
    Other,
}

/// Full payload for one post.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetail {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: PostKind,
    #[serde(default)]
    pub cover_image_url: Option<String>,
    /// `None` when the viewer is not entitled to the post.
    #[serde(default)]
    pub body: Option<PostBody>,
}

impl PostDetail {
    /// Parse a stored or fetched payload.
    pub fn from_value(post_id: &str, value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| Error::Payload {
            post_id: post_id.to_string(),
            message: e.to_string(),
        })
    }
}

/// Read a string leniently: `null`, missing or non-string values become empty.
///
/// Numbers keep their textual form, since some ids arrive unquoted.
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

/// Where the text of a post lives.
#[derive(Debug, Clone)]
pub enum BodyContent {
    /// Legacy flat body with a plain `text` field.
    Text(String),
    /// Block-structured body.
    Blocks {
        blocks: Vec<Block>,
        embed_map: Option<AssetTable<Embed>>,
    },
    /// Neither text nor blocks.
    Empty,
}

/// Post body: a text source plus attachment tables.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "RawBody")]
pub struct PostBody {
    pub content: BodyContent,
    pub video: Option<VideoRef>,
    /// Legacy flat image list.
    pub images: Option<AssetTable<ImageAsset>>,
    /// Legacy flat file list.
    pub files: Option<AssetTable<FileAsset>>,
    pub image_map: Option<AssetTable<ImageAsset>>,
    pub file_map: Option<AssetTable<FileAsset>>,
}

impl PostBody {
    /// Image attachments, preferring the legacy list over the block side-table.
    pub fn image_assets(&self) -> Option<&AssetTable<ImageAsset>> {
        self.images.as_ref().or(self.image_map.as_ref())
    }

    /// File attachments, preferring the legacy list over the block side-table.
    pub fn file_assets(&self) -> Option<&AssetTable<FileAsset>> {
        self.files.as_ref().or(self.file_map.as_ref())
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBody {
    #[serde(default, deserialize_with = "lenient_string")]
    text: String,
    #[serde(default)]
    blocks: Option<Value>,
    #[serde(default)]
    video: Option<Value>,
    #[serde(default)]
    images: Option<AssetTable<ImageAsset>>,
    #[serde(default)]
    files: Option<AssetTable<FileAsset>>,
    #[serde(default)]
    image_map: Option<AssetTable<ImageAsset>>,
    #[serde(default)]
    file_map: Option<AssetTable<FileAsset>>,
    #[serde(default)]
    embed_map: Option<AssetTable<Embed>>,
}

impl From<RawBody> for PostBody {
    fn from(raw: RawBody) -> Self {
        let content = if !raw.text.is_empty() {
            BodyContent::Text(raw.text)
        } else if let Some(Value::Array(blocks)) = raw.blocks {
            BodyContent::Blocks {
                blocks: blocks.into_iter().map(Block::from_value).collect(),
                embed_map: raw.embed_map,
            }
        } else {
            BodyContent::Empty
        };

        Self {
            content,
            video: raw
                .video
                .and_then(|video| serde_json::from_value(video).ok()),
            images: raw.images,
            files: raw.files,
            image_map: raw.image_map,
            file_map: raw.file_map,
        }
    }
}

/// One structured fragment of a block body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawBlock")]
pub enum Block {
    Paragraph(String),
    Header(String),
    Image { image_id: String },
    File { file_id: String },
    Embed { embed_id: String },
    /// A block type this archiver does not know how to render.
    Other(String),
}

impl Block {
    /// Read one block. Anything that is not an object becomes an `invalid` block.
    fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_else(|_| Block::Other("invalid".to_string()))
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBlock {
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    kind: String,
    #[serde(default, deserialize_with = "lenient_string")]
    text: String,
    #[serde(default, deserialize_with = "lenient_string")]
    image_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    file_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    embed_id: String,
}

impl From<RawBlock> for Block {
    fn from(raw: RawBlock) -> Self {
        match raw.kind.as_str() {
            "p" => Block::Paragraph(raw.text),
            "header" => Block::Header(raw.text),
            "image" => Block::Image {
                image_id: raw.image_id,
            },
            "file" => Block::File {
                file_id: raw.file_id,
            },
            "embed" => Block::Embed {
                embed_id: raw.embed_id,
            },
            _ => Block::Other(raw.kind),
        }
    }
}

/// Video attached to a video post.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRef {
    #[serde(default, deserialize_with = "lenient_string")]
    pub service_provider: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub video_id: String,
}

/// Image attachment.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAsset {
    pub id: String,
    pub extension: String,
    pub original_url: String,
}

/// File attachment.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAsset {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    pub name: String,
    pub extension: String,
    pub url: String,
}

/// Externally hosted content referenced by an embed block.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Embed {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub service_provider: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub content_id: String,
}

/// Attachment table keyed by id, in document order.
///
/// The API sends these as JSON objects, or as arrays (an empty table is `[]`).
/// Array entries are keyed by their position. Entries that do not have the
/// expected shape are left out and their keys kept in `skipped`.
#[derive(Debug, Clone)]
pub struct AssetTable<T> {
    entries: Vec<(String, T)>,
    skipped: Vec<String>,
}

impl<T> AssetTable<T> {
    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys of entries that could not be read.
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }
}

impl<T: DeserializeOwned> AssetTable<T> {
    fn from_json(value: Value) -> Self {
        let raw: Vec<(String, Value)> = match value {
            Value::Object(map) => map.into_iter().collect(),
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| (i.to_string(), item))
                .collect(),
            _ => Vec::new(),
        };

        let mut table = AssetTable {
            entries: Vec::with_capacity(raw.len()),
            skipped: Vec::new(),
        };
        for (key, item) in raw {
            match serde_json::from_value(item) {
                Ok(entry) => table.entries.push((key, entry)),
                Err(e) => {
                    tracing::debug!("Unreadable attachment entry {}: {}", key, e);
                    table.skipped.push(key);
                }
            }
        }
        table
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for AssetTable<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Value::deserialize(deserializer).map(AssetTable::from_json)
    }
}
