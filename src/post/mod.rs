//! Post module: asset descriptors and text normalization.

pub mod asset;
pub mod normalize;

pub use asset::{cover_asset, extension_from_url, AssetDescriptor, AssetKind};
pub use normalize::{collect_assets, normalize, render_text, Diagnostic, Normalized, RenderedText};
