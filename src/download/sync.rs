//! Incremental creator sync.
//!
//! One pass over a creator's listing. Posts are handled strictly in listing
//! order, one at a time. Files already present in the archive are never
//! fetched again, so an interrupted run simply resumes on the next start.

use std::path::Path;

use indicatif::ProgressBar;
use serde_json::Value;
use tokio::time::sleep;

use crate::api::types::{PostDetail, PostSummary};
use crate::api::{FanboxApi, Session, SessionToken};
use crate::config::Config;
use crate::download::fetcher::AssetFetcher;
use crate::download::state::SyncState;
use crate::error::{Error, Result};
use crate::fs::ArchiveStore;
use crate::output::create_item_bar;
use crate::post::{collect_assets, cover_asset, render_text, AssetDescriptor, AssetKind};

/// Archive every post of the creator in `state`.
///
/// A listing that cannot be fetched ends the run without error.
pub async fn sync_creator<S: Session>(
    api: &FanboxApi<S>,
    fetcher: &AssetFetcher,
    config: &Config,
    state: &mut SyncState,
) -> Result<()> {
    let store = ArchiveStore::for_creator(config, &state.creator_id)?;
    state.base_path = Some(store.root().to_path_buf());

    tracing::info!("Fetching post listing for {}...", state.creator_id);

    let Some(items) = api
        .list_creator_posts(&state.creator_id, config.options.list_limit)
        .await
    else {
        tracing::warn!(
            "Could not fetch the post listing for {}; is the session still valid?",
            state.creator_id
        );
        return Ok(());
    };

    store.ensure_root().await?;
    store.write_json(&store.listing_path(), &items).await?;
    state.posts_listed = items.len() as u64;

    tracing::info!("Found {} posts", items.len());

    let progress = if config.options.show_progress {
        create_item_bar(items.len() as u64, "Posts")
    } else {
        ProgressBar::hidden()
    };

    for item in items {
        match serde_json::from_value::<PostSummary>(item) {
            Ok(summary) => {
                progress.set_message(summary.id.clone());
                sync_post(api, fetcher, config, &store, &summary, state).await?
            }
            Err(e) => tracing::warn!("Skipping unreadable listing entry: {}", e),
        }
        progress.inc(1);
    }

    progress.finish_and_clear();
    state.asset_failures = fetcher.failure_count();

    tracing::info!(
        "Sync complete: {} texts, {} assets, {} covers written",
        state.texts_written,
        state.assets_downloaded,
        state.covers_downloaded
    );

    Ok(())
}

/// Bring one post's archive entry up to date.
async fn sync_post<S: Session>(
    api: &FanboxApi<S>,
    fetcher: &AssetFetcher,
    config: &Config,
    store: &ArchiveStore,
    summary: &PostSummary,
    state: &mut SyncState,
) -> Result<()> {
    let (metadata_path, text_path) = match (store.metadata_path(summary), store.text_path(summary)) {
        (Ok(metadata), Ok(text)) => (metadata, text),
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!("Skipping post: {}", e);
            state.posts_missing += 1;
            return Ok(());
        }
    };

    let Some(post) = resolve_detail(api, config, store, summary, &metadata_path, state).await?
    else {
        tracing::warn!("{}: NO DATA", summary.id);
        state.posts_missing += 1;
        return Ok(());
    };

    match &post.body {
        Some(body) => {
            if !store.exists(&text_path).await? {
                let rendered = render_text(post.kind, body);
                for diagnostic in &rendered.diagnostics {
                    tracing::warn!("{}: {}", summary.id, diagnostic);
                }
                state.diagnostics += rendered.diagnostics.len() as u64;

                store.write_text(&text_path, &rendered.text).await?;
                state.texts_written += 1;
            }

            for asset in collect_assets(&post.id, body) {
                resolve_asset(fetcher, config, store, &asset, api.token(), state).await?;
            }
        }
        None => {
            if store.remove(&metadata_path).await? {
                state.stale_metadata_removed += 1;
            }
            state.posts_paywalled += 1;
            tracing::warn!(
                "{}: NO DATA BODY: {}_{}",
                summary.id,
                summary.fee_required,
                summary.title
            );
        }
    }

    if let Some(cover) = cover_asset(&post) {
        resolve_asset(fetcher, config, store, &cover, api.token(), state).await?;
    }

    Ok(())
}

/// Cached post detail, or a fresh one from the API.
///
/// Only details that parse and have a body are persisted, so an existing
/// metadata file always holds a usable post. The cooldown follows every remote
/// fetch and never a cache hit.
async fn resolve_detail<S: Session>(
    api: &FanboxApi<S>,
    config: &Config,
    store: &ArchiveStore,
    summary: &PostSummary,
    metadata_path: &Path,
    state: &mut SyncState,
) -> Result<Option<PostDetail>> {
    if store.exists(metadata_path).await? {
        match store.read_json(metadata_path).await {
            Ok(Value::Null) => tracing::warn!("{}: discarding empty cached metadata", summary.id),
            Ok(value) => match PostDetail::from_value(&summary.id, value) {
                Ok(post) => {
                    state.posts_cached += 1;
                    return Ok(Some(post));
                }
                Err(e) => tracing::warn!("{}: discarding cached metadata: {}", summary.id, e),
            },
            Err(Error::Json(e)) => {
                tracing::warn!("{}: discarding unreadable cached metadata: {}", summary.id, e)
            }
            Err(e) => return Err(e),
        }
        store.remove(metadata_path).await?;
        state.stale_metadata_removed += 1;
    }

    state.details_requested += 1;
    let fetched = api.post_detail(&summary.id).await;

    let post = match fetched {
        Some(value) => match PostDetail::from_value(&summary.id, value.clone()) {
            Ok(post) => {
                if post.body.is_some() {
                    store.write_json(metadata_path, &value).await?;
                }
                Some(post)
            }
            Err(e) => {
                tracing::warn!("{}", e);
                None
            }
        },
        None => None,
    };

    let cooldown = config.cooldown();
    if !cooldown.is_zero() {
        sleep(cooldown).await;
    }

    Ok(post)
}

/// Download an asset unless it is already archived.
async fn resolve_asset(
    fetcher: &AssetFetcher,
    config: &Config,
    store: &ArchiveStore,
    asset: &AssetDescriptor,
    token: &SessionToken,
    state: &mut SyncState,
) -> Result<()> {
    let path = match store.asset_path(asset) {
        Ok(path) => path,
        Err(e) => {
            tracing::warn!("{}: skipping asset: {}", asset.post_id, e);
            return Ok(());
        }
    };

    if store.exists(&path).await? {
        state.assets_skipped += 1;
        if config.options.show_skipped {
            tracing::info!("Skipping existing file: {}", path.display());
        }
        return Ok(());
    }

    let token = asset.requires_session().then_some(token);
    let data = match fetcher.fetch(&asset.url, token).await {
        Ok(data) => data,
        Err(e @ Error::RetriesExhausted { .. }) => {
            tracing::warn!("{}: {}", asset.post_id, e);
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    store.write_bytes(&path, &data).await?;

    match asset.kind {
        AssetKind::Cover => state.covers_downloaded += 1,
        AssetKind::Image | AssetKind::File => state.assets_downloaded += 1,
    }

    tracing::debug!("Downloaded: {}", path.display());

    Ok(())
}
