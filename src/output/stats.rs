//! Statistics reporting.

use console::style;

use crate::download::SyncState;

/// Print statistics for a finished sync run.
pub fn print_sync_stats(state: &SyncState) {
    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!(
        "{}",
        style(format!("Statistics for {}:", state.creator_id)).bold()
    );
    if let Some(path) = &state.base_path {
        println!("  Archive:   {}", path.display());
    }
    println!("  Posts:     {} listed", state.posts_listed);
    println!(
        "             {} fetched, {} cached",
        state.details_requested, state.posts_cached
    );
    if state.posts_paywalled > 0 {
        println!(
            "  Paywalled: {}",
            style(state.posts_paywalled).yellow()
        );
    }
    if state.posts_missing > 0 {
        println!("  Missing:   {}", style(state.posts_missing).red());
    }
    println!("  Texts:     {}", state.texts_written);
    println!("  Assets:    {}", state.assets_downloaded);
    println!("  Covers:    {}", state.covers_downloaded);
    println!("  Skipped:   {} (already archived)", state.assets_skipped);
    if state.asset_failures > 0 {
        println!(
            "  Retries:   {}",
            style(state.asset_failures).yellow()
        );
    }
    if state.diagnostics > 0 {
        println!(
            "  Warnings:  {} (unrendered content)",
            style(state.diagnostics).yellow()
        );
    }
    println!("{}", style("═".repeat(50)).dim());
}
