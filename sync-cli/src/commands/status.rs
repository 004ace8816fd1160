//! Show cached views without contacting the source.

use anyhow::{Context, Result};

use inbox_sync_client::CacheStore;
use inbox_sync_core::build_views;

use super::{print_content, print_views, Host};

/// Run the status command.
pub async fn run(host: &Host) -> Result<()> {
    println!("=== inbox-sync status ===");
    println!();
    println!("Cache directory: {}", host.cache_dir.display());
    println!();

    if host.config.accounts.is_empty() {
        println!("No accounts configured.");
        return Ok(());
    }

    for account in &host.config.accounts {
        let store = host.store(account);
        let snapshot = store
            .load()
            .with_context(|| format!("Failed to read cache of account '{}'", account.id))?;

        if snapshot.is_empty() {
            println!("[{}] No cached messages. Run 'inbox-sync sync' first.", account.id);
            println!();
            continue;
        }

        let views = build_views(&snapshot.messages, None);
        print_views(&account.id, &views);
        println!("  Cached:        {} messages", snapshot.len());
        if let Some(latest) = &views.latest_message {
            print_content(latest);
        }
        println!();
    }

    Ok(())
}
