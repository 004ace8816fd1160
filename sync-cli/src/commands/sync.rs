//! Run one sync cycle per account.

use anyhow::{bail, Result};

use inbox_sync_client::TriggerOutcome;

use super::{print_content, print_views, Host};

/// Run the sync command.
pub async fn run(host: &Host) -> Result<()> {
    if host.config.accounts.is_empty() {
        println!("No accounts configured.");
        return Ok(());
    }

    let mut failed = 0;
    for account in &host.config.accounts {
        let instance = host.instance(account)?;

        match instance.trigger().await {
            TriggerOutcome::Completed(report) => {
                print_views(&account.id, &report.views);
                println!(
                    "  Fetched:       {} ({} new, {} cached)",
                    report.fetched,
                    report.added,
                    report.snapshot.len()
                );
                if let Some(latest) = &report.views.latest_message {
                    print_content(latest);
                }
            }
            TriggerOutcome::Failed(failure) => {
                println!("[{}] Sync failed: {}", account.id, failure);
                failed += 1;
            }
            TriggerOutcome::Coalesced | TriggerOutcome::Closed => {}
        }

        instance.shutdown().await;
    }

    if failed > 0 {
        bail!(
            "{} of {} accounts failed to sync",
            failed,
            host.config.accounts.len()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use inbox_sync_client::CacheStore;
    use tempfile::tempdir;

    fn host(dir: &std::path::Path, mock: bool) -> Host {
        Host {
            config: Config::demo(),
            cache_dir: dir.to_path_buf(),
            mock,
        }
    }

    #[tokio::test]
    async fn sync_fills_cache() {
        let dir = tempdir().unwrap();
        let host = host(dir.path(), true);

        run(&host).await.unwrap();

        let snapshot = host.store(&host.config.accounts[0]).load().unwrap();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot.messages[0].subject, "Parents evening");
        assert!(snapshot.messages[0].content_markdown.is_some());
    }

    #[tokio::test]
    async fn repeated_sync_does_not_duplicate() {
        let dir = tempdir().unwrap();
        let host = host(dir.path(), true);

        run(&host).await.unwrap();
        run(&host).await.unwrap();

        let snapshot = host.store(&host.config.accounts[0]).load().unwrap();
        assert_eq!(snapshot.len(), 3);
    }

    #[tokio::test]
    async fn sync_without_mock_fails() {
        let dir = tempdir().unwrap();
        assert!(run(&host(dir.path(), false)).await.is_err());
    }

    #[tokio::test]
    async fn sync_without_accounts_is_ok() {
        let dir = tempdir().unwrap();
        let host = Host {
            config: Config::default(),
            cache_dir: dir.path().to_path_buf(),
            mock: true,
        };
        assert!(run(&host).await.is_ok());
    }
}
