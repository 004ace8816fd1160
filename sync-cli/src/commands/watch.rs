//! Sync every account periodically until interrupted.

use anyhow::{Context, Result};

use inbox_sync_client::{
    spawn_scheduler, InstanceRegistry, JsonFileStore, MockSource, SchedulerHandle, SyncStatus,
};

use super::{print_views, Host};

type Handle = SchedulerHandle<MockSource, JsonFileStore>;

/// Run the watch command.
pub async fn run(host: &Host) -> Result<()> {
    let registry = start(host)?;
    if registry.is_empty() {
        println!("No accounts configured.");
        return Ok(());
    }

    println!(
        "Watching {} account(s) every {} minutes. Press Ctrl-C to stop.",
        registry.len(),
        host.config.sync.interval_minutes
    );

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;

    println!();
    stop(&registry).await;
    Ok(())
}

/// Spawn one scheduler per account and a printer for its status updates.
fn start(host: &Host) -> Result<InstanceRegistry<Handle>> {
    let registry = InstanceRegistry::new();
    let schedule = host.config.sync.schedule();

    for account in &host.config.accounts {
        let instance = host.instance(account)?;

        let mut updates = instance.subscribe();
        let id = account.id.clone();
        tokio::spawn(async move {
            while updates.changed().await.is_ok() {
                let status = updates.borrow_and_update().clone();
                report(&id, &status);
            }
        });

        registry.insert(account.id.clone(), spawn_scheduler(instance, schedule.clone()));
    }

    Ok(registry)
}

/// Shut every scheduler down, waiting for running cycles.
async fn stop(registry: &InstanceRegistry<Handle>) {
    for (id, handle) in registry.drain() {
        handle.shutdown().await;
        println!("[{}] Stopped", id);
    }
}

fn report(id: &str, status: &SyncStatus) {
    match &status.last_error {
        Some(failure) => println!("[{}] Sync failed: {}", id, failure),
        None => print_views(id, &status.views),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::time::Duration;
    use tempfile::tempdir;

    #[tokio::test]
    async fn start_then_stop() {
        let dir = tempdir().unwrap();
        let host = Host {
            config: Config::demo(),
            cache_dir: dir.path().to_path_buf(),
            mock: true,
        };
        let cache = host.store(&host.config.accounts[0]).path().to_path_buf();

        let registry = start(&host).unwrap();
        assert_eq!(registry.ids(), vec!["demo"]);

        // refresh_on_start runs the first cycle right away
        for _ in 0..200 {
            if cache.exists() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(cache.exists());

        stop(&registry).await;
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn start_without_mock_fails() {
        let dir = tempdir().unwrap();
        let host = Host {
            config: Config::demo(),
            cache_dir: dir.path().to_path_buf(),
            mock: false,
        };

        assert!(start(&host).is_err());
    }
}
