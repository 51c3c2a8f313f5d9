//! Interval-driven sync workers.
//!
//! One long-lived tokio task per mapping, each with its own ticker. A
//! worker runs a tick to completion before awaiting the next fire, so a
//! mapping is never evaluated concurrently with itself, while distinct
//! mappings proceed in parallel and in complete isolation from each
//! other's failures.

use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio::time::{interval, MissedTickBehavior};

use crate::context::SyncContext;
use crate::engine::{SyncEngine, SyncOutcome};
use crate::error::SyncError;
use crmirror_types::SyncMapping;

/// Run sync workers for every mapping until `shutdown` flips to true.
///
/// Shutdown is only observed between ticks: an in-flight tick (including
/// its atomic file rename or its single indivisible upsert) always
/// completes before the worker exits, and this function returns only after
/// every worker has drained.
pub async fn run(ctx: Arc<SyncContext>, shutdown: watch::Receiver<bool>) {
    let mut workers = JoinSet::new();

    for mapping in ctx.mappings.clone() {
        let engine = SyncEngine::new(ctx.clone());
        let period = ctx.interval;
        let mut shutdown = shutdown.clone();

        workers.spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = ticker.tick() => run_tick(&engine, &mapping).await,
                    _ = shutdown.changed() => break,
                }
            }
            tracing::debug!("Worker for {} stopped", mapping.file_path.display());
        });
    }

    tracing::info!(
        "Watching {} file(s) with polling interval {:?}",
        ctx.mappings.len(),
        ctx.interval
    );

    while workers.join_next().await.is_some() {}
}

async fn run_tick(engine: &SyncEngine, mapping: &SyncMapping) {
    match engine.sync_mapping(mapping).await {
        Ok(SyncOutcome::Unchanged) => {
            tracing::debug!("No changes for {}", mapping.file_path.display());
        }
        // propagations and skips log inside the engine
        Ok(_) => {}
        Err(SyncError::Client(e)) if !e.is_transient() => {
            tracing::error!(
                "Permanent control-plane failure for {} (retrying every tick): {}",
                mapping.file_path.display(),
                e
            );
        }
        Err(e) => {
            tracing::warn!(
                "Sync failed for {} (will retry): {}",
                mapping.file_path.display(),
                e
            );
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::context::SyncPolicy;
    use crate::fileio;
    use crate::testutil::{Failure, MemoryResourceApi};
    use serde_json::json;
    use std::time::Duration;
    use tokio::time::{sleep, timeout};

    #[tokio::test]
    async fn test_workers_sync_and_shutdown_drains() {
        let dir = tempfile::tempdir().unwrap();
        let mapping = SyncMapping::new(dir.path().join("a.json"), "as", "a");
        fileio::write_json_atomic(&mapping.file_path, &json!({"v": 1})).unwrap();

        let api = Arc::new(MemoryResourceApi::new());
        let ctx = Arc::new(SyncContext::new(
            vec![mapping.clone()],
            api.clone(),
            SyncPolicy::default(),
            Duration::from_millis(10),
        ));

        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(run(ctx, rx));

        sleep(Duration::from_millis(60)).await;
        assert_eq!(api.get("as", "a"), Some(json!({"v": 1})));

        tx.send(true).unwrap();
        timeout(Duration::from_secs(1), handle).await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_failing_mapping_never_delays_its_sibling() {
        let dir = tempfile::tempdir().unwrap();
        let a = SyncMapping::new(dir.path().join("a.json"), "as", "a");
        let b = SyncMapping::new(dir.path().join("b.json"), "bs", "b");
        fileio::write_json_atomic(&a.file_path, &json!({"side": "a"})).unwrap();
        fileio::write_json_atomic(&b.file_path, &json!({"gen": 0})).unwrap();

        let api = Arc::new(MemoryResourceApi::new());
        api.fail_plural("as", Failure::Transient);

        let ctx = Arc::new(SyncContext::new(
            vec![a.clone(), b.clone()],
            api.clone(),
            SyncPolicy::default(),
            Duration::from_millis(10),
        ));

        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(run(ctx, rx));

        // b keeps propagating fresh edits while a fails on every tick
        for gen in 1..=3 {
            sleep(Duration::from_millis(40)).await;
            fileio::write_json_atomic(&b.file_path, &json!({"gen": gen})).unwrap();
        }
        sleep(Duration::from_millis(40)).await;

        tx.send(true).unwrap();
        timeout(Duration::from_secs(1), handle).await.unwrap().unwrap();

        assert_eq!(api.get("bs", "b"), Some(json!({"gen": 3})));
        assert_eq!(api.get("as", "a"), None);
        // a was retried throughout, not disabled
        assert!(api.fetch_calls() > 4);
    }
}
