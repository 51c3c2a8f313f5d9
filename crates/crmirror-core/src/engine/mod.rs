//! Compare-and-propagate sync engine.
//!
//! Per mapping, per tick: read both sides, fingerprint them canonically,
//! derive the propagation direction from the last-synchronized record, apply
//! at most one write, then set BOTH fingerprints to the post-propagation
//! value. That last step is the loop-avoidance guarantee: a write the engine
//! just performed is never re-read as an external change on the next tick,
//! so there is no write→observe→write oscillation.

use serde_json::Value;
use std::sync::Arc;

use crate::context::{ConflictPolicy, SyncContext};
use crate::error::SyncError;
use crate::fileio;
use crate::fingerprint::Fingerprint;
use crmirror_types::{ResourceInstance, SyncMapping};


/// What one tick did for one mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Fingerprints matched on both sides; no write happened.
    Unchanged,
    /// File content propagated to the resource.
    FileToResource {
        /// True when the resource did not exist and was created.
        created: bool,
    },
    /// Resource payload propagated to the file.
    ResourceToFile,
    /// Resource absent with local protection on and nothing written.
    SkippedAbsentResource,
    /// Resource payload was the empty object and was not mirrored.
    SkippedEmptyResource,
}

/// Runs the compare-and-propagate algorithm for single mappings.
pub struct SyncEngine {
    ctx: Arc<SyncContext>,
}

impl SyncEngine {
    pub fn new(ctx: Arc<SyncContext>) -> Self {
        Self { ctx }
    }

    /// One compare-and-propagate pass for one mapping.
    ///
    /// Fails without mutating any state; a pending change keeps its
    /// "changed" verdict until a propagation actually succeeds.
    pub async fn sync_mapping(&self, mapping: &SyncMapping) -> Result<SyncOutcome, SyncError> {
        let file_json = fileio::read_json(&mapping.file_path).map_err(|source| {
            SyncError::FileUnavailable { path: mapping.file_path.clone(), source }
        })?;

        // NotFound is an ordinary observation: the resource is absent.
        let instance = self.ctx.client.fetch(&mapping.plural, &mapping.name).await?;

        let fp_file = Fingerprint::of(&file_json);
        let fp_res = instance.as_ref().map(|i| Fingerprint::of(&i.data));

        let record = self.ctx.fingerprints.get(mapping);
        // An absent record reads as changed, which is what makes the first
        // tick after startup reconcile even already-equal content.
        let changed_locally = record.last_file.as_ref() != Some(&fp_file);
        let changed_remotely = record.last_resource != fp_res;

        match (changed_locally, changed_remotely) {
            (false, false) => Ok(SyncOutcome::Unchanged),
            (true, false) => {
                self.propagate_file(mapping, &file_json, &fp_file, instance.as_ref()).await
            }
            (false, true) => {
                self.propagate_resource(mapping, instance.as_ref(), &file_json, &fp_file).await
            }
            (true, true) => {
                let seen_before =
                    record.last_file.is_some() || record.last_resource.is_some();
                match self.ctx.policy.conflict {
                    ConflictPolicy::PreferFile => {
                        if seen_before {
                            tracing::info!(
                                "Conflict on {}: both sides changed, file wins",
                                mapping.file_path.display()
                            );
                        }
                        self.propagate_file(mapping, &file_json, &fp_file, instance.as_ref())
                            .await
                    }
                    ConflictPolicy::PreferResource => {
                        if seen_before {
                            tracing::info!(
                                "Conflict on {}: both sides changed, resource wins",
                                mapping.file_path.display()
                            );
                        }
                        self.propagate_resource(mapping, instance.as_ref(), &file_json, &fp_file)
                            .await
                    }
                }
            }
        }
    }

    /// File → resource. The control plane echoes the payload verbatim, so
    /// both sides land on the file's fingerprint.
    async fn propagate_file(
        &self,
        mapping: &SyncMapping,
        file_json: &Value,
        fp_file: &Fingerprint,
        instance: Option<&ResourceInstance>,
    ) -> Result<SyncOutcome, SyncError> {
        let resource_version = instance
            .map(|i| i.resource_version.as_str())
            .filter(|rv| !rv.is_empty());
        let created = resource_version.is_none();

        self.ctx
            .client
            .upsert(&mapping.plural, &mapping.name, file_json, resource_version)
            .await?;

        self.ctx.fingerprints.record_file_sync(mapping, fp_file.clone());
        self.ctx.fingerprints.record_resource_sync(mapping, fp_file.clone());

        tracing::info!(
            "[File → CR] Updated {}/{} from {}",
            mapping.plural,
            mapping.name,
            mapping.file_path.display()
        );
        Ok(SyncOutcome::FileToResource { created })
    }

    /// Resource → file, through a temp-file rename so no reader ever sees a
    /// partial document.
    async fn propagate_resource(
        &self,
        mapping: &SyncMapping,
        instance: Option<&ResourceInstance>,
        file_json: &Value,
        fp_file: &Fingerprint,
    ) -> Result<SyncOutcome, SyncError> {
        let Some(instance) = instance else {
            // The resource vanished after a successful sync. The file is
            // the authoritative copy, so recreate the resource from it
            // rather than inventing file content from nothing.
            if self.ctx.policy.protect_local_on_absent {
                tracing::info!(
                    "Resource {}/{} is absent; recreating from {}",
                    mapping.plural,
                    mapping.name,
                    mapping.file_path.display()
                );
                return self.propagate_file(mapping, file_json, fp_file, None).await;
            }
            tracing::warn!(
                "Resource {}/{} is absent; leaving {} untouched",
                mapping.plural,
                mapping.name,
                mapping.file_path.display()
            );
            return Ok(SyncOutcome::SkippedAbsentResource);
        };

        if instance.is_empty_payload() && self.ctx.policy.skip_empty_remote {
            tracing::debug!(
                "Resource {}/{} holds an empty payload; not mirroring to {}",
                mapping.plural,
                mapping.name,
                mapping.file_path.display()
            );
            return Ok(SyncOutcome::SkippedEmptyResource);
        }

        fileio::write_json_atomic(&mapping.file_path, &instance.data).map_err(|source| {
            SyncError::WriteFailed { path: mapping.file_path.clone(), source }
        })?;

        let fp = Fingerprint::of(&instance.data);
        self.ctx.fingerprints.record_file_sync(mapping, fp.clone());
        self.ctx.fingerprints.record_resource_sync(mapping, fp);

        tracing::info!(
            "[CR → File] Updated {} from {}/{}",
            mapping.file_path.display(),
            mapping.plural,
            mapping.name
        );
        Ok(SyncOutcome::ResourceToFile)
    }
}
