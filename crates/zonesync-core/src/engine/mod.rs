//! Core reconciliation engine
//!
//! The ReconcileEngine drives one observe-diff-apply pass over the managed
//! zone:
//!
//! 1. Resolve the apex target address via `AddressCache`
//! 2. Load the provider's current record set via `RecordStore`
//! 3. Build the desired record set from the ingress hosts
//! 4. Fix up the apex record (create / update / no-op)
//! 5. Create or update one alias per desired subdomain
//! 6. Prune remote aliases with no desired counterpart
//!
//! ## Failure semantics
//!
//! Steps 1-3 abort with no provider mutation. A write failure in steps 4-6
//! aborts the remainder of the pass; writes already applied stay applied (no
//! rollback). Convergence is re-attempted on the next scheduled pass, which
//! makes the loop self-healing without in-process retries.
//!
//! ## Sequencing
//!
//! A pass is strictly sequential: pruning depends on the fully loaded actual
//! snapshot and the fully built desired snapshot, so no step may interleave
//! with another in the same pass.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cache::AddressCache;
use crate::config::ZoneConfig;
use crate::desired::DesiredState;
use crate::store::RecordStore;
use crate::traits::RecordTransport;

/// Outcome of one successful reconciliation pass
///
/// An all-zero summary means the zone was already converged and the pass
/// issued no provider mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassSummary {
    /// The resolved apex target address
    pub address: String,
    /// Records created this pass
    pub created: usize,
    /// Records updated this pass
    pub updated: usize,
    /// Records deleted this pass
    pub deleted: usize,
}

impl PassSummary {
    fn converged(address: String) -> Self {
        Self {
            address,
            created: 0,
            updated: 0,
            deleted: 0,
        }
    }

    /// True when the pass issued no provider mutation
    pub fn is_noop(&self) -> bool {
        self.created == 0 && self.updated == 0 && self.deleted == 0
    }
}

/// Orchestrator for single reconciliation passes
///
/// The engine is long-lived and owns the address cache across passes; every
/// other piece of state is constructed per pass and discarded. Scheduling is
/// deliberately not its concern: callers invoke [`reconcile`](Self::reconcile)
/// on a timer or on an ingress-change event.
pub struct ReconcileEngine {
    transport: Arc<dyn RecordTransport>,
    address_cache: AddressCache,
}

impl ReconcileEngine {
    /// Create an engine over a provider transport and an address cache
    pub fn new(transport: Arc<dyn RecordTransport>, address_cache: AddressCache) -> Self {
        Self {
            transport,
            address_cache,
        }
    }

    /// Run one reconciliation pass
    ///
    /// Idempotent: running against an already-converged zone produces zero
    /// provider mutations and an all-zero [`PassSummary`].
    pub async fn reconcile(
        &mut self,
        hosts: &[String],
        cfg: &ZoneConfig,
    ) -> Result<PassSummary, crate::Error> {
        cfg.validate()?;

        // Steps 1-3: observe. Any failure here aborts with no mutation.
        let address = self.address_cache.get_address(cfg.address_max_age()).await?;

        let mut store = RecordStore::new(self.transport.clone(), &cfg.zone);
        store.load().await?;

        let desired = DesiredState::build(hosts, &cfg.zone, cfg.ttl, &address);
        debug!(
            zone = %cfg.zone,
            address = %address,
            desired_aliases = desired.aliases.len(),
            remote_aliases = store.alias_records().len(),
            "computed desired state"
        );

        let mut summary = PassSummary::converged(address);

        self.reconcile_apex(&store, &desired, &mut summary).await?;
        self.reconcile_aliases(&store, &desired, &mut summary).await?;
        self.prune_aliases(&store, &desired, &mut summary).await?;

        Ok(summary)
    }

    /// Step 4: ensure exactly one apex address record with the resolved target
    async fn reconcile_apex(
        &self,
        store: &RecordStore,
        desired: &DesiredState,
        summary: &mut PassSummary,
    ) -> Result<(), crate::Error> {
        match store.apex_records() {
            [] => {
                info!(zone = %store.zone(), target = %desired.apex.target, "creating apex address record");
                store.add(&desired.apex).await?;
                summary.created += 1;
            }
            [canonical, extra @ ..] => {
                if !extra.is_empty() {
                    // Inherited anomaly (manual edits or an earlier buggy
                    // run). Flag it to the operator; do not delete.
                    warn!(
                        zone = %store.zone(),
                        extra = extra.len(),
                        "zone has more than one apex address record; reconciling the first, leaving the rest untouched"
                    );
                }
                if canonical.target != desired.apex.target {
                    info!(
                        zone = %store.zone(),
                        old = %canonical.target,
                        new = %desired.apex.target,
                        "updating apex address record"
                    );
                    let merged = desired.apex.clone().with_provider_id(canonical.provider_id);
                    store.update(&merged).await?;
                    summary.updated += 1;
                }
            }
        }
        Ok(())
    }

    /// Step 5: create or update one alias per desired subdomain
    async fn reconcile_aliases(
        &self,
        store: &RecordStore,
        desired: &DesiredState,
        summary: &mut PassSummary,
    ) -> Result<(), crate::Error> {
        for (subdomain, want) in &desired.aliases {
            match store.find_alias(subdomain) {
                None => {
                    info!(zone = %store.zone(), subdomain = %subdomain, target = %want.target, "creating alias record");
                    store.add(want).await?;
                    summary.created += 1;
                }
                Some(have) if have.target != want.target => {
                    info!(
                        zone = %store.zone(),
                        subdomain = %subdomain,
                        old = %have.target,
                        new = %want.target,
                        "updating alias record"
                    );
                    let merged = want.clone().with_provider_id(have.provider_id);
                    store.update(&merged).await?;
                    summary.updated += 1;
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Step 6: delete remote aliases whose subdomain is no longer desired
    async fn prune_aliases(
        &self,
        store: &RecordStore,
        desired: &DesiredState,
        summary: &mut PassSummary,
    ) -> Result<(), crate::Error> {
        for have in store.alias_records() {
            if !desired.aliases.contains_key(&have.subdomain) {
                info!(zone = %store.zone(), subdomain = %have.subdomain, "deleting stale alias record");
                store.delete(have).await?;
                summary.deleted += 1;
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for ReconcileEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReconcileEngine")
            .field("provider", &self.transport.provider_name())
            .field("address_cache", &self.address_cache)
            .finish()
    }
}
