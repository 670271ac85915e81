//! Acquisition coordinator for bookmark favicons.
//!
//! One `FaviconCache` lives per dashboard instance. Given a domain it
//! returns cached data while fresh, otherwise drives the candidate list
//! through the background bridge in order, deduplicating concurrent
//! requests for the same domain, and persists the outcome (success or
//! terminal failure) before anyone observes it.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use keydash_client::candidates::candidates_for;
use keydash_core::Error;
use keydash_core::cache::{CacheDb, ExpiryPolicy, StoredIcon, now_ms};
use tokio::sync::{Mutex, broadcast};
use tokio::task::JoinHandle;

use crate::bridge::BridgeHandle;

/// Resolved favicon payload; None means no icon (confirmed or degraded).
type Resolved = Option<String>;

/// Coordinator over the persistent store, the in-flight registry, and the
/// background bridge.
pub struct FaviconCache {
    db: CacheDb,
    bridge: BridgeHandle,
    policy: ExpiryPolicy,
    in_flight: Arc<Mutex<HashMap<String, broadcast::Sender<Resolved>>>>,
    sweeper: JoinHandle<()>,
}

impl FaviconCache {
    /// Construct the coordinator and start housekeeping.
    ///
    /// The periodic expiry sweep is registered before the handle is
    /// returned, so the first lookup can never race initialization.
    pub fn new(db: CacheDb, bridge: BridgeHandle, policy: ExpiryPolicy, sweep_interval: Duration) -> Self {
        let sweeper = tokio::spawn({
            let db = db.clone();
            let policy = policy.clone();
            async move {
                let mut ticker = tokio::time::interval(sweep_interval);
                ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
                // interval fires immediately; the first sweep should wait
                // a full period like every later one
                ticker.tick().await;
                loop {
                    ticker.tick().await;
                    match db.sweep_expired(&policy).await {
                        Ok(0) => {}
                        Ok(n) => tracing::info!("sweep removed {} expired icon entries", n),
                        Err(e) => tracing::error!("icon sweep failed: {}", e),
                    }
                }
            }
        });

        Self {
            db,
            bridge,
            policy,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            sweeper,
        }
    }

    /// Resolve the icon for `domain`, fetching through the bridge on a
    /// cache miss.
    ///
    /// Never fails: every error class collapses into None, and the
    /// presentation side only ever sees presence or absence.
    pub async fn resolve_favicon(&self, domain: &str, source_url: &str) -> Resolved {
        match self.resolve_inner(domain, source_url).await {
            Ok(resolved) => resolved,
            Err(e) => {
                tracing::error!("favicon resolution failed for {}: {}", domain, e);
                None
            }
        }
    }

    async fn resolve_inner(&self, domain: &str, source_url: &str) -> Result<Resolved, Error> {
        if let Some(record) = self.db.get_icon(domain).await?
            && !self.policy.is_expired(&record, now_ms())
        {
            return Ok(match record.icon {
                StoredIcon::Image(data) => {
                    tracing::debug!("cache hit for {}", domain);
                    Some(data)
                }
                StoredIcon::Absent => {
                    tracing::debug!("cache hit (known absent) for {}", domain);
                    None
                }
            });
        }

        // join an acquisition already in flight for this domain, or
        // become its owner
        let tx = {
            let mut in_flight = self.in_flight.lock().await;
            if let Some(tx) = in_flight.get(domain) {
                let mut rx = tx.subscribe();
                drop(in_flight);
                tracing::debug!("joining in-flight acquisition for {}", domain);
                return Ok(rx.recv().await.ok().flatten());
            }
            let (tx, _) = broadcast::channel(1);
            in_flight.insert(domain.to_string(), tx.clone());
            tx
        };

        let outcome = self.acquire(domain, source_url).await;

        // registry cleanup and waiter notification happen whatever the
        // outcome; the write-back in acquire() already landed by now
        {
            let mut in_flight = self.in_flight.lock().await;
            in_flight.remove(domain);
            let resolved = match &outcome {
                Ok(resolved) => resolved.clone(),
                Err(_) => None,
            };
            let _ = tx.send(resolved);
        }

        outcome
    }

    /// One full acquisition sequence: probe the bridge, walk the candidate
    /// list, persist the outcome.
    async fn acquire(&self, domain: &str, source_url: &str) -> Result<Resolved, Error> {
        if !self.bridge.ping().await {
            tracing::warn!("bridge unreachable, caching {} as absent", domain);
            self.db.put_icon(domain, StoredIcon::Absent).await?;
            return Ok(None);
        }

        let candidates = candidates_for(source_url);
        for (i, candidate) in candidates.iter().enumerate() {
            if let Some(data) = self.bridge.fetch_favicon(candidate.as_str()).await {
                self.db.put_icon(domain, StoredIcon::Image(data.clone())).await?;
                tracing::debug!("cached icon for {} (candidate {} of {})", domain, i + 1, candidates.len());
                return Ok(Some(data));
            }
        }

        // zero candidates (unparseable source) or all of them failed
        self.db.put_icon(domain, StoredIcon::Absent).await?;
        tracing::debug!("no icon for {} ({} candidates tried), cached absent", domain, candidates.len());
        Ok(None)
    }

    /// Remove every cached entry and drop in-flight dedup state, so a
    /// subsequent call starts a fresh network sequence.
    pub async fn clear(&self) -> Result<u64, Error> {
        let removed = self.db.clear_icons().await?;
        self.in_flight.lock().await.clear();
        tracing::info!("cleared {} cached icon entries", removed);
        Ok(removed)
    }

    /// Diagnostic: walk the candidate list for a bare domain and report
    /// the first winning candidate, bypassing the store.
    pub async fn probe_domain(&self, domain: &str) -> Option<(String, String)> {
        let source = format!("https://{domain}");
        for candidate in candidates_for(&source) {
            if let Some(data) = self.bridge.fetch_favicon(candidate.as_str()).await {
                return Some((candidate.to_string(), data));
            }
        }
        None
    }
}

impl Drop for FaviconCache {
    fn drop(&mut self) {
        self.sweeper.abort();
    }
}
