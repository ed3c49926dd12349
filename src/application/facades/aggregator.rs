//! Unified status aggregator for top-level dashboards.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::application::coordinator::SubscriptionManager;
use crate::domain::foundation::{DomainName, DomainStatus, UnifiedStatus};

/// Contract every registered facade satisfies.
///
/// The single return type is what lets the aggregator (and any generic
/// error boundary) treat all domains uniformly.
pub trait RealtimeFacade: Send + Sync {
    /// The feature area this facade serves.
    fn domain(&self) -> DomainName;

    /// Fresh uniform status snapshot.
    fn status(&self) -> DomainStatus;
}

/// Combines every registered facade into one coordinator-level health view.
///
/// `is_healthy` is the AND over enabled domains (disabled domains are
/// excluded, not counted unhealthy) and the aggregate quality is the worst
/// among enabled domains.
pub struct StatusAggregator {
    manager: SubscriptionManager,
    facades: RwLock<Vec<Arc<dyn RealtimeFacade>>>,
}

impl StatusAggregator {
    /// Create an aggregator over the shared manager.
    pub fn new(manager: &SubscriptionManager) -> Self {
        Self {
            manager: manager.clone(),
            facades: RwLock::new(Vec::new()),
        }
    }

    /// Register a facade for aggregation.
    pub fn register(&self, facade: Arc<dyn RealtimeFacade>) {
        tracing::debug!(domain = %facade.domain(), "facade registered");
        self.facades.write().push(facade);
    }

    /// Number of registered facades.
    pub fn facade_count(&self) -> usize {
        self.facades.read().len()
    }

    /// Fresh coordinator-level status snapshot.
    pub fn unified(&self) -> UnifiedStatus {
        let statuses = self
            .facades
            .read()
            .iter()
            .map(|facade| facade.status())
            .collect();
        UnifiedStatus::aggregate(statuses)
    }

    /// Fan a manual retry out to every active channel.
    pub fn reconnect_all(&self) {
        self.manager.reconnect_all();
    }
}
