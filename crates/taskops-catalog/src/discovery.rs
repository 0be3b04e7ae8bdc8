//! Request/response exchange with the host's operator-discovery collaborator.
//!
//! The catalog side broadcasts [`CatalogRequested`] signals; the host answers
//! through a [`CatalogResponder`] whenever it likes. Responses are applied with
//! [`DiscoveryChannel::sync`], which never blocks. There is no timeout: a
//! catalog that never hears back simply stays empty.

use serde::{Deserialize, Serialize};
use taskops_types::Operator;
use tokio::sync::{broadcast, mpsc};
use uuid::Uuid;

use crate::catalog::OperatorCatalog;

/// Signal asking the host to deliver the operator list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRequested {
    pub request_id: Uuid,
}

/// The host's answer, carrying the full operator list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogReturned {
    pub operators: Vec<Operator>,
}

/// Host-side handle for answering catalog requests.
#[derive(Debug, Clone)]
pub struct CatalogResponder {
    sender: mpsc::UnboundedSender<CatalogReturned>,
}

impl CatalogResponder {
    /// Deliver an operator list. Returns `false` if the catalog side is gone.
    pub fn respond(&self, operators: Vec<Operator>) -> bool {
        self.sender.send(CatalogReturned { operators }).is_ok()
    }
}

/// Catalog-side end of the discovery exchange.
pub struct DiscoveryChannel {
    requests: broadcast::Sender<CatalogRequested>,
    responder: mpsc::UnboundedSender<CatalogReturned>,
    returned: mpsc::UnboundedReceiver<CatalogReturned>,
}

impl DiscoveryChannel {
    /// Create a channel whose request signal buffers up to `capacity` unread requests.
    ///
    /// A capacity of 0 is raised to 1.
    pub fn new(capacity: usize) -> Self {
        let (requests, _) = broadcast::channel(capacity.max(1));
        let (responder, returned) = mpsc::unbounded_channel();
        Self {
            requests,
            responder,
            returned,
        }
    }

    /// Observe catalog requests.
    pub fn subscribe(&self) -> broadcast::Receiver<CatalogRequested> {
        self.requests.subscribe()
    }

    pub fn responder(&self) -> CatalogResponder {
        CatalogResponder {
            sender: self.responder.clone(),
        }
    }

    /// Emit a catalog request.
    ///
    /// If nobody is subscribed the signal is silently dropped.
    pub fn request(&self) -> Uuid {
        let request_id = Uuid::new_v4();
        let _ = self.requests.send(CatalogRequested { request_id });
        tracing::debug!(request = %request_id, "Operator catalog requested");
        request_id
    }

    /// Request the catalog only while `catalog` has no operators.
    pub fn request_if_empty(&self, catalog: &OperatorCatalog) -> Option<Uuid> {
        catalog.is_empty().then(|| self.request())
    }

    /// Apply every response received so far. Returns `true` if the catalog was replaced.
    ///
    /// Empty responses mean "no update available" and are skipped; among
    /// several pending responses the last non-empty one wins.
    pub fn sync(&mut self, catalog: &mut OperatorCatalog) -> bool {
        let mut latest = None;
        while let Ok(returned) = self.returned.try_recv() {
            if returned.operators.is_empty() {
                tracing::warn!("Ignoring empty operator catalog response");
                continue;
            }
            latest = Some(returned.operators);
        }
        match latest {
            Some(operators) => {
                catalog.load_catalog(operators);
                true
            }
            None => false,
        }
    }

    /// Wait for the next non-empty response and load it into `catalog`.
    pub async fn recv(&mut self, catalog: &mut OperatorCatalog) {
        while let Some(returned) = self.returned.recv().await {
            if returned.operators.is_empty() {
                tracing::warn!("Ignoring empty operator catalog response");
                continue;
            }
            catalog.load_catalog(returned.operators);
            return;
        }
    }
}

impl Default for DiscoveryChannel {
    fn default() -> Self {
        Self::new(16)
    }
}
