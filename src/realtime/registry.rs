use std::collections::HashSet;

use dashmap::{DashMap, DashSet};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use uuid::Uuid;

use crate::domain::ports::Signal;

pub type ConnectionId = Uuid;

/// Live connections, indexed by the claim they watch and by employee flag.
///
/// Every connection owns one outbound queue; the registry only ever holds the
/// sending half.
#[derive(Default)]
pub struct SessionRegistry {
    connections: DashMap<ConnectionId, UnboundedSender<Signal>>,
    by_claim: DashMap<i32, HashSet<ConnectionId>>,
    claim_of: DashMap<ConnectionId, i32>,
    employees: DashSet<ConnectionId>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &self,
        claim_id: Option<i32>,
        is_employee: bool,
    ) -> (ConnectionId, UnboundedReceiver<Signal>) {
        let id = Uuid::new_v4();
        let (tx, rx) = unbounded_channel();
        self.connections.insert(id, tx);
        if let Some(claim_id) = claim_id {
            self.by_claim.entry(claim_id).or_default().insert(id);
            self.claim_of.insert(id, claim_id);
        }
        if is_employee {
            self.employees.insert(id);
        }
        log::debug!(
            "Connection {} registered (claim {:?}, employee {})",
            id,
            claim_id,
            is_employee
        );
        (id, rx)
    }

    /// Idempotent.
    pub fn unregister(&self, id: ConnectionId) {
        self.connections.remove(&id);
        self.employees.remove(&id);
        if let Some((_, claim_id)) = self.claim_of.remove(&id) {
            if let Some(mut members) = self.by_claim.get_mut(&claim_id) {
                members.remove(&id);
            }
            self.by_claim.remove_if(&claim_id, |_, members| members.is_empty());
        }
    }

    /// Connections watching the claim plus every employee connection, each
    /// listed once.
    pub fn recipients(&self, claim_id: i32) -> Vec<(ConnectionId, UnboundedSender<Signal>)> {
        let mut ids: HashSet<ConnectionId> = self
            .by_claim
            .get(&claim_id)
            .map(|members| members.value().clone())
            .unwrap_or_default();
        ids.extend(self.employees.iter().map(|id| *id.key()));

        ids.into_iter()
            .filter_map(|id| self.connections.get(&id).map(|tx| (id, tx.clone())))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
