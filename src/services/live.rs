//! Atualizações de suprimento em tempo real.
//!
//! ```text
//! DonationService / SupplyService
//!       │ publish(ZoneUpdate)
//!       ▼
//! ZoneUpdateHub ── broadcast::Sender (fan-out)
//!       │
//!       ├── Subscription(Zone "PS-rafah")  -> recv() filtra pelo escopo
//!       └── Subscription(Region "PS")      -> handler WebSocket
//! ```
//!
//! Cada `subscribe` devolve um `Subscription`, que é o próprio handle de
//! cancelamento: `cancel()` (ou drop) remove a inscrição do registro.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::{models::supply::ZoneSupply, services::zone_aggregator::zone_color};

/// Capacidade do canal (rajadas de doações cabem folgadas)
const BROADCAST_CAPACITY: usize = 256;

/// Novo estado dos suprimentos de uma zona.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneUpdate {
    pub zone_id: String,
    pub region_id: String,
    pub supplies: Vec<ZoneSupply>,
    /// Cor da zona na visão "todos os suprimentos"
    pub fill_color: String,
    pub updated_at: DateTime<Utc>,
}

impl ZoneUpdate {
    pub fn new(zone_id: impl Into<String>, region_id: impl Into<String>, supplies: Vec<ZoneSupply>) -> Self {
        let fill_color = zone_color(&supplies, None).to_hex();
        Self {
            zone_id: zone_id.into(),
            region_id: region_id.into(),
            supplies,
            fill_color,
            updated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionScope {
    Zone(String),
    Region(String),
}

impl SubscriptionScope {
    pub fn matches(&self, update: &ZoneUpdate) -> bool {
        match self {
            SubscriptionScope::Zone(zone_id) => *zone_id == update.zone_id,
            SubscriptionScope::Region(region_id) => *region_id == update.region_id,
        }
    }
}

#[derive(Clone)]
pub struct ZoneUpdateHub {
    tx: broadcast::Sender<Arc<ZoneUpdate>>,
    /// subscription id -> escopo
    active: Arc<DashMap<Uuid, SubscriptionScope>>,
}

impl Default for ZoneUpdateHub {
    fn default() -> Self {
        Self::new()
    }
}

impl ZoneUpdateHub {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            tx,
            active: Arc::new(DashMap::new()),
        }
    }

    /// Publica a atualização; devolve quantos receptores estavam ouvindo.
    pub fn publish(&self, update: ZoneUpdate) -> usize {
        let zone_id = update.zone_id.clone();
        // Sem inscritos o send retorna Err, seguro ignorar
        match self.tx.send(Arc::new(update)) {
            Ok(receivers) => {
                tracing::debug!(zone_id = %zone_id, receivers, "Atualização de zona publicada");
                receivers
            }
            Err(_) => 0,
        }
    }

    pub fn subscribe(&self, scope: SubscriptionScope) -> Subscription {
        let id = Uuid::new_v4();
        self.active.insert(id, scope.clone());
        tracing::debug!(subscription_id = %id, scope = ?scope, "Nova inscrição");

        Subscription {
            id,
            scope,
            rx: self.tx.subscribe(),
            active: Arc::clone(&self.active),
        }
    }

    pub fn active_subscriptions(&self) -> usize {
        self.active.len()
    }
}

/// Handle de uma inscrição. Cancelar (ou dropar) encerra a inscrição.
pub struct Subscription {
    id: Uuid,
    scope: SubscriptionScope,
    rx: broadcast::Receiver<Arc<ZoneUpdate>>,
    active: Arc<DashMap<Uuid, SubscriptionScope>>,
}

impl Subscription {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn scope(&self) -> &SubscriptionScope {
        &self.scope
    }

    /// Próxima atualização dentro do escopo. `None` quando o hub deixou de existir.
    pub async fn recv(&mut self) -> Option<Arc<ZoneUpdate>> {
        loop {
            match self.rx.recv().await {
                Ok(update) if self.scope.matches(&update) => return Some(update),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(subscription_id = %self.id, skipped, "Inscrição atrasada, eventos descartados");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    pub fn cancel(self) {
        tracing::debug!(subscription_id = %self.id, "Inscrição cancelada");
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.active.remove(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn update(zone_id: &str, region_id: &str) -> ZoneUpdate {
        ZoneUpdate::new(zone_id, region_id, vec![])
    }

    #[tokio::test]
    async fn zone_subscription_only_sees_its_zone() {
        let hub = ZoneUpdateHub::new();
        let mut sub = hub.subscribe(SubscriptionScope::Zone("PS-b".into()));

        hub.publish(update("PS-a", "PS"));
        hub.publish(update("PS-b", "PS"));

        let received = sub.recv().await.unwrap();
        assert_eq!(received.zone_id, "PS-b");
    }

    #[tokio::test]
    async fn region_subscription_sees_every_zone_of_region() {
        let hub = ZoneUpdateHub::new();
        let mut sub = hub.subscribe(SubscriptionScope::Region("PS".into()));

        hub.publish(update("SD-x", "SD"));
        hub.publish(update("PS-a", "PS"));
        hub.publish(update("PS-b", "PS"));

        assert_eq!(sub.recv().await.unwrap().zone_id, "PS-a");
        assert_eq!(sub.recv().await.unwrap().zone_id, "PS-b");
    }

    #[tokio::test]
    async fn out_of_scope_updates_never_arrive() {
        let hub = ZoneUpdateHub::new();
        let mut sub = hub.subscribe(SubscriptionScope::Zone("PS-b".into()));

        hub.publish(update("PS-a", "PS"));
        let result = tokio::time::timeout(Duration::from_millis(50), sub.recv()).await;
        assert!(result.is_err());
    }

    #[test]
    fn cancel_and_drop_unregister() {
        let hub = ZoneUpdateHub::new();
        let first = hub.subscribe(SubscriptionScope::Zone("PS-a".into()));
        let second = hub.subscribe(SubscriptionScope::Region("PS".into()));
        assert_eq!(hub.active_subscriptions(), 2);

        first.cancel();
        assert_eq!(hub.active_subscriptions(), 1);

        drop(second);
        assert_eq!(hub.active_subscriptions(), 0);
    }

    #[tokio::test]
    async fn recv_ends_when_hub_is_gone() {
        let hub = ZoneUpdateHub::new();
        let mut sub = hub.subscribe(SubscriptionScope::Region("PS".into()));
        drop(hub);
        assert!(sub.recv().await.is_none());
    }

    #[test]
    fn publish_without_subscribers_is_harmless() {
        let hub = ZoneUpdateHub::new();
        assert_eq!(hub.publish(update("PS-a", "PS")), 0);
    }

    #[test]
    fn update_carries_all_supplies_color() {
        let u = update("PS-a", "PS");
        assert_eq!(u.fill_color, "#00FF00");
    }
}
