//! WebSocket de atualizações de suprimento.
//!
//! GET /api/live/ws?region=PS ou ?zone=PS-rafah
//! Primeiro chega um `ready`, depois um `zoneUpdated` a cada mudança no escopo.

use std::time::Duration;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;
use validator::{ValidationError, ValidationErrors};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    services::live::{Subscription, SubscriptionScope, ZoneUpdate},
};

const PING_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LiveQuery {
    /// Código da região (todas as zonas)
    pub region: Option<String>,
    /// ID de uma zona; tem precedência sobre `region`
    pub zone: Option<String>,
}

impl LiveQuery {
    fn scope(self) -> Result<SubscriptionScope, ValidationErrors> {
        match (self.zone, self.region) {
            (Some(zone_id), _) => Ok(SubscriptionScope::Zone(zone_id)),
            (None, Some(region_id)) => Ok(SubscriptionScope::Region(region_id)),
            (None, None) => {
                let mut err = ValidationError::new("required");
                err.message = Some("validation.scope_required".into());
                let mut errors = ValidationErrors::new();
                errors.add("region", err);
                Err(errors)
            }
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum LiveMessage<'a> {
    #[serde(rename_all = "camelCase")]
    Ready {
        region_id: Option<&'a str>,
        zone_id: Option<&'a str>,
    },
    ZoneUpdated {
        update: &'a ZoneUpdate,
    },
}

#[utoipa::path(
    get,
    path = "/api/live/ws",
    tag = "Live",
    params(LiveQuery),
    responses(
        (status = 101, description = "Conexão WebSocket aberta"),
        (status = 400, description = "Nem região nem zona informadas"),
        (status = 404, description = "Região ou zona não encontrada")
    )
)]
pub async fn live_ws(
    ws: WebSocketUpgrade,
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<LiveQuery>,
) -> Result<Response, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    let scope = query
        .scope()
        .map_err(|e| to_api(AppError::ValidationError(e)))?;

    // Escopo inexistente nunca receberia nada
    match &scope {
        SubscriptionScope::Zone(zone_id) => {
            app_state
                .map_service
                .ensure_zone_exists(zone_id)
                .await
                .map_err(to_api)?;
        }
        SubscriptionScope::Region(code) => {
            app_state.map_service.region(code).await.map_err(to_api)?;
        }
    }

    let subscription = app_state.hub.subscribe(scope);
    Ok(ws.on_upgrade(move |socket| live_session(socket, subscription)))
}

async fn live_session(socket: WebSocket, mut subscription: Subscription) {
    let (mut sink, mut stream) = socket.split();
    let subscription_id = subscription.id();

    tracing::info!(subscription_id = %subscription_id, scope = ?subscription.scope(), "Live WS conectado");

    let ready = match subscription.scope() {
        SubscriptionScope::Zone(zone_id) => LiveMessage::Ready { region_id: None, zone_id: Some(zone_id) },
        SubscriptionScope::Region(region_id) => LiveMessage::Ready { region_id: Some(region_id), zone_id: None },
    };
    if send_message(&mut sink, &ready).await.is_err() {
        return;
    }

    let mut ping_interval = tokio::time::interval(PING_INTERVAL);
    ping_interval.tick().await; // o primeiro tick é imediato

    loop {
        tokio::select! {
            _ = ping_interval.tick() => {
                if sink.send(Message::Ping(Vec::new().into())).await.is_err() {
                    break;
                }
            }

            update = subscription.recv() => {
                let Some(update) = update else { break };
                let msg = LiveMessage::ZoneUpdated { update: &update };
                if send_message(&mut sink, &msg).await.is_err() {
                    break;
                }
            }

            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    // Clientes não mandam comandos; o resto é ignorado
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    subscription.cancel();
    tracing::info!(subscription_id = %subscription_id, "Live WS desconectado");
}

async fn send_message<S>(sink: &mut S, msg: &LiveMessage<'_>) -> Result<(), ()>
where
    S: futures::Sink<Message, Error = axum::Error> + Unpin,
{
    let json = serde_json::to_string(msg).map_err(|_| ())?;
    sink.send(Message::Text(json.into())).await.map_err(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(region: Option<&str>, zone: Option<&str>) -> LiveQuery {
        LiveQuery { region: region.map(Into::into), zone: zone.map(Into::into) }
    }

    #[test]
    fn zone_takes_precedence_over_region() {
        assert_eq!(
            query(Some("PS"), Some("PS-rafah")).scope().unwrap(),
            SubscriptionScope::Zone("PS-rafah".into())
        );
        assert_eq!(query(Some("PS"), None).scope().unwrap(), SubscriptionScope::Region("PS".into()));
    }

    #[test]
    fn empty_query_is_invalid() {
        let errors = query(None, None).scope().unwrap_err();
        assert!(errors.field_errors().contains_key("region"));
    }

    #[test]
    fn messages_are_tagged() {
        let ready = LiveMessage::Ready { region_id: Some("PS"), zone_id: None };
        let value = serde_json::to_value(&ready).unwrap();
        assert_eq!(value["type"], "ready");
        assert_eq!(value["regionId"], "PS");

        let update = ZoneUpdate::new("PS-a", "PS", vec![]);
        let value = serde_json::to_value(LiveMessage::ZoneUpdated { update: &update }).unwrap();
        assert_eq!(value["type"], "zoneUpdated");
        assert_eq!(value["update"]["zoneId"], "PS-a");
        assert_eq!(value["update"]["fillColor"], "#00FF00");
    }
}
