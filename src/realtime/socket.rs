use actix_web::{web, HttpRequest, HttpResponse};
use actix_ws::Message;
use futures::StreamExt;
use serde::Deserialize;
use utoipa::IntoParams;

use super::dispatcher::frame;
use super::registry::SessionRegistry;

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct WsParams {
    /// Claim whose changes this connection wants to hear about.
    pub claim_id: Option<i32>,
    /// Employees hear about every claim.
    #[serde(default)]
    pub is_employee: bool,
}

/// GET /ws
///
/// Upgrades to a WebSocket and registers the connection. Outbound frames are
/// `{"event":"joined"|"status","data":true}`; pings are answered with pongs.
#[utoipa::path(
    get,
    path = "/ws",
    params(WsParams),
    responses(
        (status = 101, description = "Switching to the WebSocket protocol"),
        (status = 400, description = "Not a WebSocket handshake"),
    ),
    tag = "realtime"
)]
pub async fn connect(
    req: HttpRequest,
    body: web::Payload,
    params: web::Query<WsParams>,
    registry: web::Data<SessionRegistry>,
) -> Result<HttpResponse, actix_web::Error> {
    let (response, mut session, mut inbound) = actix_ws::handle(&req, body)?;
    let params = params.into_inner();
    let (id, mut outbound) = registry.register(params.claim_id, params.is_employee);
    let registry = registry.into_inner();

    actix_web::rt::spawn(async move {
        loop {
            tokio::select! {
                Some(signal) = outbound.recv() => {
                    let text = match frame(signal) {
                        Ok(text) => text,
                        Err(e) => {
                            log::warn!("Could not encode signal for {}: {}", id, e);
                            continue;
                        }
                    };
                    if session.text(text).await.is_err() {
                        break;
                    }
                }
                msg = inbound.next() => match msg {
                    Some(Ok(Message::Ping(bytes))) => {
                        if session.pong(&bytes).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                },
            }
        }
        registry.unregister(id);
        if let Err(e) = session.close(None).await {
            log::debug!("Connection {} was already closed: {:?}", id, e);
        }
        log::debug!("Connection {} closed", id);
    });

    Ok(response)
}
