//! Realtime change feed over WebSocket.
//!
//! Path: `GET {prefix}/v1/{resource}/ws`
//!
//! After the upgrade the server sends `subscribed`, then one `change` frame
//! per row change on the resource's table. Clients may send `ping` and get a
//! `pong` back. A `lagged` error means changes were skipped and the client
//! should re-fetch the list.

use crate::AppState;
use actix_web::{web, Error as ActixError, HttpRequest, HttpResponse};
use actix_ws::{Closed, Message as WsMessage, MessageStream, Session};
use content_admin_models::{RawRowChange, Record};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, error, info, instrument, warn};

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum ClientMessage {
    Ping { ts: i64 },
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum ServerMessage<'a> {
    Subscribed { table: &'a str },
    Change { change: &'a RawRowChange },
    Error { code: &'a str, message: String },
    Pong { ts: i64 },
}

#[instrument(name = "changes-ws", skip_all, fields(table = R::TABLE))]
pub(super) async fn changes_ws<R: Record>(
    req: HttpRequest,
    body: web::Payload,
    state: web::Data<Arc<AppState>>,
) -> Result<HttpResponse, ActixError> {
    let (res, session, msg_stream) = actix_ws::handle(&req, body)?;
    // Subscribe before answering so nothing published after the upgrade is missed.
    let changes = state.hub().subscribe(R::TABLE);

    actix_rt::spawn(async move {
        if let Err(e) = changes_ws_loop(R::TABLE, changes, session, msg_stream).await {
            debug!(table = R::TABLE, "Change feed session closed: {}", e);
        }
    });

    Ok(res)
}

async fn changes_ws_loop(
    table: &'static str,
    mut changes: broadcast::Receiver<Arc<RawRowChange>>,
    mut session: Session,
    mut msg_stream: MessageStream,
) -> Result<(), Closed> {
    send(&mut session, &ServerMessage::Subscribed { table }).await?;

    loop {
        tokio::select! {
            received = changes.recv() => match received {
                Ok(change) => {
                    send(&mut session, &ServerMessage::Change { change: change.as_ref() }).await?;
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(table, skipped, "Change feed subscriber lagged");
                    send(
                        &mut session,
                        &ServerMessage::Error {
                            code: "lagged",
                            message: format!("{skipped} changes were skipped, re-fetch the list"),
                        },
                    )
                    .await?;
                }
                Err(RecvError::Closed) => break,
            },
            item = msg_stream.next() => {
                let msg = match item {
                    Some(Ok(msg)) => msg,
                    Some(Err(e)) => {
                        error!(table, "Change feed stream error: {}", e);
                        break;
                    }
                    None => break,
                };
                match msg {
                    WsMessage::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
                        Ok(ClientMessage::Ping { ts }) => {
                            send(&mut session, &ServerMessage::Pong { ts }).await?;
                        }
                        Err(e) => {
                            send(
                                &mut session,
                                &ServerMessage::Error {
                                    code: "badRequest",
                                    message: format!("Invalid message: {e}"),
                                },
                            )
                            .await?;
                        }
                    },
                    WsMessage::Ping(bytes) => session.pong(&bytes).await?,
                    WsMessage::Close(reason) => {
                        info!(table, "Change feed closed by client: {:?}", reason);
                        return Ok(());
                    }
                    WsMessage::Binary(_) => {
                        send(
                            &mut session,
                            &ServerMessage::Error {
                                code: "unsupportedMediaType",
                                message: "Binary frames are not supported".into(),
                            },
                        )
                        .await?;
                    }
                    WsMessage::Continuation(_) => {
                        warn!(table, "Unexpected continuation frame, closing");
                        break;
                    }
                    WsMessage::Pong(_) | WsMessage::Nop => {}
                }
            }
        }
    }

    session.close(None).await
}

async fn send(session: &mut Session, msg: &ServerMessage<'_>) -> Result<(), Closed> {
    match serde_json::to_string(msg) {
        Ok(text) => session.text(text).await,
        Err(e) => {
            error!("Failed to serialize change feed message: {}", e);
            Ok(())
        }
    }
}
