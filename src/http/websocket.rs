//! WebSocket subscriber sessions.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::http::server::AppState;
use crate::sink::{MessageKind, SendError, Subscriber, SubscriberId};

/// A subscriber backed by a bounded queue drained by a WebSocket session task.
#[derive(Debug)]
pub struct WsSubscriber {
    id: SubscriberId,
    tx: mpsc::Sender<Message>,
}

impl WsSubscriber {
    pub fn new(tx: mpsc::Sender<Message>) -> Self {
        Self {
            id: SubscriberId::new(),
            tx,
        }
    }
}

impl Subscriber for WsSubscriber {
    fn id(&self) -> SubscriberId {
        self.id
    }

    fn send(&self, kind: MessageKind, payload: &[u8]) -> Result<(), SendError> {
        let message = match kind {
            MessageKind::Text => Message::Text(String::from_utf8_lossy(payload).into_owned().into()),
            MessageKind::Binary => Message::Binary(payload.to_vec().into()),
        };
        self.tx.try_send(message).map_err(|e| match e {
            TrySendError::Full(_) => SendError::Backpressure,
            TrySendError::Closed(_) => SendError::Closed,
        })
    }
}

/// `GET /logs`: upgrade and stream structured logs until the client leaves.
pub async fn logs_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| run_session(socket, state))
}

async fn run_session(socket: WebSocket, state: AppState) {
    let (mut outgoing, mut incoming) = socket.split();
    let (tx, mut rx) = mpsc::channel(state.subscriber_queue.max(1));
    let subscriber = Arc::new(WsSubscriber::new(tx));
    let id = subscriber.id();
    let shutdown = state.shutdown.clone();

    state.assembly.add_subscriber(subscriber);
    tracing::debug!(subscriber = %id, "Log subscriber connected");

    loop {
        tokio::select! {
            queued = rx.recv() => match queued {
                Some(message) => {
                    if outgoing.send(message).await.is_err() {
                        break;
                    }
                }
                None => break,
            },
            frame = incoming.next() => match frame {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                // Pings are answered by axum; other client frames are ignored.
                Some(Ok(_)) => {}
            },
            _ = shutdown.wait() => {
                let _ = outgoing.send(Message::Close(None)).await;
                break;
            }
        }
    }

    state.assembly.remove_subscriber(id);
    tracing::debug!(subscriber = %id, "Log subscriber disconnected");
}
