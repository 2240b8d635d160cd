//! Per-connection WebSocket handler.
//!
//! Keeps framing and heartbeats at the edge while deferring behaviour to the
//! operation registry and mutation service. The public contract pings every
//! 5s and considers a connection idle after 10s without client traffic.
//! Tests shorten these intervals.
//!
//! Unusable text frames are answered with an error frame; the connection
//! stays open.

use std::time::{Duration, Instant};

use actix_ws::{CloseCode, CloseReason, Closed, Message, MessageStream, ProtocolError, Session};
use serde_json::Value;
use tokio::time;
use tracing::{debug, warn};

use crate::domain::{LogActivityRequest, OperationResponse, TraceId, Viewer};
use crate::inbound::http::error::redact_if_internal;
use crate::inbound::ws::messages::{
    ActivityLogged, ClientFrame, ErrorFrame, operation_reply, operation_request,
};
use crate::inbound::ws::state::WsState;

/// Time between heartbeats to the client (5s in production, shorter in tests).
#[cfg(not(test))]
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
#[cfg(test)]
const HEARTBEAT_INTERVAL: Duration = Duration::from_millis(50);

/// Max idle time before disconnecting the client (10s in production, shorter in tests).
#[cfg(not(test))]
const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);
#[cfg(test)]
const CLIENT_TIMEOUT: Duration = Duration::from_millis(100);

pub(super) async fn handle_ws_session(
    state: WsState,
    viewer: Option<Viewer>,
    session: Session,
    stream: MessageStream,
) {
    WsSession::new(state, viewer).run(session, stream).await;
}

enum SessionError {
    ClientClosed(Option<CloseReason>),
    StreamClosed,
    HeartbeatTimeout,
    Protocol(ProtocolError),
    Network(Closed),
}

enum CloseAction {
    None,
    Close(Option<CloseReason>),
}

struct WsSession {
    state: WsState,
    viewer: Option<Viewer>,
}

impl WsSession {
    fn new(state: WsState, viewer: Option<Viewer>) -> Self {
        Self { state, viewer }
    }

    async fn run(&self, mut session: Session, mut stream: MessageStream) {
        let mut last_heartbeat = Instant::now();
        let mut heartbeat = time::interval(HEARTBEAT_INTERVAL);

        loop {
            let result = tokio::select! {
                _ = heartbeat.tick() => {
                    self.handle_heartbeat_tick(&mut session, &last_heartbeat).await
                }
                message = stream.recv() => {
                    self.handle_stream_message(&mut session, &mut last_heartbeat, message)
                        .await
                }
            };

            if let Err(error) = result {
                self.log_shutdown_reason(&error);
                let close_action = self.close_action_for(&error);
                self.close_session_if_needed(session, close_action).await;
                return;
            }
        }
    }

    async fn handle_heartbeat_tick(
        &self,
        session: &mut Session,
        last_heartbeat: &Instant,
    ) -> Result<(), SessionError> {
        if Instant::now().duration_since(*last_heartbeat) > CLIENT_TIMEOUT {
            return Err(SessionError::HeartbeatTimeout);
        }

        session.ping(b"").await.map_err(SessionError::Network)
    }

    async fn handle_stream_message(
        &self,
        session: &mut Session,
        last_heartbeat: &mut Instant,
        message: Option<Result<Message, ProtocolError>>,
    ) -> Result<(), SessionError> {
        let Some(message) = message else {
            return Err(SessionError::StreamClosed);
        };

        match message {
            Ok(message) => self.handle_message(session, last_heartbeat, message).await,
            Err(error) => Err(SessionError::Protocol(error)),
        }
    }

    async fn handle_message(
        &self,
        session: &mut Session,
        last_heartbeat: &mut Instant,
        message: Message,
    ) -> Result<(), SessionError> {
        match message {
            Message::Ping(payload) => {
                *last_heartbeat = Instant::now();
                session
                    .pong(&payload)
                    .await
                    .map_err(SessionError::Network)
            }
            Message::Text(text) => {
                *last_heartbeat = Instant::now();
                let reply = TraceId::scope(TraceId::generate(), self.reply_to(text.as_ref())).await;
                self.send_json(session, &reply)
                    .await
                    .map_err(SessionError::Network)
            }
            Message::Pong(_) | Message::Binary(_) | Message::Continuation(_) | Message::Nop => {
                *last_heartbeat = Instant::now();
                Ok(())
            }
            Message::Close(reason) => Err(SessionError::ClientClosed(reason)),
        }
    }

    async fn reply_to(&self, text: &str) -> Value {
        let frame = match ClientFrame::parse(text) {
            Ok(frame) => frame,
            Err(error) => {
                debug!(?error, "Rejected WebSocket text frame");
                return to_value(&error.reply());
            }
        };

        match frame {
            ClientFrame::Operation {
                id,
                operation,
                arguments,
            } => {
                let response = self
                    .state
                    .registry
                    .execute(operation_request(operation, arguments), self.viewer.as_ref())
                    .await;
                operation_reply(id, &redact(response))
            }
            ClientFrame::Activity { action, details } => {
                match self
                    .state
                    .mutations
                    .log_activity(LogActivityRequest { action, details })
                    .await
                {
                    Ok(_) => to_value(&ActivityLogged::new()),
                    Err(error) => to_value(&ErrorFrame::from(&redact_if_internal(&error))),
                }
            }
        }
    }

    async fn send_json(&self, session: &mut Session, payload: &Value) -> Result<(), Closed> {
        session.text(payload.to_string()).await
    }

    fn log_shutdown_reason(&self, error: &SessionError) {
        match error {
            SessionError::HeartbeatTimeout => {
                warn!("WebSocket heartbeat timeout; closing connection");
            }
            SessionError::Protocol(error) => {
                warn!(error = %error, "WebSocket protocol error");
            }
            SessionError::Network(error) => {
                warn!(error = %error, "WebSocket send failed; closing connection");
            }
            SessionError::ClientClosed(_) | SessionError::StreamClosed => {}
        }
    }

    fn close_action_for(&self, error: &SessionError) -> CloseAction {
        match error {
            SessionError::HeartbeatTimeout => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Normal,
                description: Some("heartbeat timeout".to_owned()),
            })),
            SessionError::Protocol(_) => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Protocol,
                description: Some("protocol error".to_owned()),
            })),
            SessionError::ClientClosed(reason) => CloseAction::Close(reason.clone()),
            SessionError::StreamClosed | SessionError::Network(_) => CloseAction::None,
        }
    }

    async fn close_session_if_needed(&self, session: Session, close_action: CloseAction) {
        if let CloseAction::Close(reason) = close_action {
            if let Err(error) = session.close(reason).await {
                warn!(error = %error, "Failed to close WebSocket session");
            }
        }
    }
}

fn redact(response: OperationResponse) -> OperationResponse {
    match response {
        OperationResponse::Errors(errors) => {
            OperationResponse::Errors(errors.iter().map(redact_if_internal).collect())
        }
        data @ OperationResponse::Data(_) => data,
    }
}

fn to_value<T: serde::Serialize>(payload: &T) -> Value {
    serde_json::to_value(payload).unwrap_or_else(|error| {
        warn!(error = %error, "Failed to serialise WebSocket payload");
        Value::Null
    })
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
