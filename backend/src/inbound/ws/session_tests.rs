//! WebSocket session handler tests.

use super::*;
use crate::inbound::http::test_utils::{test_session_middleware, world_state};
use crate::inbound::ws;
use crate::inbound::ws::origin::OriginPolicy;
use crate::test_support::{SocialWorld, social_world};
use actix_web::{App, HttpServer, dev::Server, dev::ServerHandle, http::header};
use awc::{BoxedSocket, ws::Codec, ws::Frame, ws::Message};
use futures_util::{SinkExt, StreamExt};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

type Socket = actix_codec::Framed<BoxedSocket, Codec>;

#[fixture]
async fn start_ws_server() -> (String, Server, SocialWorld) {
    let world = social_world().await.expect("fixture world");
    let http = world_state(&world).expect("http state");
    let ws_state = WsState::new(
        http.registry.clone(),
        http.queries.clone(),
        http.mutations.clone(),
        OriginPolicy::default(),
    );
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");
    let server = HttpServer::new(move || {
        App::new()
            .wrap(test_session_middleware())
            .app_data(actix_web::web::Data::new(ws_state.clone()))
            .service(ws::ws_entry)
    })
    .listen(listener)
    .expect("bind test server")
    .disable_signals()
    .run();
    (format!("http://{addr}"), server, world)
}

#[fixture]
async fn ws_client(
    #[future] start_ws_server: (String, Server, SocialWorld),
) -> (Socket, ServerHandle, SocialWorld) {
    let (url, server, world) = start_ws_server.await;
    let handle = server.handle();
    actix_web::rt::spawn(server);

    let (_resp, socket) = awc::Client::default()
        .ws(format!("{url}/ws"))
        .set_header(header::ORIGIN, "http://localhost:3000")
        .connect()
        .await
        .expect("websocket connect");

    (socket, handle, world)
}

async fn send(socket: &mut Socket, payload: impl Into<String>) {
    socket
        .send(Message::Text(payload.into().into()))
        .await
        .expect("send text");
}

async fn next_json(socket: &mut Socket) -> Value {
    loop {
        let frame = socket.next().await.expect("response frame").expect("frame");
        match frame {
            Frame::Text(bytes) => return serde_json::from_slice(&bytes).expect("json"),
            Frame::Ping(_) | Frame::Pong(_) => continue,
            other => panic!("expected text frame, got {other:?}"),
        }
    }
}

fn titles(reply: &Value) -> Vec<&str> {
    reply["data"]["allPosts"]
        .as_array()
        .expect("post list")
        .iter()
        .filter_map(|post| post["title"].as_str())
        .collect()
}

#[rstest]
#[actix_rt::test]
async fn operation_frames_run_as_anonymous_viewer(
    #[future] ws_client: (Socket, ServerHandle, SocialWorld),
) {
    let (mut socket, _server, _world) = ws_client.await;
    send(
        &mut socket,
        json!({ "type": "operation", "id": "q1", "operation": "allPosts" }).to_string(),
    )
    .await;

    let reply = next_json(&mut socket).await;
    assert_eq!(reply["id"], "q1");
    assert_eq!(titles(&reply), ["Welcome", "Notes"]);
}

#[rstest]
#[actix_rt::test]
async fn mutations_without_session_are_unauthorized(
    #[future] ws_client: (Socket, ServerHandle, SocialWorld),
) {
    let (mut socket, _server, _world) = ws_client.await;
    send(
        &mut socket,
        json!({
            "type": "operation",
            "id": 9,
            "operation": "createPost",
            "arguments": { "title": "Hi", "content": "There" }
        })
        .to_string(),
    )
    .await;

    let reply = next_json(&mut socket).await;
    assert_eq!(reply["id"], 9);
    assert_eq!(reply["errors"][0]["code"], "unauthorized");
}

#[rstest]
#[actix_rt::test]
async fn activity_shorthand_logs_and_acknowledges(
    #[future] ws_client: (Socket, ServerHandle, SocialWorld),
) {
    let (mut socket, _server, world) = ws_client.await;
    send(
        &mut socket,
        json!({ "type": "activity", "action": "page_view", "details": "/home" }).to_string(),
    )
    .await;

    assert_eq!(next_json(&mut socket).await, json!({ "status": "logged" }));
    let logged = world.storage.activities.list_all().await.expect("activities");
    assert!(
        logged
            .iter()
            .any(|activity| activity.action.as_ref() == "page_view" && activity.details == "/home")
    );
}

#[rstest]
#[case(json!({ "type": "system", "command": "uptime" }).to_string(), "unsupported message type")]
#[case("not-json".to_owned(), "malformed JSON message")]
#[actix_rt::test]
async fn unusable_frames_get_an_error_and_keep_the_connection(
    #[future] ws_client: (Socket, ServerHandle, SocialWorld),
    #[case] payload: String,
    #[case] expected: &str,
) {
    let (mut socket, _server, _world) = ws_client.await;
    send(&mut socket, payload).await;
    assert_eq!(next_json(&mut socket).await, json!({ "error": expected }));

    send(
        &mut socket,
        json!({ "type": "operation", "operation": "allActivities" }).to_string(),
    )
    .await;
    let reply = next_json(&mut socket).await;
    assert_eq!(reply["id"], Value::Null);
    assert!(reply["data"]["allActivities"].is_array());
}

#[rstest]
#[actix_rt::test]
async fn closes_after_timeout_without_client_messages(
    #[future] ws_client: (Socket, ServerHandle, SocialWorld),
) {
    let (mut socket, _server, _world) = ws_client.await;
    tokio::time::sleep(CLIENT_TIMEOUT + HEARTBEAT_INTERVAL * 3).await;

    let observed_close = tokio::time::timeout(Duration::from_secs(2), async {
        let mut observed = None;
        while let Some(frame) = socket.next().await {
            let frame = frame.expect("frame");
            match frame {
                Frame::Ping(_) | Frame::Pong(_) => continue,
                Frame::Close(reason) => {
                    observed = reason;
                    break;
                }
                other => panic!("unexpected frame before close: {other:?}"),
            }
        }
        observed
    })
    .await
    .expect("close frame missing within timeout")
    .expect("close frame missing after timeout");

    assert_eq!(observed_close.code, CloseCode::Normal);
    assert_eq!(
        observed_close.description.as_deref(),
        Some("heartbeat timeout")
    );
}
