//! In-process stand-ins for the generation service.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use poc_core::ServiceEndpoint;

#[derive(Debug, Clone)]
pub struct StubBehavior {
    pub heartbeat_status: StatusCode,
    pub heartbeat_delay: Duration,
    pub create_status: StatusCode,
    pub create_body: Value,
}

impl Default for StubBehavior {
    fn default() -> Self {
        Self {
            heartbeat_status: StatusCode::NO_CONTENT,
            heartbeat_delay: Duration::ZERO,
            create_status: StatusCode::CREATED,
            create_body: sample_result(),
        }
    }
}

struct StubState {
    behavior: StubBehavior,
    heartbeats: AtomicUsize,
    creates: Mutex<Vec<Value>>,
}

pub struct StubUpstream {
    pub endpoint: ServiceEndpoint,
    state: Arc<StubState>,
}

impl StubUpstream {
    pub async fn start(behavior: StubBehavior) -> Self {
        let state = Arc::new(StubState {
            behavior,
            heartbeats: AtomicUsize::new(0),
            creates: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/heartbeat", get(heartbeat))
            .route("/signatures/create", post(create))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            endpoint: ServiceEndpoint::parse(&format!("http://{addr}")).unwrap(),
            state,
        }
    }

    pub fn heartbeats(&self) -> usize {
        self.state.heartbeats.load(Ordering::SeqCst)
    }

    /// Bodies received on the creation route, in arrival order
    pub fn creates(&self) -> Vec<Value> {
        self.state.creates.lock().unwrap().clone()
    }
}

async fn heartbeat(State(state): State<Arc<StubState>>) -> StatusCode {
    state.heartbeats.fetch_add(1, Ordering::SeqCst);
    tokio::time::sleep(state.behavior.heartbeat_delay).await;
    state.behavior.heartbeat_status
}

async fn create(State(state): State<Arc<StubState>>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    state.creates.lock().unwrap().push(body);
    (state.behavior.create_status, Json(state.behavior.create_body.clone()))
}

/// An endpoint nothing listens on
pub async fn unreachable_endpoint() -> ServiceEndpoint {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    ServiceEndpoint::parse(&format!("http://{addr}")).unwrap()
}

pub fn sample_result() -> Value {
    json!({
        "combinedVelocity": 1000.0,
        "layerDimensions": [8, 16, 3],
        "strategy": "hsv",
        "signatures": [
            { "image": "iVBORw0KGgo=", "seed": "7" },
            { "image": "https://bucket.example/signatures/8.png", "seed": "8" }
        ]
    })
}
