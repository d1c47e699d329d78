#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use wink_cursor_backend::clock::ManualClock;
use wink_cursor_backend::config::Config;
use wink_cursor_backend::state::AppState;
use wink_cursor_core::{RecordingPointer, LEFT_IRIS, RIGHT_IRIS};

pub const FRAME_WIDTH: f64 = 640.0;
pub const FRAME_HEIGHT: f64 = 480.0;

pub fn create_test_app() -> (Router, Arc<RecordingPointer>) {
    let (app, pointer, _) = create_test_app_with_clock();
    (app, pointer)
}

/// App whose detector clock only moves through the returned handle.
pub fn create_test_app_with_clock() -> (Router, Arc<RecordingPointer>, Arc<ManualClock>) {
    let pointer = Arc::new(RecordingPointer::new());
    let clock = Arc::new(ManualClock::new(0.0));
    let state = AppState::with_clock(Config::default(), pointer.clone(), clock.clone());
    (wink_cursor_backend::create_app(state), pointer, clock)
}

/// A 478-point face mesh with both irises centered in their eyes. A closed
/// eye reads EAR 0.1, an open one 0.4.
pub fn face(left_closed: bool, right_closed: bool) -> Vec<Value> {
    let mut points = vec![(0.5, 0.5); 478];
    let mut put = |i: usize, x: f64, y: f64| points[i] = (x / FRAME_WIDTH, y / FRAME_HEIGHT);

    let lid = |closed: bool| if closed { 1.0 } else { 4.0 };
    let (l, r) = (lid(left_closed), lid(right_closed));

    put(33, 100.0, 240.0);
    put(160, 106.0, 240.0 - l);
    put(158, 114.0, 240.0 - l);
    put(133, 120.0, 240.0);
    put(153, 114.0, 240.0 + l);
    put(144, 106.0, 240.0 + l);

    put(362, 180.0, 240.0);
    put(385, 174.0, 240.0 - r);
    put(387, 166.0, 240.0 - r);
    put(263, 160.0, 240.0);
    put(373, 166.0, 240.0 + r);
    put(380, 174.0, 240.0 + r);

    for i in LEFT_IRIS {
        put(i, 110.0, 240.0);
    }
    for i in RIGHT_IRIS {
        put(i, 170.0, 240.0);
    }

    points.into_iter().map(|(x, y)| json!({ "x": x, "y": y })).collect()
}

pub fn frame_body(landmarks: Option<Vec<Value>>) -> Value {
    json!({
        "frameWidth": FRAME_WIDTH as u32,
        "frameHeight": FRAME_HEIGHT as u32,
        "landmarks": landmarks,
    })
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
