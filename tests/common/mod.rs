#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::mpsc;

use anyhow::{Result, anyhow};
use serde_json::{Value, json};

use roster_terminal::http_client::{ApiRequest, ApiResponse, Method, Transport};
use roster_terminal::provider::handle_command;
use roster_terminal::roster_fetch::RosterClient;
use roster_terminal::state::{Delta, ProviderCommand, RosterState, apply_delta};

pub const BASE: &str = "http://roster.test/api/2508-FTB-ET-WEB-FT/players";

/// In-memory stand-in for the roster API. Requests are recorded, and queued
/// overrides answer the next requests before the normal routing kicks in.
pub struct FakeRoster {
    inner: Mutex<Inner>,
}

struct Inner {
    players: Vec<Value>,
    next_id: u64,
    requests: Vec<ApiRequest>,
    overrides: VecDeque<Result<ApiResponse, String>>,
}

pub fn player_json(id: u64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "breed": "Mixed",
        "status": "bench",
        "imageUrl": format!("https://img.test/{id}.png"),
        "createdAt": "2025-09-01T12:30:00.000Z",
        "teamId": null,
        "cohortId": 7
    })
}

impl FakeRoster {
    pub fn new() -> Self {
        Self::with_players(&[])
    }

    pub fn with_players(players: &[(u64, &str)]) -> Self {
        let next_id = players.iter().map(|(id, _)| *id).max().unwrap_or(0) + 1;
        Self {
            inner: Mutex::new(Inner {
                players: players
                    .iter()
                    .map(|(id, name)| player_json(*id, name))
                    .collect(),
                next_id,
                requests: Vec::new(),
                overrides: VecDeque::new(),
            }),
        }
    }

    pub fn respond_next(&self, status: u16, body: &str) {
        self.inner.lock().unwrap().overrides.push_back(Ok(ApiResponse {
            status,
            body: body.to_string(),
        }));
    }

    pub fn fail_next(&self, msg: &str) {
        self.inner
            .lock()
            .unwrap()
            .overrides
            .push_back(Err(msg.to_string()));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.inner.lock().unwrap().requests.clone()
    }

    pub fn count(&self, method: Method, url: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.url == url)
            .count()
    }

    pub fn list_calls(&self) -> usize {
        self.count(Method::Get, BASE)
    }
}

fn reply(status: u16, body: Value) -> ApiResponse {
    ApiResponse {
        status,
        body: body.to_string(),
    }
}

fn not_found(id: &str) -> ApiResponse {
    reply(
        404,
        json!({
            "success": false,
            "error": { "name": "NotFound", "message": format!("Player #{id} not found") },
            "data": null
        }),
    )
}

impl Transport for FakeRoster {
    fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let mut inner = self.inner.lock().unwrap();
        inner.requests.push(request.clone());
        if let Some(next) = inner.overrides.pop_front() {
            return next.map_err(|msg| anyhow!(msg));
        }

        let rest = request
            .url
            .strip_prefix(BASE)
            .unwrap_or(&request.url)
            .trim_start_matches('/')
            .to_string();
        let resp = match (request.method, rest.as_str()) {
            (Method::Get, "") => reply(
                200,
                json!({ "success": true, "error": null, "data": { "players": inner.players } }),
            ),
            (Method::Get, id) => match inner.players.iter().find(|p| p["id"].to_string() == id) {
                Some(player) => reply(
                    200,
                    json!({ "success": true, "error": null, "data": { "player": player } }),
                ),
                None => not_found(id),
            },
            (Method::Post, "") => {
                let body: Value = serde_json::from_str(request.body.as_deref().unwrap_or("null"))?;
                let id = inner.next_id;
                inner.next_id += 1;
                let mut player = player_json(id, body["name"].as_str().unwrap_or_default());
                player["breed"] = body["breed"].clone();
                player["imageUrl"] = body["imageUrl"].clone();
                inner.players.push(player.clone());
                reply(
                    200,
                    json!({ "success": true, "error": null, "data": { "newPlayer": player } }),
                )
            }
            (Method::Delete, id) => {
                let before = inner.players.len();
                inner.players.retain(|p| p["id"].to_string() != id);
                if inner.players.len() < before {
                    ApiResponse {
                        status: 204,
                        body: String::new(),
                    }
                } else {
                    not_found(id)
                }
            }
            (method, path) => return Err(anyhow!("unrouted {method:?} {path}")),
        };
        Ok(resp)
    }
}

pub fn client(fake: FakeRoster) -> RosterClient<FakeRoster> {
    RosterClient::new(fake, BASE)
}

/// Runs one command through the provider and applies every delta it emitted.
pub fn run(
    client: &RosterClient<FakeRoster>,
    state: &mut RosterState,
    cmd: ProviderCommand,
) -> Vec<Delta> {
    let (tx, rx) = mpsc::channel();
    handle_command(client, cmd, &tx);
    drop(tx);
    let deltas = rx.iter().collect::<Vec<_>>();
    for delta in deltas.iter().cloned() {
        apply_delta(state, delta);
    }
    deltas
}
