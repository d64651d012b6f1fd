use std::fmt;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::Config;
use crate::http_client::{ApiRequest, ApiResponse, HttpTransport, Method, Transport};
use crate::state::{NewPlayer, Player, PlayerId};

/// Broad cause of a failed roster call, attached to the error as context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Network,
    Decode,
    Rejected,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FailureKind::Network => "network failure",
            FailureKind::Decode => "decode failure",
            FailureKind::Rejected => "server rejected request",
        };
        f.write_str(label)
    }
}

pub fn failure_kind(err: &anyhow::Error) -> Option<FailureKind> {
    err.downcast_ref::<FailureKind>().copied()
}

pub struct RosterClient<T = HttpTransport> {
    transport: T,
    collection_url: String,
}

impl RosterClient<HttpTransport> {
    /// Uses the timeout from the process environment.
    pub fn from_url(collection_url: impl Into<String>) -> Self {
        Self::new(HttpTransport::default(), collection_url)
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            HttpTransport::new(config.timeout),
            config.collection_url.clone(),
        )
    }
}

impl<T: Transport> RosterClient<T> {
    pub fn new(transport: T, collection_url: impl Into<String>) -> Self {
        let collection_url = collection_url.into().trim_end_matches('/').to_string();
        Self {
            transport,
            collection_url,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn list_players(&self) -> Result<Vec<Player>> {
        let resp = self.send(Method::Get, self.collection_url.clone(), None)?;
        ensure_success(&resp)?;
        parse_players_json(&resp.body)
    }

    pub fn get_player(&self, id: PlayerId) -> Result<Player> {
        let resp = self.send(Method::Get, self.player_url(id), None)?;
        ensure_success(&resp)?;
        parse_player_json(&resp.body)
    }

    /// Returns the player the server echoed back, if it echoed one.
    pub fn create_player(&self, input: &NewPlayer) -> Result<Option<Player>> {
        let body = serde_json::to_string(input).context("serialize new player")?;
        let resp = self.send(Method::Post, self.collection_url.clone(), Some(body))?;
        if !resp.is_success() {
            return Err(rejected(http_failure_message(&resp)));
        }
        parse_create_json(&resp.body)
    }

    /// Only `204 No Content` counts as a successful delete.
    pub fn delete_player(&self, id: PlayerId) -> Result<()> {
        let resp = self.send(Method::Delete, self.player_url(id), None)?;
        if resp.status != 204 {
            return Err(rejected(format!(
                "expected 204 deleting player #{id}, got {}",
                http_failure_message(&resp)
            )));
        }
        Ok(())
    }

    fn player_url(&self, id: PlayerId) -> String {
        format!("{}/{id}", self.collection_url)
    }

    fn send(&self, method: Method, url: String, body: Option<String>) -> Result<ApiResponse> {
        self.transport
            .send(ApiRequest { method, url, body })
            .context(FailureKind::Network)
    }
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: Option<bool>,
    error: Option<Value>,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct PlayersData {
    players: Vec<WirePlayer>,
}

#[derive(Debug, Deserialize)]
struct PlayerData {
    player: WirePlayer,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedData {
    #[serde(default)]
    new_player: Option<WirePlayer>,
    #[serde(default)]
    player: Option<WirePlayer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePlayer {
    id: PlayerId,
    name: String,
    #[serde(default)]
    breed: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    team_name: Option<String>,
    #[serde(default)]
    team: Option<WireTeam>,
    #[serde(default)]
    created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireTeam {
    #[serde(default)]
    name: Option<String>,
}

impl From<WirePlayer> for Player {
    fn from(wire: WirePlayer) -> Self {
        let team_name = wire
            .team_name
            .or_else(|| wire.team.and_then(|t| t.name))
            .filter(|name| !name.trim().is_empty());
        Player {
            id: wire.id,
            name: wire.name,
            breed: wire.breed.unwrap_or_default(),
            image_url: wire.image_url.unwrap_or_default(),
            status: wire.status.unwrap_or_default(),
            team_name,
            created_at: wire.created_at,
        }
    }
}

pub fn parse_players_json(raw: &str) -> Result<Vec<Player>> {
    let envelope: Envelope<PlayersData> = decode(raw, "players")?;
    let data = accepted_data(envelope, "players")?;
    Ok(data.players.into_iter().map(Player::from).collect())
}

pub fn parse_player_json(raw: &str) -> Result<Player> {
    let envelope: Envelope<PlayerData> = decode(raw, "player")?;
    let data = accepted_data(envelope, "player")?;
    Ok(data.player.into())
}

pub fn parse_create_json(raw: &str) -> Result<Option<Player>> {
    let envelope: Envelope<CreatedData> = decode(raw, "create")?;
    if envelope.success != Some(true) {
        return Err(rejected(
            error_message(envelope.error.as_ref())
                .unwrap_or_else(|| "create was not acknowledged".to_string()),
        ));
    }
    let created = envelope
        .data
        .and_then(|data| data.new_player.or(data.player))
        .map(Player::from);
    Ok(created)
}

fn decode<T: DeserializeOwned>(raw: &str, what: &str) -> Result<Envelope<T>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(anyhow!("empty {what} response")).context(FailureKind::Decode);
    }
    serde_json::from_str(trimmed)
        .with_context(|| format!("invalid {what} json"))
        .context(FailureKind::Decode)
}

fn accepted_data<T>(envelope: Envelope<T>, what: &str) -> Result<T> {
    if envelope.success == Some(false) {
        return Err(rejected(
            error_message(envelope.error.as_ref())
                .unwrap_or_else(|| format!("{what} request failed")),
        ));
    }
    envelope
        .data
        .ok_or_else(|| anyhow!("{what} response has no data"))
        .context(FailureKind::Decode)
}

fn ensure_success(resp: &ApiResponse) -> Result<()> {
    if resp.is_success() {
        Ok(())
    } else {
        Err(rejected(http_failure_message(resp)))
    }
}

fn http_failure_message(resp: &ApiResponse) -> String {
    let detail = serde_json::from_str::<Value>(resp.body.trim())
        .ok()
        .and_then(|root| error_message(root.get("error")))
        .unwrap_or_else(|| resp.body.trim().to_string());
    if detail.is_empty() {
        format!("http {}", resp.status)
    } else {
        format!("http {}: {}", resp.status, detail)
    }
}

fn error_message(error: Option<&Value>) -> Option<String> {
    match error? {
        Value::String(msg) => Some(msg.clone()),
        Value::Object(obj) => obj
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

fn rejected(msg: impl Into<String>) -> anyhow::Error {
    anyhow!(msg.into()).context(FailureKind::Rejected)
}
