use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

pub type PlayerId = u64;

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub breed: String,
    pub image_url: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Body of a create request. Every field is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlayer {
    pub name: String,
    pub breed: String,
    pub description: String,
    pub image_url: String,
}

impl NewPlayer {
    /// Returns the wire name of the first blank field, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        [
            ("breed", &self.breed),
            ("name", &self.name),
            ("description", &self.description),
            ("imageUrl", &self.image_url),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
    }
}

#[derive(Debug, Clone)]
pub struct RosterState {
    /// Last list the server returned, in server order.
    pub players: Vec<Player>,
    pub selected: Option<Player>,
    /// Highlighted row in the lineup.
    pub cursor: usize,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl Default for RosterState {
    fn default() -> Self {
        Self::new()
    }
}

impl RosterState {
    pub fn new() -> Self {
        Self {
            players: Vec::with_capacity(32),
            selected: None,
            cursor: 0,
            logs: VecDeque::with_capacity(MAX_LOGS),
            help_overlay: false,
        }
    }

    pub fn cursor_player(&self) -> Option<&Player> {
        self.players.get(self.cursor)
    }

    pub fn selected_id(&self) -> Option<PlayerId> {
        self.selected.as_ref().map(|p| p.id)
    }

    pub fn select_next(&mut self) {
        if self.players.is_empty() {
            self.cursor = 0;
            return;
        }
        self.cursor = (self.cursor + 1).min(self.players.len() - 1);
    }

    pub fn select_prev(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn clamp_cursor(&mut self) {
        if self.players.is_empty() {
            self.cursor = 0;
        } else if self.cursor >= self.players.len() {
            self.cursor = self.players.len() - 1;
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delta {
    SetPlayers(Vec<Player>),
    SetSelected(Player),
    PlayerRemoved { id: PlayerId },
    /// The server accepted a new player. `id` is set when it echoed the record.
    PlayerCreated { name: String, id: Option<PlayerId> },
    Log(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCommand {
    FetchPlayers,
    FetchPlayer { id: PlayerId },
    CreatePlayer(NewPlayer),
    RemovePlayer { id: PlayerId },
}

pub fn apply_delta(state: &mut RosterState, delta: Delta) {
    match delta {
        Delta::SetPlayers(players) => {
            state.players = players;
            if let Some(id) = state.selected_id() {
                if !state.players.iter().any(|p| p.id == id) {
                    state.selected = None;
                    state.push_log(format!("[INFO] Player #{id} is no longer on the roster"));
                }
            }
            state.clamp_cursor();
        }
        Delta::SetSelected(player) => {
            if let Some(idx) = state.players.iter().position(|p| p.id == player.id) {
                state.cursor = idx;
            }
            state.selected = Some(player);
        }
        Delta::PlayerRemoved { id } => {
            if state.selected_id() == Some(id) {
                state.selected = None;
            }
            state.push_log(format!("[INFO] Removed player #{id} from the roster"));
        }
        Delta::PlayerCreated { name, id } => match id {
            Some(id) => state.push_log(format!("[INFO] Invited {name} (#{id})")),
            None => state.push_log(format!("[INFO] Invited {name}")),
        },
        Delta::Log(msg) => state.push_log(msg),
    }
}
