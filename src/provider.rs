use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use crate::http_client::Transport;
use crate::roster_fetch::RosterClient;
use crate::state::{Delta, ProviderCommand};

/// Runs roster commands on a worker thread, one at a time and in the order
/// they arrive. The thread exits once every command sender is dropped.
pub fn spawn_provider<T>(
    client: RosterClient<T>,
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
) -> JoinHandle<()>
where
    T: Transport + 'static,
{
    thread::spawn(move || {
        for cmd in cmd_rx {
            handle_command(&client, cmd, &tx);
        }
    })
}

/// Failures are reported as `Delta::Log` lines and never reach the caller;
/// the store keeps its last good contents.
pub fn handle_command<T: Transport>(
    client: &RosterClient<T>,
    cmd: ProviderCommand,
    tx: &Sender<Delta>,
) {
    match cmd {
        ProviderCommand::FetchPlayers => refresh_players(client, tx),
        ProviderCommand::FetchPlayer { id } => match client.get_player(id) {
            Ok(player) => {
                let _ = tx.send(Delta::SetSelected(player));
            }
            Err(err) => {
                let _ = tx.send(Delta::Log(format!(
                    "[WARN] Trouble fetching player #{id}: {err:#}"
                )));
            }
        },
        ProviderCommand::CreatePlayer(new_player) => match client.create_player(&new_player) {
            Ok(created) => {
                let _ = tx.send(match created {
                    Some(player) => Delta::PlayerCreated {
                        name: player.name,
                        id: Some(player.id),
                    },
                    None => Delta::PlayerCreated {
                        name: new_player.name,
                        id: None,
                    },
                });
                refresh_players(client, tx);
            }
            Err(err) => {
                let _ = tx.send(Delta::Log(format!(
                    "[WARN] Something went wrong adding {}: {err:#}",
                    new_player.name
                )));
            }
        },
        ProviderCommand::RemovePlayer { id } => match client.delete_player(id) {
            Ok(()) => {
                let _ = tx.send(Delta::PlayerRemoved { id });
                refresh_players(client, tx);
            }
            Err(err) => {
                let _ = tx.send(Delta::Log(format!(
                    "[WARN] Trouble removing player #{id} from the roster: {err:#}"
                )));
            }
        },
    }
}

fn refresh_players<T: Transport>(client: &RosterClient<T>, tx: &Sender<Delta>) {
    match client.list_players() {
        Ok(players) => {
            let _ = tx.send(Delta::Log(format!("[INFO] Loaded {} players", players.len())));
            let _ = tx.send(Delta::SetPlayers(players));
        }
        Err(err) => {
            let _ = tx.send(Delta::Log(format!("[WARN] Trouble fetching players: {err:#}")));
        }
    }
}
