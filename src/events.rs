use crate::form::NewPlayerForm;
use crate::state::{Delta, ProviderCommand, RosterState};
use crate::view::Action;

/// Turns a view action into the command the provider should run. The view
/// is rebuilt once the resulting deltas land, not here.
pub fn dispatch(
    action: Action,
    form: &mut NewPlayerForm,
    state: &mut RosterState,
) -> Option<ProviderCommand> {
    match action {
        Action::Refresh => Some(ProviderCommand::FetchPlayers),
        Action::SelectPlayer(id) => Some(ProviderCommand::FetchPlayer { id }),
        Action::RemovePlayer(id) => Some(ProviderCommand::RemovePlayer { id }),
        Action::SubmitNewPlayer => match form.submit() {
            Ok(new_player) => {
                state.push_log(format!("[INFO] Inviting {}", new_player.name));
                Some(ProviderCommand::CreatePlayer(new_player))
            }
            Err(missing) => {
                state.push_log(format!("[WARN] {} is required", missing.label()));
                None
            }
        },
    }
}

/// Action bound to the highlighted lineup entry.
pub fn cursor_action(state: &RosterState) -> Option<Action> {
    state.cursor_player().map(|p| Action::SelectPlayer(p.id))
}

/// Remove applies to the player shown in the details card.
pub fn remove_action(state: &RosterState) -> Option<Action> {
    state.selected_id().map(Action::RemovePlayer)
}

/// A created player empties the form. Failed creates leave the draft as typed.
pub fn settle_form(delta: &Delta, form: &mut NewPlayerForm) {
    if let Delta::PlayerCreated { .. } = delta {
        form.reset();
    }
}
