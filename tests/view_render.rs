use roster_terminal::events::{cursor_action, dispatch, remove_action, settle_form};
use roster_terminal::form::{FormField, NewPlayerForm};
use roster_terminal::state::{Delta, Player, ProviderCommand, RosterState, apply_delta};
use roster_terminal::view::{
    self, Action, EMPTY_ROSTER_TEXT, FORM_ID, LINEUP_ID, NO_SELECTION_TEXT, SELECTED_ID, Tag,
    UNASSIGNED_TEAM, ViewNode,
};

fn player(id: u64, name: &str) -> Player {
    Player {
        id,
        name: name.to_string(),
        breed: "Mixed".to_string(),
        image_url: format!("https://img.test/{id}.png"),
        status: "bench".to_string(),
        team_name: None,
        created_at: None,
    }
}

fn entries(root: &ViewNode) -> Vec<&ViewNode> {
    root.find_by_id(LINEUP_ID)
        .expect("lineup section")
        .find_all(|node| node.tag == Tag::ListItem)
}

#[test]
fn empty_roster_renders_empty_state() {
    let state = RosterState::new();
    let root = view::render_all(&state, &NewPlayerForm::new());

    let lineup = root.find_by_id(LINEUP_ID).expect("lineup section");
    let empty = lineup.find_all(|node| node.has_class("empty"));
    assert_eq!(empty.len(), 1);
    assert_eq!(empty[0].text.as_deref(), Some(EMPTY_ROSTER_TEXT));
    assert!(lineup.find_all(|node| node.tag == Tag::List).is_empty());
}

#[test]
fn two_players_render_two_entries_on_every_render() {
    let mut state = RosterState::new();
    apply_delta(
        &mut state,
        Delta::SetPlayers(vec![player(1, "Fido"), player(2, "Rex")]),
    );
    let form = NewPlayerForm::new();

    let first = view::render_all(&state, &form);
    let second = view::render_all(&state, &form);

    for root in [&first, &second] {
        let items = entries(root);
        assert_eq!(items.len(), 2);
        let names = items
            .iter()
            .map(|item| item.text_content())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Fido", "Rex"]);
    }
    assert_eq!(first, second);
}

#[test]
fn list_entries_select_their_player() {
    let mut state = RosterState::new();
    apply_delta(
        &mut state,
        Delta::SetPlayers(vec![player(1, "Fido"), player(2, "Rex")]),
    );
    let list = view::player_list(&state.players);

    assert!(list.has_class("lineup"));
    assert_eq!(
        list.actions(),
        vec![Action::SelectPlayer(1), Action::SelectPlayer(2)]
    );
}

#[test]
fn no_selection_renders_placeholder() {
    let state = RosterState::new();
    let node = view::render_selected(&state);

    assert_eq!(node.tag, Tag::Paragraph);
    assert_eq!(node.text.as_deref(), Some(NO_SELECTION_TEXT));
    assert!(node.actions().is_empty());
}

#[test]
fn selected_card_shows_details_and_remove_action() {
    let mut state = RosterState::new();
    let mut fido = player(7, "Fido");
    fido.breed = "Labrador".to_string();
    fido.status = "field".to_string();
    fido.created_at = Some("2025-09-01T12:30:00.000Z".to_string());
    apply_delta(&mut state, Delta::SetSelected(fido));

    let root = view::render_all(&state, &NewPlayerForm::new());
    let card = root
        .find_by_id(SELECTED_ID)
        .expect("details section")
        .find_all(|node| node.has_class("player"))
        .into_iter()
        .next()
        .expect("player card");

    let text = card.text_content();
    assert!(text.contains("Fido #7"));
    assert!(text.contains("Labrador"));
    assert!(text.contains("field"));
    assert!(text.contains(UNASSIGNED_TEAM));
    assert!(text.contains("Joined 2025-09-01"));

    let image = card.find_all(|node| node.tag == Tag::Image);
    assert_eq!(image.len(), 1);
    assert_eq!(image[0].attr("alt"), Some("Fido"));
    assert_eq!(image[0].attr("src"), Some("https://img.test/7.png"));

    assert_eq!(card.actions(), vec![Action::RemovePlayer(7)]);
}

#[test]
fn team_name_replaces_unassigned() {
    let mut state = RosterState::new();
    let mut rex = player(2, "Rex");
    rex.team_name = Some("Ruff".to_string());
    apply_delta(&mut state, Delta::SetSelected(rex));

    let text = view::render_selected(&state).text_content();
    assert!(text.contains("Ruff"));
    assert!(!text.contains(UNASSIGNED_TEAM));
}

#[test]
fn form_has_four_required_inputs_and_submit() {
    let root = view::render_all(&RosterState::new(), &NewPlayerForm::new());
    let form = root.find_by_id(FORM_ID).expect("form");

    let inputs = form.find_all(|node| node.tag == Tag::Input);
    let names = inputs
        .iter()
        .filter_map(|node| node.attr("name"))
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["breed", "name", "description", "imageUrl"]);
    assert!(inputs.iter().all(|node| node.attr("required") == Some("true")));
    assert_eq!(form.actions(), vec![Action::SubmitNewPlayer]);
}

#[test]
fn active_form_marks_focused_input() {
    let mut form = NewPlayerForm::new();
    form.active = true;
    form.focus_next();
    form.push_char('R');

    let node = view::render_form(&form);
    let focused = node.find_all(|n| n.has_class("focused"));
    assert_eq!(focused.len(), 1);
    assert_eq!(focused[0].attr("name"), Some("name"));
    assert_eq!(focused[0].attr("value"), Some("R"));
}

#[test]
fn format_joined_handles_rfc3339_and_fallback() {
    assert_eq!(
        view::format_joined("2025-09-01T12:30:00.000Z").as_deref(),
        Some("2025-09-01")
    );
    assert_eq!(
        view::format_joined("2025-09-01 junk").as_deref(),
        Some("2025-09-01")
    );
    assert!(view::format_joined("  ").is_none());
}

#[test]
fn refresh_select_and_remove_dispatch_to_provider_commands() {
    let mut state = RosterState::new();
    let mut form = NewPlayerForm::new();

    assert_eq!(
        dispatch(Action::Refresh, &mut form, &mut state),
        Some(ProviderCommand::FetchPlayers)
    );
    assert_eq!(
        dispatch(Action::SelectPlayer(4), &mut form, &mut state),
        Some(ProviderCommand::FetchPlayer { id: 4 })
    );
    assert_eq!(
        dispatch(Action::RemovePlayer(4), &mut form, &mut state),
        Some(ProviderCommand::RemovePlayer { id: 4 })
    );
}

#[test]
fn submit_with_blank_field_sends_nothing() {
    let mut state = RosterState::new();
    let mut form = NewPlayerForm::new();
    form.set_value(FormField::Breed, "Beagle");
    form.set_value(FormField::Name, "Pepper");
    form.set_value(FormField::ImageUrl, "https://img.test/p.png");

    let cmd = dispatch(Action::SubmitNewPlayer, &mut form, &mut state);

    assert!(cmd.is_none());
    assert_eq!(form.focus, FormField::Description);
    assert_eq!(form.value(FormField::Name), "Pepper");
    assert!(
        state
            .logs
            .back()
            .is_some_and(|line| line.contains("Description is required"))
    );
}

#[test]
fn submit_with_all_fields_sends_create_and_keeps_draft_until_accepted() {
    let mut state = RosterState::new();
    let mut form = NewPlayerForm::new();
    form.active = true;
    form.set_value(FormField::Breed, " Beagle ");
    form.set_value(FormField::Name, "Pepper");
    form.set_value(FormField::Description, "Fast");
    form.set_value(FormField::ImageUrl, "https://img.test/p.png");

    let cmd = dispatch(Action::SubmitNewPlayer, &mut form, &mut state);

    let new_player = match cmd {
        Some(ProviderCommand::CreatePlayer(new_player)) => new_player,
        other => panic!("expected a create command, got {other:?}"),
    };
    assert_eq!(new_player.breed, "Beagle");
    assert_eq!(new_player.name, "Pepper");
    assert!(form.active);
    assert_eq!(form.value(FormField::Name), "Pepper");

    settle_form(&Delta::Log("[WARN] create failed".to_string()), &mut form);
    assert_eq!(form.value(FormField::Name), "Pepper");

    settle_form(
        &Delta::PlayerCreated {
            name: "Pepper".to_string(),
            id: Some(9),
        },
        &mut form,
    );
    assert!(!form.active);
    assert_eq!(form.value(FormField::Name), "");
    assert_eq!(form.focus, FormField::Breed);
}

#[test]
fn cursor_and_remove_actions_follow_state() {
    let mut state = RosterState::new();
    assert!(cursor_action(&state).is_none());
    assert!(remove_action(&state).is_none());

    apply_delta(
        &mut state,
        Delta::SetPlayers(vec![player(1, "Fido"), player(2, "Rex")]),
    );
    state.select_next();
    assert_eq!(cursor_action(&state), Some(Action::SelectPlayer(2)));

    apply_delta(&mut state, Delta::SetSelected(player(1, "Fido")));
    assert_eq!(remove_action(&state), Some(Action::RemovePlayer(1)));
}
