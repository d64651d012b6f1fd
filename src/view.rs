//! View tree for the roster screen.
//!
//! Every `render_*` function reads the store and returns a freshly built
//! tree. Callers swap the whole tree on each render, so nodes from an older
//! render never linger next to newer ones.

use chrono::DateTime;

use crate::form::{FormField, NewPlayerForm};
use crate::state::{Player, PlayerId, RosterState};

pub const APP_TITLE: &str = "Puppy Bowl";
pub const LINEUP_ID: &str = "lineup";
pub const SELECTED_ID: &str = "selected";
pub const FORM_ID: &str = "new-player-form";
pub const EMPTY_ROSTER_TEXT: &str = "No players on the roster yet.";
pub const NO_SELECTION_TEXT: &str = "Choose your character!";
pub const UNASSIGNED_TEAM: &str = "Unassigned";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Root,
    Heading(u8),
    Section,
    List,
    ListItem,
    Link,
    Paragraph,
    Figure,
    Image,
    Button,
    Form,
    Label,
    Input,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Refresh,
    SelectPlayer(PlayerId),
    RemovePlayer(PlayerId),
    SubmitNewPlayer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewNode {
    pub tag: Tag,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub text: Option<String>,
    pub attrs: Vec<(String, String)>,
    pub action: Option<Action>,
    pub children: Vec<ViewNode>,
}

impl ViewNode {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            id: None,
            classes: Vec::new(),
            text: None,
            attrs: Vec::new(),
            action: None,
            children: Vec::new(),
        }
    }

    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Self::new(Tag::Heading(level)).with_text(text)
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::new(Tag::Paragraph).with_text(text)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    pub fn on(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    pub fn child(mut self, child: ViewNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = ViewNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Pre-order walk over this node and all of its descendants.
    pub fn walk(&self) -> Vec<&ViewNode> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(node.children.iter().rev());
        }
        out
    }

    pub fn find_by_id(&self, id: &str) -> Option<&ViewNode> {
        self.walk()
            .into_iter()
            .find(|node| node.id.as_deref() == Some(id))
    }

    pub fn find_all(&self, pred: impl Fn(&ViewNode) -> bool) -> Vec<&ViewNode> {
        self.walk().into_iter().filter(|node| pred(*node)).collect()
    }

    pub fn actions(&self) -> Vec<Action> {
        self.walk().into_iter().filter_map(|node| node.action).collect()
    }

    pub fn text_content(&self) -> String {
        self.walk()
            .into_iter()
            .filter_map(|node| node.text.as_deref())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

pub fn render_all(state: &RosterState, form: &NewPlayerForm) -> ViewNode {
    let lineup = ViewNode::new(Tag::Section)
        .with_id(LINEUP_ID)
        .child(ViewNode::heading(2, "Lineup"))
        .child(player_list(&state.players))
        .child(ViewNode::heading(3, "Invite a new Player"))
        .child(render_form(form));

    let details = ViewNode::new(Tag::Section)
        .with_id(SELECTED_ID)
        .child(ViewNode::heading(2, "Player Details"))
        .child(render_selected(state));

    ViewNode::new(Tag::Root)
        .with_id("main")
        .child(ViewNode::heading(1, APP_TITLE))
        .child(lineup)
        .child(details)
}

pub fn player_list(players: &[Player]) -> ViewNode {
    if players.is_empty() {
        return ViewNode::paragraph(EMPTY_ROSTER_TEXT).with_class("empty");
    }
    ViewNode::new(Tag::List)
        .with_class("lineup")
        .children(players.iter().map(player_list_item))
}

fn player_list_item(player: &Player) -> ViewNode {
    ViewNode::new(Tag::ListItem).child(
        ViewNode::new(Tag::Link)
            .with_text(player.name.clone())
            .with_attr("href", format!("#{SELECTED_ID}"))
            .on(Action::SelectPlayer(player.id)),
    )
}

pub fn render_selected(state: &RosterState) -> ViewNode {
    let Some(player) = state.selected.as_ref() else {
        return ViewNode::paragraph(NO_SELECTION_TEXT).with_class("placeholder");
    };

    let team = player
        .team_name
        .clone()
        .unwrap_or_else(|| UNASSIGNED_TEAM.to_string());

    let mut card = ViewNode::new(Tag::Section)
        .with_class("player")
        .child(ViewNode::heading(3, format!("{} #{}", player.name, player.id)))
        .child(
            ViewNode::new(Tag::Figure).child(
                ViewNode::new(Tag::Image)
                    .with_attr("src", player.image_url.clone())
                    .with_attr("alt", player.name.clone()),
            ),
        )
        .child(ViewNode::paragraph(player.breed.clone()).with_class("breed"))
        .child(ViewNode::paragraph(player.status.clone()).with_class("status"))
        .child(ViewNode::paragraph(team).with_class("team"));

    if let Some(joined) = player.created_at.as_deref().and_then(format_joined) {
        card = card.child(ViewNode::paragraph(format!("Joined {joined}")).with_class("joined"));
    }

    card.child(
        ViewNode::new(Tag::Button)
            .with_text("Remove player")
            .on(Action::RemovePlayer(player.id)),
    )
}

pub fn render_form(form: &NewPlayerForm) -> ViewNode {
    let fields = FormField::ALL.into_iter().map(|field| {
        let mut input = ViewNode::new(Tag::Input)
            .with_attr("name", field.input_name())
            .with_attr("value", form.value(field))
            .with_attr("required", "true");
        if form.active && form.focus == field {
            input = input.with_class("focused");
        }
        ViewNode::new(Tag::Label)
            .with_text(field.label())
            .child(input)
    });

    ViewNode::new(Tag::Form)
        .with_id(FORM_ID)
        .children(fields)
        .child(
            ViewNode::new(Tag::Button)
                .with_text("Invite New Player")
                .on(Action::SubmitNewPlayer),
        )
}

/// `2025-09-01T12:30:00.000Z` becomes `2025-09-01`.
pub fn format_joined(raw: &str) -> Option<String> {
    let cleaned = raw.trim();
    if cleaned.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(cleaned) {
        return Some(dt.format("%Y-%m-%d").to_string());
    }
    Some(cleaned.chars().take(10).collect())
}
