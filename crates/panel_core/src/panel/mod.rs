//! Panel view model.
//!
//! Holds everything the control page shows: the server status labels, the
//! player list, the three input fields with their validation state, the
//! restart badge and the log window. Handlers mutate it; the terminal front
//! end renders it.

pub mod actions;
pub mod handlers;
pub mod status;

pub use actions::Action;
pub use handlers::{install_endpoints, start_polling};
pub use status::{FullStatus, PlayerData};

use crate::api::{ApiDispatcher, CallOutcome};
use crate::error::PanelError;
use crate::log::{LogItem, LogSink, LogWindow};
use async_trait::async_trait;
use std::ops::RangeInclusive;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Panel state shared between handlers, the log client and the renderer.
pub type SharedPanel = Arc<RwLock<PanelState>>;

/// Validation state of an input field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldState {
    #[default]
    Neutral,
    Success,
    Error,
}

/// Appearance of the send button next to the message field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ButtonState {
    #[default]
    Brand,
    Success,
    Error,
}

/// A single-line text input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputField {
    pub value: String,
    pub state: FieldState,
}

impl InputField {
    /// Clears the value and the validation state.
    pub fn reset(&mut self) {
        self.value.clear();
        self.state = FieldState::Neutral;
    }
}

/// Checks a message length and updates the field and send button to match.
pub fn verify_message(field: &mut InputField, button: &mut ButtonState, len: &RangeInclusive<usize>) {
    if len.contains(&field.value.chars().count()) {
        field.state = FieldState::Success;
        *button = ButtonState::Success;
    } else {
        field.state = FieldState::Error;
        *button = ButtonState::Error;
    }
}

/// Server status as displayed in the status block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusView {
    pub world_name: String,
    pub online: bool,
    pub seed: String,
    pub motd: String,
    pub password: String,
    pub players: Vec<PlayerData>,
    pub player_count: usize,
    pub loglevel: i64,
    pub version: String,
    /// Whether any full status has been received yet
    pub loaded: bool,
}

impl StatusView {
    /// Replaces the view with a freshly received status.
    pub fn apply(&mut self, status: FullStatus) {
        *self = Self {
            world_name: status.world_name,
            online: status.online,
            seed: status.seed,
            motd: status.motd,
            password: status.password,
            players: status.players,
            player_count: status.player_count,
            loglevel: status.loglevel,
            version: status.version,
            loaded: true,
        };
    }

    pub fn seed_label(&self) -> String {
        format!("World Seed: {}", self.seed)
    }

    pub fn motd_label(&self) -> String {
        format!("Message of the Day: {}", self.motd)
    }

    pub fn password_label(&self, hidden: bool) -> String {
        if hidden {
            format!("Password: {}", "*".repeat(self.password.chars().count()))
        } else {
            format!("Password: {}", self.password)
        }
    }

    pub fn player_count_label(&self) -> String {
        format!("Players: {}", self.player_count)
    }
}

/// Which input field a submission targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Message,
    Motd,
    Password,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Message, Field::Motd, Field::Password];

    pub fn label(self) -> &'static str {
        match self {
            Field::Message => "Message",
            Field::Motd => "MOTD",
            Field::Password => "Password",
        }
    }

    /// Action that submits this field.
    pub fn action(self) -> Action {
        match self {
            Field::Message => Action::Say,
            Field::Motd => Action::Motd,
            Field::Password => Action::Password,
        }
    }
}

/// Everything the control page shows.
#[derive(Debug, Clone)]
pub struct PanelState {
    pub status: StatusView,
    pub message: InputField,
    pub motd: InputField,
    pub password: InputField,
    pub send_button: ButtonState,
    /// Set while a restart request is in flight
    pub restart_busy: bool,
    pub password_hidden: bool,
    pub log: LogWindow,
}

impl PanelState {
    pub fn new(log_capacity: usize) -> Self {
        Self {
            status: StatusView::default(),
            message: InputField::default(),
            motd: InputField::default(),
            password: InputField::default(),
            send_button: ButtonState::default(),
            restart_busy: false,
            password_hidden: true,
            log: LogWindow::new(log_capacity),
        }
    }

    /// Wraps a new panel for sharing.
    pub fn shared(log_capacity: usize) -> SharedPanel {
        Arc::new(RwLock::new(Self::new(log_capacity)))
    }

    pub fn field(&self, field: Field) -> &InputField {
        match field {
            Field::Message => &self.message,
            Field::Motd => &self.motd,
            Field::Password => &self.password,
        }
    }

    pub fn field_mut(&mut self, field: Field) -> &mut InputField {
        match field {
            Field::Message => &mut self.message,
            Field::Motd => &mut self.motd,
            Field::Password => &mut self.password,
        }
    }

    /// Revalidates the chat message against the allowed length.
    pub fn verify_message(&mut self, len: &RangeInclusive<usize>) {
        verify_message(&mut self.message, &mut self.send_button, len);
    }
}

#[async_trait]
impl LogSink for SharedPanel {
    async fn append(&self, item: LogItem) {
        self.write().await.log.append(item);
    }
}

impl ApiDispatcher {
    /// Invokes a known [`Action`].
    pub async fn call_action(
        &self,
        action: Action,
        arg: Option<&str>,
    ) -> Result<CallOutcome, PanelError> {
        self.call(action.scope(), action.object(), arg).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_message_length_bounds() {
        let mut field = InputField::default();
        let mut button = ButtonState::Brand;

        verify_message(&mut field, &mut button, &(1..=5));
        assert_eq!(field.state, FieldState::Error);
        assert_eq!(button, ButtonState::Error);

        field.value = "héllo".to_string();
        verify_message(&mut field, &mut button, &(1..=5));
        assert_eq!(field.state, FieldState::Success);
        assert_eq!(button, ButtonState::Success);

        field.value.push('!');
        verify_message(&mut field, &mut button, &(1..=5));
        assert_eq!(field.state, FieldState::Error);
        assert_eq!(button, ButtonState::Error);
    }

    #[test]
    fn test_apply_replaces_player_list() {
        let mut view = StatusView::default();
        view.apply(FullStatus {
            players: vec![
                PlayerData { name: "Alice".into(), ip: "10.0.0.2".into() },
                PlayerData { name: "Bob".into(), ip: "10.0.0.3".into() },
            ],
            player_count: 2,
            seed: "s33d".into(),
            ..Default::default()
        });
        assert!(view.loaded);
        assert_eq!(view.players.len(), 2);
        assert_eq!(view.seed_label(), "World Seed: s33d");
        assert_eq!(view.player_count_label(), "Players: 2");

        view.apply(FullStatus {
            players: vec![PlayerData { name: "Bob".into(), ip: "10.0.0.3".into() }],
            player_count: 1,
            ..Default::default()
        });
        assert_eq!(view.players.len(), 1);
        assert_eq!(view.players[0].name, "Bob");
        assert_eq!(view.seed, "");
    }

    #[test]
    fn test_password_label_masking() {
        let view = StatusView {
            password: "hunter2".into(),
            ..Default::default()
        };
        assert_eq!(view.password_label(false), "Password: hunter2");
        assert_eq!(view.password_label(true), "Password: *******");
    }

    #[tokio::test]
    async fn test_shared_panel_is_a_log_sink() {
        let panel = PanelState::shared(10);
        panel
            .append(LogItem::Notice("Connection closed.".into()))
            .await;
        assert_eq!(panel.read().await.log.len(), 1);
    }
}
