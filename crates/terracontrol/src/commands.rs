//! One-shot actions run straight from the command line.
//!
//! Each command goes through the same dispatcher and hooks as the
//! interactive panel, waits for the response and prints it.

use crate::cli::Command;
use crate::session::Session;
use anyhow::{bail, Result};
use panel_core::api::StatusClass;
use panel_core::panel::{Field, StatusView};
use panel_core::{Action, PanelConfig};
use tracing::debug;

/// What a command sends: the action, its path argument and any field text
/// the handler reads through its data hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    pub action: Action,
    pub arg: Option<String>,
    pub field: Option<(Field, String)>,
}

impl ActionRequest {
    fn bare(action: Action) -> Self {
        Self {
            action,
            arg: None,
            field: None,
        }
    }

    fn with_arg(action: Action, arg: impl Into<String>) -> Self {
        Self {
            arg: Some(arg.into()),
            ..Self::bare(action)
        }
    }

    fn with_field(action: Action, field: Field, text: String) -> Self {
        Self {
            field: Some((field, text)),
            ..Self::bare(action)
        }
    }

    /// Maps a one-shot command to its request. Interactive modes map to none.
    pub fn from_command(command: &Command) -> Option<Self> {
        let request = match command {
            Command::Panel | Command::Tail => return None,
            Command::Status => Self::bare(Action::FullStatus),
            Command::Say { text } => Self::with_field(Action::Say, Field::Message, text.join(" ")),
            Command::Motd { text } => Self::with_field(Action::Motd, Field::Motd, text.join(" ")),
            Command::Password { text } => Self::with_field(
                Action::Password,
                Field::Password,
                text.clone().unwrap_or_default(),
            ),
            Command::Kick { player } => Self::with_arg(Action::Kick, player),
            Command::Ban { player } => Self::with_arg(Action::Ban, player),
            Command::Start => Self::bare(Action::Start),
            Command::Stop => Self::bare(Action::Stop),
            Command::Restart => Self::bare(Action::Restart),
            Command::ServerStatus => Self::bare(Action::Status),
            Command::Time { time } => match time {
                Some(time) => Self::with_arg(Action::Time, time.as_str()),
                None => Self::bare(Action::Time),
            },
            Command::Settle => Self::bare(Action::Settle),
        };
        Some(request)
    }
}

/// Runs a one-shot command and prints the server's answer.
///
/// Fails when the call is refused before sending, when no response arrives
/// or when the server answers outside the 2xx range.
pub async fn run_action(config: &PanelConfig, command: &Command) -> Result<()> {
    let Some(request) = ActionRequest::from_command(command) else {
        bail!("{command:?} is not a one-shot command");
    };
    let session = Session::open(config).await?;

    if let Some((field, text)) = &request.field {
        let mut panel = session.panel.write().await;
        panel.field_mut(*field).value = text.clone();
        if *field == Field::Message {
            panel.verify_message(&config.message_len);
        }
    }

    let outcome = session
        .dispatcher
        .call_action(request.action, request.arg.as_deref())
        .await?;
    if outcome.is_blocked() {
        if request.action == Action::Say {
            bail!(
                "message must be between {} and {} characters",
                config.message_len.start(),
                config.message_len.end()
            );
        }
        bail!("{} was refused before sending", request.action);
    }
    outcome.finished().await;

    let exchange = session
        .dispatcher
        .exchange(request.action.scope(), request.action.object())
        .await
        .unwrap_or_default();
    debug!("Exchange for {}: {:?}", request.action, exchange);

    let Some(status) = exchange.status else {
        bail!("{} failed: no response from {}", request.action, config.base_url);
    };
    if StatusClass::from_code(status) != Some(StatusClass::Success) {
        bail!("{} returned HTTP {}", request.action, status);
    }

    if request.action == Action::FullStatus {
        let panel = session.panel.read().await;
        print!("{}", render_status(&panel.status));
    } else {
        println!("{}: {}", request.action, status);
        if let Some(body) = exchange.body.filter(|body| !body.trim().is_empty()) {
            println!("{}", body.trim_end());
        }
    }
    Ok(())
}

/// Plain-text rendering of the full status for the `status` command.
pub fn render_status(status: &StatusView) -> String {
    let mut out = String::new();
    let state = if status.online { "online" } else { "offline" };
    out.push_str(&format!("{} ({state}) v{}\n", status.world_name, status.version));
    out.push_str(&format!("{}\n", status.seed_label()));
    out.push_str(&format!("{}\n", status.motd_label()));
    out.push_str(&format!("{}\n", status.password_label(true)));
    out.push_str(&format!("{}\n", status.player_count_label()));
    for player in &status.players {
        out.push_str(&format!("  {} ({})\n", player.name, player.ip));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::TimeOfDay;
    use panel_core::panel::PlayerData;

    #[test]
    fn test_interactive_commands_have_no_request() {
        assert!(ActionRequest::from_command(&Command::Panel).is_none());
        assert!(ActionRequest::from_command(&Command::Tail).is_none());
    }

    #[test]
    fn test_command_mapping() {
        let say = ActionRequest::from_command(&Command::Say {
            text: vec!["hello".into(), "there".into()],
        })
        .unwrap();
        assert_eq!(say.action, Action::Say);
        assert_eq!(say.field, Some((Field::Message, "hello there".to_string())));
        assert!(say.arg.is_none());

        let kick = ActionRequest::from_command(&Command::Kick {
            player: "Alice".into(),
        })
        .unwrap();
        assert_eq!(kick.action, Action::Kick);
        assert_eq!(kick.arg.as_deref(), Some("Alice"));

        let time = ActionRequest::from_command(&Command::Time {
            time: Some(TimeOfDay::Midnight),
        })
        .unwrap();
        assert_eq!(time.arg.as_deref(), Some("midnight"));

        let query = ActionRequest::from_command(&Command::Motd { text: vec![] }).unwrap();
        assert_eq!(query.field, Some((Field::Motd, String::new())));

        assert_eq!(
            ActionRequest::from_command(&Command::ServerStatus).unwrap().action,
            Action::Status
        );
        assert_eq!(
            ActionRequest::from_command(&Command::Status).unwrap().action,
            Action::FullStatus
        );
    }

    #[tokio::test]
    async fn test_unreachable_server_reports_no_response() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = PanelConfig::new(url::Url::parse(&format!("http://{addr}")).unwrap());
        let err = run_action(&config, &Command::Stop).await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("no response"), "unexpected error: {message}");
    }

    #[tokio::test]
    async fn test_overlong_say_is_refused_before_sending() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut config = PanelConfig::new(url::Url::parse(&format!("http://{addr}")).unwrap());
        config.message_len = 1..=4;
        let command = Command::Say {
            text: vec!["far".into(), "too".into(), "long".into()],
        };
        let err = run_action(&config, &command).await.unwrap_err();
        assert_eq!(err.to_string(), "message must be between 1 and 4 characters");
    }

    #[test]
    fn test_render_status_masks_password() {
        let status = StatusView {
            world_name: "Avorion".into(),
            online: true,
            seed: "x7Fq2".into(),
            password: "secret".into(),
            players: vec![PlayerData {
                name: "Alice".into(),
                ip: "10.0.0.2".into(),
            }],
            player_count: 1,
            version: "2.0".into(),
            loaded: true,
            ..Default::default()
        };
        let text = render_status(&status);
        assert!(text.starts_with("Avorion (online) v2.0\n"));
        assert!(text.contains("Password: ******\n"));
        assert!(!text.contains("secret"));
        assert!(text.contains("  Alice (10.0.0.2)\n"));
    }
}
