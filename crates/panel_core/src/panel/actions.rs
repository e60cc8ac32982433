//! The remote actions the panel knows about.

/// One known endpoint of the administration backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    FullStatus,
    Kick,
    Ban,
    Say,
    Stop,
    Motd,
    Time,
    Start,
    Status,
    Settle,
    Restart,
    Password,
}

impl Action {
    pub const ALL: [Action; 12] = [
        Action::FullStatus,
        Action::Kick,
        Action::Ban,
        Action::Say,
        Action::Stop,
        Action::Motd,
        Action::Time,
        Action::Start,
        Action::Status,
        Action::Settle,
        Action::Restart,
        Action::Password,
    ];

    pub fn scope(self) -> &'static str {
        match self {
            Action::FullStatus => "ajax",
            Action::Kick | Action::Ban => "player",
            _ => "server",
        }
    }

    pub fn object(self) -> &'static str {
        match self {
            Action::FullStatus => "fullstatus",
            Action::Kick => "kick",
            Action::Ban => "ban",
            Action::Say => "say",
            Action::Stop => "stop",
            Action::Motd => "motd",
            Action::Time => "time",
            Action::Start => "start",
            Action::Status => "status",
            Action::Settle => "settle",
            Action::Restart => "restart",
            Action::Password => "password",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.scope(), self.object())
    }
}
