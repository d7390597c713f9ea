use std::fmt;

/// Notifications broadcast by the client to interested UI code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    /// The server answered 401; stored credentials have already been cleared.
    Expired,
}

impl AuthEvent {
    /// Stable event name, e.g. for forwarding to a frontend event bus.
    pub fn name(&self) -> &'static str {
        match self {
            AuthEvent::Expired => "auth-expired",
        }
    }
}

impl fmt::Display for AuthEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
