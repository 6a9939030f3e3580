pub mod events;
pub mod socket;
pub mod transcript;

pub use events::{decode_server_frame, encode_setup_frame, encode_user_text_frame, ServerEvent};
pub use socket::{
    live_connect_url, spawn_live_session, LiveSessionHandle, LiveSessionSpec, SessionCommand,
    SessionEvent,
};
pub use transcript::{Speaker, Transcript, TranscriptLine};

/// Connection state surfaced in the control tray.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Connecting,
    Connected,
    Reconnecting { attempt: u32 },
    Closed { reason: String },
}

impl SessionStatus {
    pub fn label(&self) -> String {
        match self {
            Self::Connecting => "connecting".to_string(),
            Self::Connected => "connected".to_string(),
            Self::Reconnecting { attempt } => format!("reconnecting (attempt {attempt})"),
            Self::Closed { reason } => format!("closed: {reason}"),
        }
    }

    pub fn apply_event(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::Connected => *self = Self::Connected,
            SessionEvent::Reconnecting { attempt } => {
                *self = Self::Reconnecting { attempt: *attempt };
            }
            SessionEvent::Closed { reason, .. } => {
                *self = Self::Closed {
                    reason: reason.clone(),
                };
            }
            SessionEvent::Delta(_) | SessionEvent::TurnComplete | SessionEvent::Interrupted => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{SessionEvent, SessionStatus};

    #[test]
    fn status_follows_lifecycle_events_and_ignores_content() {
        let mut status = SessionStatus::Connecting;
        status.apply_event(&SessionEvent::Connected);
        assert_eq!(status, SessionStatus::Connected);

        status.apply_event(&SessionEvent::Delta("hi".to_string()));
        assert_eq!(status, SessionStatus::Connected);

        status.apply_event(&SessionEvent::Reconnecting { attempt: 2 });
        assert_eq!(status.label(), "reconnecting (attempt 2)");

        status.apply_event(&SessionEvent::Closed {
            reason: "server closed the session".to_string(),
            retryable: true,
        });
        assert!(status.label().starts_with("closed:"));
    }
}
