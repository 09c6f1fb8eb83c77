use chrono::{DateTime, Duration, Utc};

pub const SUCCESS_MESSAGE: &str = "Application submitted successfully!";
pub const TRANSPORT_FAILURE_MESSAGE: &str =
    "We could not reach the application service. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    TransportError,
}

/// Transient message shown above the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    kind: NoticeKind,
    message: &'static str,
    shown_at: DateTime<Utc>,
    auto_hide: Option<Duration>,
}

impl Notice {
    pub fn success(shown_at: DateTime<Utc>, auto_hide: Duration) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: SUCCESS_MESSAGE,
            shown_at,
            auto_hide: Some(auto_hide),
        }
    }

    /// Stays up until dismissed.
    pub fn transport_error(shown_at: DateTime<Utc>) -> Self {
        Self {
            kind: NoticeKind::TransportError,
            message: TRANSPORT_FAILURE_MESSAGE,
            shown_at,
            auto_hide: None,
        }
    }

    pub fn kind(&self) -> NoticeKind {
        self.kind
    }

    pub fn message(&self) -> &'static str {
        self.message
    }

    pub fn is_visible_at(&self, now: DateTime<Utc>) -> bool {
        match self.auto_hide {
            Some(duration) => self
                .shown_at
                .checked_add_signed(duration)
                .map_or(true, |hides_at| now < hides_at),
            None => true,
        }
    }
}
