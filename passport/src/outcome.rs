//! Presentation-independent side effects of a failed call.
//!
//! The client never drives a UI directly. It describes what should happen
//! (a notice to show, a route to go to) and the calling layer decides how.
//! A [`SessionEvents`] sink can be attached to the client to receive these as
//! they happen, in order.

use std::fmt;

use serde::Serialize;
use tracing::{info, warn};

/// Where the calling layer should navigate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Route {
    /// Landing page of the application.
    Home,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoticeKind {
    SessionExpired,
}

/// A user-visible notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn session_expired() -> Self {
        Self {
            kind: NoticeKind::SessionExpired,
            title: "Session Expired".into(),
            message: "Your session has expired. Please log in again.".into(),
        }
    }
}

/// `{status, redirect?, notify?}` for a failed call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub status: Option<u16>,
    pub redirect: Option<Route>,
    pub notify: Option<Notice>,
}

impl Outcome {
    /// True when the failure needs no handling beyond reporting it.
    pub fn is_passthrough(&self) -> bool {
        self.redirect.is_none() && self.notify.is_none()
    }
}

/// Receives session side effects as the client produces them.
///
/// Calls are synchronous and complete before the failing request returns.
/// For an expired session the order is always `notify` then `navigate`.
pub trait SessionEvents: Send + Sync {
    fn notify(&self, notice: &Notice);
    fn navigate(&self, route: Route);
}

/// Default sink: records the effects in the log and does nothing else.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEvents;

impl SessionEvents for LogEvents {
    fn notify(&self, notice: &Notice) {
        warn!(kind = ?notice.kind, title = %notice.title, "{}", notice.message);
    }

    fn navigate(&self, route: Route) {
        info!(route = %route, "redirect requested");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_path() {
        assert_eq!(Route::Home.path(), "/");
        assert_eq!(Route::Home.to_string(), "/");
    }

    #[test]
    fn test_outcome_serializes_kebab_case() {
        let outcome = Outcome {
            status: Some(401),
            redirect: Some(Route::Home),
            notify: Some(Notice::session_expired()),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["redirect"], "home");
        assert_eq!(json["notify"]["kind"], "session-expired");
        assert_eq!(json["notify"]["title"], "Session Expired");
    }
}
