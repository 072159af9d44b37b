use crate::domain::recipe::UserId;

/// Source of the current viewer identity.
pub trait SessionProvider: Send + Sync {
    fn current_viewer_id(&self) -> Option<UserId>;

    fn is_logged_in(&self) -> bool {
        self.current_viewer_id().is_some()
    }
}

/// Per-request session resolved from the bearer token, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Session {
    viewer_id: Option<UserId>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self { viewer_id: None }
    }

    pub fn authenticated(viewer_id: UserId) -> Self {
        Self {
            viewer_id: Some(viewer_id),
        }
    }
}

impl SessionProvider for Session {
    fn current_viewer_id(&self) -> Option<UserId> {
        self.viewer_id
    }
}
