use log::{debug, info, warn};

use crate::error::ApiError;
use crate::location::{Access, Route};
use crate::models::User;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    #[default]
    Unknown,
    Loading,
    Authenticated(User),
    Anonymous,
}

/// The signed-in user, shared by every screen instead of being re-read per view.
#[derive(Debug, Default)]
pub struct Session {
    state: SessionState,
    /// Bumped whenever a profile read is issued or the session is cleared.
    /// Only the read tagged with the current value may resolve the session.
    generation: u64,
}

impl Session {
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn user(&self) -> Option<&User> {
        match &self.state {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user().map(|u| u.id.as_str())
    }

    pub fn is_admin(&self) -> bool {
        self.user().map(User::is_admin).unwrap_or(false)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Marks a profile read as in flight and returns the generation to tag it
    /// with, or `None` if one already is.
    pub fn begin_load(&mut self) -> Option<u64> {
        if self.state == SessionState::Loading {
            return None;
        }
        Some(self.restart_load())
    }

    /// Issues a profile read that supersedes any read in flight.
    pub fn restart_load(&mut self) -> u64 {
        self.state = SessionState::Loading;
        self.bump()
    }

    /// Like `restart_load`, but the current user stays shown until the read
    /// comes back.
    pub fn begin_refresh(&mut self) -> u64 {
        self.bump()
    }

    /// Applies a profile read. Results from a superseded read are ignored and
    /// `false` is returned.
    pub fn resolve(&mut self, generation: u64, result: Result<User, ApiError>) -> bool {
        if generation != self.generation {
            debug!(
                "ignoring profile read {generation}, session is at {}",
                self.generation
            );
            return false;
        }
        self.state = match result {
            Ok(user) => {
                info!("session established for {}", user.user_name);
                SessionState::Authenticated(user)
            }
            Err(err) if err.is_unauthorized() => SessionState::Anonymous,
            Err(err) => {
                warn!("profile read failed, treating session as anonymous: {err}");
                SessionState::Anonymous
            }
        };
        true
    }

    pub fn set_user(&mut self, user: User) {
        self.state = SessionState::Authenticated(user);
    }

    pub fn sign_out(&mut self) {
        self.state = SessionState::Anonymous;
        self.bump();
    }

    /// Forgets the user entirely, e.g. after switching servers.
    pub fn reset(&mut self) {
        self.state = SessionState::Unknown;
        self.bump();
    }

    fn bump(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guard {
    Allow,
    /// The session is not known yet; hold the route until it is.
    Wait,
    Redirect {
        to: Route,
        notice: Option<&'static str>,
    },
}

/// Decides whether `route` may be shown for `session`.
///
/// This only steers rendering; the server still authorizes every call.
pub fn guard(route: &Route, session: &Session) -> Guard {
    let access = route.access();
    if access == Access::Public {
        return Guard::Allow;
    }
    match session.state() {
        SessionState::Unknown | SessionState::Loading => Guard::Wait,
        SessionState::Anonymous => Guard::Redirect {
            to: Route::Login,
            notice: None,
        },
        SessionState::Authenticated(user) => {
            if access == Access::Admin && !user.is_admin() {
                Guard::Redirect {
                    to: Route::feed(),
                    notice: Some("The dashboard is for administrators only"),
                }
            } else {
                Guard::Allow
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub route: Route,
}

/// Sidebar entries. "Dashboard" appears only for a role of exactly `admin`.
pub fn nav_items(user: Option<&User>) -> Vec<NavItem> {
    let mut items = vec![
        NavItem {
            label: "Home",
            route: Route::feed(),
        },
        NavItem {
            label: "Profile",
            route: Route::Profile,
        },
        NavItem {
            label: "Write",
            route: Route::CreatePost,
        },
    ];
    if user.map(User::is_admin).unwrap_or(false) {
        items.push(NavItem {
            label: "Dashboard",
            route: Route::Admin,
        });
    }
    items
}
