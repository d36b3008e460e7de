use crate::{
    db::{Db, keys},
    error::{AppError, AppResult},
    models::User,
};

/// The signed-in user for this browser session, mirroring the persisted
/// session pointer. Owned by the application state and passed explicitly.
#[derive(Debug, Clone, Default)]
pub struct Session {
    user: Option<User>,
}

impl Session {
    /// Loads the session pointer written by a previous run, if any.
    pub fn restore(db: &Db) -> Self {
        Self {
            user: db.read(keys::CURRENT_USER),
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn require_user(&self) -> AppResult<&User> {
        self.user.as_ref().ok_or(AppError::NotLoggedIn)
    }

    pub(crate) fn set_user(&mut self, user: User) {
        self.user = Some(user);
    }

    pub(crate) fn clear(&mut self) {
        self.user = None;
    }
}
