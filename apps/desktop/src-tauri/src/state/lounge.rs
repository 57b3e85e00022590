//! # Lounge State
//!
//! The whole lounge (devices, sessions, reports, settings) behind one lock,
//! plus the admin unlock level of this process.
//!
//! ## Mutation Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  command / ticker                                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  lock ──► AppState::op(…) ──► Snapshot{revision, json} ──► unlock       │
//! │                                               │                         │
//! │                                               ▼                         │
//! │                                   db.save(&snapshot).await              │
//! │                                   (lock is never held across .await)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Revisions are handed out under the state lock, so they follow the order
//! of the mutations. Commands and the ticker save concurrently; `DbState`
//! drops any snapshot older than the one already written.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use lounge_core::{AdminAccess, AppState};

use crate::error::ApiError;

/// Encoded state tagged with the mutation it follows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub revision: u64,
    pub json: String,
}

/// Tauri-managed lounge state.
///
/// Uses `Arc<Mutex<AppState>>` so the ticker task and commands share one
/// writer. Cloning shares the same state.
#[derive(Debug, Clone, Default)]
pub struct LoungeState {
    state: Arc<Mutex<AppState>>,
    admin: Arc<Mutex<Option<AdminAccess>>>,
    revision: Arc<AtomicU64>,
}

impl LoungeState {
    /// Wraps the state loaded at startup. The admin panel starts locked.
    pub fn new(state: AppState) -> Self {
        LoungeState {
            state: Arc::new(Mutex::new(state)),
            admin: Arc::new(Mutex::new(None)),
            revision: Arc::new(AtomicU64::new(0)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, AppState>, ApiError> {
        self.state
            .lock()
            .map_err(|_| ApiError::internal("Lounge state lock poisoned"))
    }

    /// Executes a function with read access to the state.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let clocks = lounge.with_state(|s| s.clocks(Utc::now()))?;
    /// ```
    pub fn with_state<F, R>(&self, f: F) -> Result<R, ApiError>
    where
        F: FnOnce(&AppState) -> R,
    {
        let state = self.lock()?;
        Ok(f(&state))
    }

    /// Executes a function with write access to the state.
    ///
    /// Use this only for changes that are not persisted, such as clearing
    /// the last-ended receipt.
    pub fn with_state_mut<F, R>(&self, f: F) -> Result<R, ApiError>
    where
        F: FnOnce(&mut AppState) -> R,
    {
        let mut state = self.lock()?;
        Ok(f(&mut state))
    }

    /// Runs a persisted mutation and returns its result together with a
    /// snapshot taken under the same lock.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let (report, json) = lounge.mutate(|s| s.end_session(id, Utc::now()))?;
    /// db.save(&json).await?;
    /// ```
    pub fn mutate<F, R, E>(&self, f: F) -> Result<(R, Snapshot), ApiError>
    where
        F: FnOnce(&mut AppState) -> Result<R, E>,
        E: Into<ApiError>,
    {
        let mut state = self.lock()?;
        let result = f(&mut state).map_err(Into::into)?;
        let snapshot = self.snapshot_of(&state)?;
        Ok((result, snapshot))
    }

    /// Encodes `state` under the next revision. Call only while holding the
    /// state lock, i.e. from inside `with_state_mut` or `mutate`.
    pub(crate) fn snapshot_of(&self, state: &AppState) -> Result<Snapshot, ApiError> {
        let json = state.to_json()?;
        let revision = self.revision.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(Snapshot { revision, json })
    }

    // =========================================================================
    // Admin unlock
    // =========================================================================

    pub fn admin_access(&self) -> Result<Option<AdminAccess>, ApiError> {
        self.admin
            .lock()
            .map(|access| *access)
            .map_err(|_| ApiError::internal("Admin lock poisoned"))
    }

    /// Records the result of a password check. `None` locks the panel.
    pub fn set_admin_access(&self, access: Option<AdminAccess>) -> Result<(), ApiError> {
        let mut current = self
            .admin
            .lock()
            .map_err(|_| ApiError::internal("Admin lock poisoned"))?;
        *current = access;
        Ok(())
    }

    /// Fails unless the panel was unlocked with at least `needed`.
    pub fn require_admin(&self, needed: AdminAccess) -> Result<(), ApiError> {
        match self.admin_access()? {
            Some(access) if access >= needed => Ok(()),
            Some(_) => Err(ApiError::admin_required(
                "Credential manager needs the recovery password",
            )),
            None => Err(ApiError::admin_required("Admin panel is locked")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use lounge_core::{CoreError, Theme};

    #[test]
    fn test_mutate_returns_snapshot() {
        let lounge = LoungeState::new(AppState::default());

        let (theme, json) = lounge
            .mutate(|s| Ok::<_, CoreError>(s.toggle_theme()))
            .unwrap();

        assert_eq!(theme, Theme::BlueOrange);
        let saved = AppState::from_json(&json.json).unwrap();
        assert_eq!(saved.state.theme, Theme::BlueOrange);
    }

    #[test]
    fn test_revisions_follow_mutation_order() {
        let lounge = LoungeState::new(AppState::default());
        let ticker_side = lounge.clone();

        let (_, first) = lounge.mutate(|s| s.add_device()).unwrap();
        let second = ticker_side
            .with_state_mut(|s| ticker_side.snapshot_of(s))
            .unwrap()
            .unwrap();
        let (_, third) = lounge.mutate(|s| s.delete_device(5)).unwrap();

        assert_eq!([first.revision, second.revision, third.revision], [1, 2, 3]);
    }

    #[test]
    fn test_mutate_propagates_core_error() {
        let lounge = LoungeState::new(AppState::default());
        let err = lounge.mutate(|s| s.delete_device(99)).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_clones_share_state() {
        let lounge = LoungeState::new(AppState::default());
        let ticker_side = lounge.clone();

        ticker_side.with_state_mut(|s| s.add_device()).unwrap().unwrap();
        assert_eq!(lounge.with_state(|s| s.devices.len()).unwrap(), 5);
    }

    #[test]
    fn test_admin_levels() {
        let lounge = LoungeState::new(AppState::default());
        assert_eq!(
            lounge.require_admin(AdminAccess::Full).unwrap_err().code,
            ErrorCode::AdminRequired
        );

        lounge.set_admin_access(Some(AdminAccess::Full)).unwrap();
        assert!(lounge.require_admin(AdminAccess::Full).is_ok());
        assert!(lounge.require_admin(AdminAccess::WithCredentialManager).is_err());

        lounge
            .set_admin_access(Some(AdminAccess::WithCredentialManager))
            .unwrap();
        assert!(lounge.require_admin(AdminAccess::WithCredentialManager).is_ok());

        lounge.set_admin_access(None).unwrap();
        assert!(lounge.require_admin(AdminAccess::Full).is_err());
    }
}
