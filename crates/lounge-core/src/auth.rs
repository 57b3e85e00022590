//! # Credential Checks
//!
//! Plaintext comparisons against the stored credentials. This gate keeps
//! staff out of the admin screens; it is not a security boundary.

use crate::error::ValidationError;
use crate::types::{AdminAccess, Credentials};
use crate::validation::validate_credential;

impl Credentials {
    /// True when both the user name and password match.
    pub fn check_login(&self, user: &str, pass: &str) -> bool {
        user == self.login_user && pass == self.login_pass
    }

    /// What `password` unlocks in the admin panel.
    ///
    /// The admin password gives `Full`. A configured, non-empty recovery
    /// password gives `WithCredentialManager`, so a forgotten admin
    /// password can be reset.
    ///
    /// ```rust
    /// use lounge_core::{AdminAccess, Credentials};
    ///
    /// let creds = Credentials::default();
    /// assert_eq!(creds.verify_admin("admin", None), Some(AdminAccess::Full));
    /// assert_eq!(creds.verify_admin("nope", Some("reset-me")), None);
    /// assert_eq!(
    ///     creds.verify_admin("reset-me", Some("reset-me")),
    ///     Some(AdminAccess::WithCredentialManager)
    /// );
    /// ```
    pub fn verify_admin(&self, password: &str, recovery: Option<&str>) -> Option<AdminAccess> {
        if password == self.admin_pass {
            return Some(AdminAccess::Full);
        }
        match recovery {
            Some(recovery) if !recovery.is_empty() && password == recovery => {
                Some(AdminAccess::WithCredentialManager)
            }
            _ => None,
        }
    }

    /// Checks every field before the credentials replace the stored ones.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_credential("loginUser", &self.login_user)?;
        validate_credential("loginPass", &self.login_pass)?;
        validate_credential("adminPass", &self.admin_pass)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_is_exact() {
        let creds = Credentials::default();
        assert!(creds.check_login("admin", "1234"));
        assert!(!creds.check_login("Admin", "1234"));
        assert!(!creds.check_login("admin", "1234 "));
    }

    #[test]
    fn test_admin_password_wins_over_recovery() {
        let creds = Credentials::default();
        assert_eq!(creds.verify_admin("admin", Some("admin")), Some(AdminAccess::Full));
    }

    #[test]
    fn test_empty_recovery_never_matches() {
        let creds = Credentials::default();
        assert_eq!(creds.verify_admin("", Some("")), None);
        assert_eq!(creds.verify_admin("password", None), None);
    }

    #[test]
    fn test_validate() {
        assert!(Credentials::default().validate().is_ok());
        let creds = Credentials {
            admin_pass: "   ".to_string(),
            ..Credentials::default()
        };
        assert!(creds.validate().is_err());
    }
}
