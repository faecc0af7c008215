//! Driver sign-in.
//!
//! Credentials are checked against a single demo pair. There is no retry
//! limit, lockout or backoff.

use crate::config::AuthConfig;
use crate::dispatch::Notification;
use std::time::Duration;
use thiserror::Error;

pub const DEMO_DRIVER_ID: &str = "DRV001";
pub const DEMO_PASSWORD: &str = "password123";

/// Sign-in failures. Messages are shown to the driver verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Please enter both Driver ID and Password")]
    MissingCredentials,

    #[error("Invalid Driver ID or Password. Try DRV001 / password123")]
    InvalidCredentials,
}

/// Signed-in driver identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverId(pub String);

impl std::fmt::Display for DriverId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A successful sign-in.
#[derive(Debug, Clone)]
pub struct Login {
    pub driver_id: DriverId,
    pub notification: Notification,
}

/// Check a credential pair. Pure; no delay.
pub fn authenticate(driver_id: &str, password: &str) -> Result<DriverId, AuthError> {
    if driver_id.trim().is_empty() || password.trim().is_empty() {
        return Err(AuthError::MissingCredentials);
    }

    if driver_id == DEMO_DRIVER_ID && password == DEMO_PASSWORD {
        Ok(DriverId(driver_id.to_string()))
    } else {
        Err(AuthError::InvalidCredentials)
    }
}

/// Sign in after the configured simulated latency.
///
/// Blank input is rejected before the delay, as the form would.
pub async fn login(config: &AuthConfig, driver_id: &str, password: &str) -> Result<Login, AuthError> {
    if driver_id.trim().is_empty() || password.trim().is_empty() {
        return Err(AuthError::MissingCredentials);
    }

    tokio::time::sleep(Duration::from_millis(config.latency_ms)).await;

    match authenticate(driver_id, password) {
        Ok(id) => {
            tracing::info!(driver_id = %id, "Driver signed in");
            Ok(Login {
                notification: Notification::new(
                    "Welcome back!",
                    format!("Logged in as Driver {}", id),
                ),
                driver_id: id,
            })
        }
        Err(e) => {
            tracing::warn!("Driver sign-in rejected");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_demo_pair_accepted() {
        let id = authenticate("DRV001", "password123").unwrap();
        assert_eq!(id.0, "DRV001");
    }

    #[test]
    fn test_blank_fields_rejected() {
        assert_eq!(authenticate("", "password123"), Err(AuthError::MissingCredentials));
        assert_eq!(authenticate("DRV001", "   "), Err(AuthError::MissingCredentials));
    }

    #[test]
    fn test_wrong_pair_message() {
        let err = authenticate("DRV002", "password123").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid Driver ID or Password. Try DRV001 / password123"
        );
    }

    #[test]
    fn test_case_and_whitespace_are_significant() {
        assert_eq!(authenticate("drv001", "password123"), Err(AuthError::InvalidCredentials));
        assert_eq!(authenticate("DRV001 ", "password123"), Err(AuthError::InvalidCredentials));
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_waits_for_latency() {
        let config = AuthConfig { latency_ms: 1500 };
        let start = tokio::time::Instant::now();

        let signed_in = login(&config, "DRV001", "password123").await.unwrap();

        assert!(start.elapsed() >= Duration::from_millis(1500));
        assert_eq!(signed_in.notification.title, "Welcome back!");
        assert_eq!(signed_in.notification.description, "Logged in as Driver DRV001");
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_blank_fails_immediately() {
        let config = AuthConfig { latency_ms: 1500 };
        let start = tokio::time::Instant::now();

        let result = login(&config, "", "").await;

        assert_eq!(result.unwrap_err(), AuthError::MissingCredentials);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    proptest! {
        #[test]
        fn prop_any_other_pair_gets_same_rejection(
            id in "[A-Za-z0-9]{1,12}",
            password in "[A-Za-z0-9]{1,16}",
        ) {
            prop_assume!(!(id == DEMO_DRIVER_ID && password == DEMO_PASSWORD));
            let err = authenticate(&id, &password).unwrap_err();
            prop_assert_eq!(err, AuthError::InvalidCredentials);
        }
    }
}
