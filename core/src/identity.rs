use std::fs;
use std::path::Path;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::AuthError;

const ANONYMOUS_ID_FILE: &str = "anonymous_id";

/// Who owns the per-user report collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub anonymous: bool,
}

pub fn validate_user_id(raw: &str) -> Result<String, AuthError> {
    let id = raw.trim();
    let valid = !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(id.to_string())
    } else {
        Err(AuthError::InvalidUserId(raw.to_string()))
    }
}

/// Configured user id when it is usable, otherwise the anonymous identity.
/// Never fails.
pub fn resolve_identity(config: &AppConfig, data_dir: &Path) -> Identity {
    if let Some(raw) = &config.auth.user_id {
        match validate_user_id(raw) {
            Ok(user_id) => {
                debug!(user_id = %user_id, "signed in");
                return Identity { user_id, anonymous: false };
            }
            Err(e) => warn!(error = %e, "sign-in failed, continuing anonymously"),
        }
    }
    anonymous_identity(data_dir)
}

/// Stable per-installation anonymous id, created on first use.
pub fn anonymous_identity(data_dir: &Path) -> Identity {
    let path = data_dir.join(ANONYMOUS_ID_FILE);

    if let Ok(existing) = fs::read_to_string(&path) {
        if let Ok(user_id) = validate_user_id(&existing) {
            return Identity { user_id, anonymous: true };
        }
    }

    let user_id = format!("anon-{}", Uuid::new_v4());
    let persisted = fs::create_dir_all(data_dir).and_then(|_| fs::write(&path, &user_id));
    if let Err(e) = persisted {
        warn!(error = %e, "could not persist anonymous id, reports will not survive this session");
    }
    Identity { user_id, anonymous: true }
}
