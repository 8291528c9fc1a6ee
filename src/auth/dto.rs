use serde::Deserialize;

use crate::auth::Identity;
use crate::error::AppError;

/// Subset of Google's `tokeninfo` response.
#[derive(Debug, Deserialize)]
pub struct TokenInfo {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub aud: Option<String>,
}

impl TokenInfo {
    pub fn into_identity(self, audience: Option<&str>) -> Result<Identity, AppError> {
        if let Some(expected) = audience {
            if self.aud.as_deref() != Some(expected) {
                return Err(AppError::Unauthorized("token audience mismatch".to_string()));
            }
        }

        let user_id = self
            .sub
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::Unauthorized("token has no subject".to_string()))?;

        Ok(Identity {
            user_id,
            email: self.email,
        })
    }
}
