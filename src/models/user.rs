//! User accounts and profile DTOs

use crate::error::{validation_error, AppError};
use crate::models::{deserialize_present, trimmed};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// User represents a registered adopter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    /// Always stored lowercased
    pub email: String,
    #[serde(skip_serializing)] // Never send password hash to client
    pub password_hash: String,
    pub mobile: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The user fields a client is allowed to see
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub mobile: Option<String>,
    pub address: Option<String>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            mobile: user.mobile.clone(),
            address: user.address.clone(),
        }
    }
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            mobile: user.mobile,
            address: user.address,
        }
    }
}

/// `{ ok, user }` body returned by signup, login and profile update
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub ok: bool,
    pub user: UserView,
}

impl UserResponse {
    pub fn new(user: impl Into<UserView>) -> Self {
        Self {
            ok: true,
            user: user.into(),
        }
    }
}

/// Insert payload for a user; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub mobile: Option<String>,
    pub address: Option<String>,
}

/// Request to register a new user
#[derive(Debug, Default, Deserialize)]
pub struct SignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub mobile: Option<String>,
    pub address: Option<String>,
}

/// Signup input after presence checks and normalization
#[derive(Debug, Validate)]
pub struct Signup {
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    pub name: String,
    #[validate(length(max = 255, message = "Email must be at most 255 characters"))]
    pub email: String,
    pub password: String,
    #[validate(length(max = 20, message = "Mobile number must be at most 20 characters"))]
    pub mobile: Option<String>,
    #[validate(length(max = 500, message = "Address must be at most 500 characters"))]
    pub address: Option<String>,
}

impl SignupRequest {
    pub fn into_signup(self) -> Result<Signup, AppError> {
        let name = trimmed(self.name);
        let email = trimmed(self.email).map(|e| e.to_lowercase());
        // Passwords are taken verbatim
        let password = self.password.filter(|p| !p.is_empty());

        let (Some(name), Some(email), Some(password)) = (name, email, password) else {
            return Err(validation_error("Name, email and password are required"));
        };

        let signup = Signup {
            name,
            email,
            password,
            mobile: trimmed(self.mobile),
            address: trimmed(self.address),
        };
        signup.validate()?;
        Ok(signup)
    }
}

/// Request to login
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    /// Returns the lowercased email and the password
    pub fn into_credentials(self) -> Result<(String, String), AppError> {
        let email = trimmed(self.email).map(|e| e.to_lowercase());
        let password = self.password.filter(|p| !p.is_empty());
        match (email, password) {
            (Some(email), Some(password)) => Ok((email, password)),
            _ => Err(validation_error("Email and password are required")),
        }
    }
}

/// Request body for `PUT /api/users/{id}`
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub mobile: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub address: Option<Option<String>>,
}

/// Profile change applied by the store. Email and password are never
/// part of it.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileUpdate {
    pub name: String,
    /// `None`: untouched, `Some(None)`: cleared
    pub mobile: Option<Option<String>>,
    pub address: Option<Option<String>>,
}

impl UpdateProfileRequest {
    pub fn into_update(self) -> Result<ProfileUpdate, AppError> {
        let name = trimmed(self.name)
            .filter(|n| (2..=100).contains(&n.chars().count()))
            .ok_or_else(|| validation_error("Name is required and must be at least 2 characters"))?;

        // Blank or null clears the field
        let mobile = self.mobile.map(trimmed);
        let address = self.address.map(trimmed);
        max_chars(&mobile, 20, "Mobile number must be at most 20 characters")?;
        max_chars(&address, 500, "Address must be at most 500 characters")?;

        Ok(ProfileUpdate {
            name,
            mobile,
            address,
        })
    }
}

fn max_chars(value: &Option<Option<String>>, max: usize, message: &str) -> Result<(), AppError> {
    match value {
        Some(Some(v)) if v.chars().count() > max => Err(validation_error(message)),
        _ => Ok(()),
    }
}

impl ProfileUpdate {
    /// Apply the update to an in-memory record
    pub fn apply(&self, user: &mut User) {
        user.name = self.name.clone();
        if let Some(mobile) = &self.mobile {
            user.mobile = mobile.clone();
        }
        if let Some(address) = &self.address {
            user.address = address.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_password_hash_is_never_serialized() {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: "Ann".into(),
            email: "a@b.com".into(),
            password_hash: "$2b$04$secret".into(),
            mobile: None,
            address: None,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret"));
        assert!(!json.contains("passwordHash"));

        let view = serde_json::to_value(UserView::from(&user)).unwrap();
        assert_eq!(view["email"], "a@b.com");
        assert!(view["mobile"].is_null());
    }

    #[test]
    fn test_signup_normalizes_email_and_optionals() {
        let signup = SignupRequest {
            name: Some(" Ann ".into()),
            email: Some(" A@B.Com ".into()),
            password: Some("x".into()),
            mobile: Some("  ".into()),
            address: Some(" 1 Main St ".into()),
        }
        .into_signup()
        .unwrap();
        assert_eq!(signup.name, "Ann");
        assert_eq!(signup.email, "a@b.com");
        assert_eq!(signup.mobile, None);
        assert_eq!(signup.address.as_deref(), Some("1 Main St"));
    }

    #[test]
    fn test_signup_requires_fields_and_lengths() {
        let missing = SignupRequest {
            name: Some("Ann".into()),
            email: Some("a@b.com".into()),
            ..Default::default()
        };
        assert!(matches!(missing.into_signup(), Err(AppError::Validation(_))));

        let short_name = SignupRequest {
            name: Some("A".into()),
            email: Some("a@b.com".into()),
            password: Some("x".into()),
            ..Default::default()
        };
        assert!(matches!(short_name.into_signup(), Err(AppError::Validation(_))));

        let long_email = SignupRequest {
            name: Some("Ann".into()),
            email: Some(format!("{}@b.com", "a".repeat(300))),
            password: Some("x".into()),
            ..Default::default()
        };
        assert!(matches!(long_email.into_signup(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_profile_request_distinguishes_absent_from_null() {
        let req: UpdateProfileRequest =
            serde_json::from_str(r#"{"name":"Ann Lee","mobile":null}"#).unwrap();
        let update = req.into_update().unwrap();
        assert_eq!(update.mobile, Some(None));
        assert_eq!(update.address, None);

        let req: UpdateProfileRequest =
            serde_json::from_str(r#"{"name":"Ann Lee","address":"  "}"#).unwrap();
        assert_eq!(req.into_update().unwrap().address, Some(None));
    }

    #[test]
    fn test_profile_update_rejects_short_name() {
        let req: UpdateProfileRequest = serde_json::from_str(r#"{"name":" A "}"#).unwrap();
        assert!(matches!(req.into_update(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_profile_update_applies_to_user() {
        let now = Utc::now();
        let mut user = User {
            id: Uuid::new_v4(),
            name: "Ann".into(),
            email: "a@b.com".into(),
            password_hash: "h".into(),
            mobile: Some("555".into()),
            address: Some("Old".into()),
            created_at: now,
            updated_at: now,
        };
        ProfileUpdate {
            name: "Ann Lee".into(),
            mobile: Some(None),
            address: None,
        }
        .apply(&mut user);
        assert_eq!(user.name, "Ann Lee");
        assert_eq!(user.mobile, None);
        assert_eq!(user.address.as_deref(), Some("Old"));
        assert_eq!(user.email, "a@b.com");
    }
}
