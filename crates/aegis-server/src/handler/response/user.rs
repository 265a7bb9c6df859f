use aegis_postgres::model::User;
use serde::Serialize;
use uuid::Uuid;

/// Public view of a user account.
///
/// The password hash is never part of this type, so it cannot leak into a
/// response body by accident.
#[must_use]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Unique identifier of the user.
    pub id: Uuid,
    /// Email address used for signin.
    pub email: String,
    /// Display name.
    pub full_name: String,
    /// Roles held by the user.
    pub roles: Vec<String>,
    /// Whether the account can authenticate.
    pub is_active: bool,
    /// When the account was created.
    pub created_at: jiff::Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            roles: user.roles,
            is_active: user.is_active,
            created_at: user.created_at.into(),
        }
    }
}

/// Response body returned by a successful signin.
#[must_use]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SigninResponse {
    /// Signed bearer token to present on subsequent requests.
    pub token: String,
    /// When the token stops being accepted.
    pub expires_at: jiff::Timestamp,
    /// The authenticated user.
    pub user: UserResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "user@example.com".to_owned(),
            password_hash: "$argon2id$...".to_owned(),
            full_name: "Sample User".to_owned(),
            roles: vec!["user".to_owned()],
            is_active: true,
            created_at: jiff::Timestamp::UNIX_EPOCH.into(),
            updated_at: jiff::Timestamp::UNIX_EPOCH.into(),
        }
    }

    #[test]
    fn user_response_excludes_password_hash() {
        let response = UserResponse::from(sample_user());
        let json = serde_json::to_value(&response).unwrap();

        let object = json.as_object().unwrap();
        assert!(object.contains_key("email"));
        assert!(object.contains_key("fullName"));
        assert!(object.contains_key("roles"));
        assert!(!object.contains_key("passwordHash"));
        assert!(!object.contains_key("password_hash"));
    }

    #[test]
    fn user_response_uses_camel_case_keys() {
        let response = UserResponse::from(sample_user());
        let json = serde_json::to_value(&response).unwrap();

        let object = json.as_object().unwrap();
        assert!(object.contains_key("isActive"));
        assert!(object.contains_key("createdAt"));
    }
}
