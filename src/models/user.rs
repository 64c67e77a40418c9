use chrono::NaiveDate;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::DateTime as BsonDateTime;
use serde::{Deserialize, Serialize};

use super::video::VideoResponse;

/// Documento da collection "users"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub username: String,

    pub email: String,

    /// bcrypt hash, never exposed outside the service layer
    pub password_hash: String,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub avatar: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub bio: Option<String>,

    #[serde(default)]
    pub personal_details: PersonalDetails,

    #[serde(default)]
    pub privacy_settings: PrivacySettings,

    /// Watch history in event order; the same video may appear more than once
    #[serde(default)]
    pub watched_videos: Vec<ObjectId>,

    #[serde(default = "default_role")]
    pub role: String,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub created_at: Option<BsonDateTime>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonalDetails {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub date_of_birth: Option<BsonDateTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PrivacySettings {
    #[serde(default = "default_true")]
    pub show_email: bool,
    #[serde(default = "default_true")]
    pub show_bio: bool,
    #[serde(default = "default_true")]
    pub show_personal_details: bool,
}

impl Default for PrivacySettings {
    fn default() -> Self {
        PrivacySettings {
            show_email: true,
            show_bio: true,
            show_personal_details: true,
        }
    }
}

pub const DEFAULT_ROLE: &str = "user";

fn default_role() -> String {
    DEFAULT_ROLE.to_string()
}

fn default_true() -> bool {
    true
}

/// Request para registrar usuário
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RegisterUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub personal_details: Option<PersonalDetailsInput>,
    pub privacy_settings: Option<PrivacySettings>,
}

#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct PersonalDetailsInput {
    pub name: Option<String>,
    /// ISO date, e.g. "1990-04-21"
    #[schema(value_type = Option<String>)]
    pub date_of_birth: Option<NaiveDate>,
}

/// Request de atualização parcial do perfil; campos ausentes não mudam
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct UpdateProfileRequest {
    pub bio: Option<String>,
    /// Path of an already stored avatar image
    pub avatar: Option<String>,
    pub personal_details: Option<PersonalDetailsInput>,
    pub privacy_settings: Option<PrivacySettingsUpdate>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, utoipa::ToSchema)]
pub struct PrivacySettingsUpdate {
    pub show_email: Option<bool>,
    pub show_bio: Option<bool>,
    pub show_personal_details: Option<bool>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateAvatarRequest {
    pub avatar: String,
}

/// Field-level changes to a stored user; `None` keeps the stored value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileChanges {
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub name: Option<String>,
    pub date_of_birth: Option<BsonDateTime>,
    pub show_email: Option<bool>,
    pub show_bio: Option<bool>,
    pub show_personal_details: Option<bool>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        *self == ProfileChanges::default()
    }

    pub fn apply(&self, user: &mut User) {
        if let Some(bio) = &self.bio {
            user.bio = Some(bio.clone());
        }
        if let Some(avatar) = &self.avatar {
            user.avatar = Some(avatar.clone());
        }
        if let Some(name) = &self.name {
            user.personal_details.name = Some(name.clone());
        }
        if let Some(date_of_birth) = self.date_of_birth {
            user.personal_details.date_of_birth = Some(date_of_birth);
        }
        if let Some(show) = self.show_email {
            user.privacy_settings.show_email = show;
        }
        if let Some(show) = self.show_bio {
            user.privacy_settings.show_bio = show;
        }
        if let Some(show) = self.show_personal_details {
            user.privacy_settings.show_personal_details = show;
        }
    }
}

/// The only author fields a comment listing may show
#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct PublicProfile {
    pub username: String,
    pub avatar: Option<String>,
}

pub const UNKNOWN_USERNAME: &str = "Unknown user";

impl PublicProfile {
    pub fn unknown() -> Self {
        PublicProfile {
            username: UNKNOWN_USERNAME.to_string(),
            avatar: None,
        }
    }
}

impl From<&User> for PublicProfile {
    fn from(user: &User) -> Self {
        PublicProfile {
            username: user.username.clone(),
            avatar: user.avatar.clone(),
        }
    }
}

/// Response de registro (sem hash de senha)
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub role: String,
    pub privacy_settings: PrivacySettings,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id.to_hex(),
            username: user.username,
            email: user.email,
            avatar: user.avatar,
            bio: user.bio,
            role: user.role,
            privacy_settings: user.privacy_settings,
        }
    }
}

/// Perfil visível para terceiros, filtrado pelas flags de privacidade
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ProfileView {
    pub id: String,
    pub username: String,
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personal_details: Option<PersonalDetailsView>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct PersonalDetailsView {
    pub name: Option<String>,
    #[schema(value_type = Option<String>)]
    pub date_of_birth: Option<NaiveDate>,
}

impl From<&User> for ProfileView {
    fn from(user: &User) -> Self {
        let privacy = user.privacy_settings;
        ProfileView {
            id: user.id.to_hex(),
            username: user.username.clone(),
            avatar: user.avatar.clone(),
            email: privacy.show_email.then(|| user.email.clone()),
            bio: if privacy.show_bio { user.bio.clone() } else { None },
            personal_details: privacy.show_personal_details.then(|| PersonalDetailsView {
                name: user.personal_details.name.clone(),
                date_of_birth: user
                    .personal_details
                    .date_of_birth
                    .and_then(|dt| chrono::DateTime::from_timestamp_millis(dt.timestamp_millis()))
                    .map(|dt| dt.date_naive()),
            }),
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ProfileResponse {
    pub success: bool,
    pub user: ProfileView,
    pub videos: Vec<VideoResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user(privacy: PrivacySettings) -> User {
        User {
            id: ObjectId::new(),
            username: "ana".into(),
            email: "ana@example.com".into(),
            password_hash: "$2b$04$hash".into(),
            avatar: Some("avatars/ana.png".into()),
            bio: Some("films and coffee".into()),
            personal_details: PersonalDetails {
                name: Some("Ana".into()),
                date_of_birth: None,
            },
            privacy_settings: privacy,
            watched_videos: vec![],
            role: DEFAULT_ROLE.into(),
            created_at: None,
        }
    }

    #[test]
    fn test_profile_view_honors_privacy_flags() {
        let user = sample_user(PrivacySettings {
            show_email: false,
            show_bio: true,
            show_personal_details: false,
        });
        let view = ProfileView::from(&user);
        assert_eq!(view.email, None);
        assert_eq!(view.bio.as_deref(), Some("films and coffee"));
        assert!(view.personal_details.is_none());

        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("email").is_none());
        assert!(json.get("personal_details").is_none());
    }

    #[test]
    fn test_public_profile_has_only_username_and_avatar() {
        let user = sample_user(PrivacySettings::default());
        let json = serde_json::to_value(PublicProfile::from(&user)).unwrap();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 2);
        assert_eq!(json["username"], "ana");
        assert_eq!(json["avatar"], "avatars/ana.png");
    }

    #[test]
    fn test_profile_changes_merge_only_given_fields() {
        let mut user = sample_user(PrivacySettings::default());
        let changes = ProfileChanges {
            bio: Some("new bio".into()),
            show_email: Some(false),
            ..Default::default()
        };
        assert!(!changes.is_empty());
        assert!(ProfileChanges::default().is_empty());

        changes.apply(&mut user);
        assert_eq!(user.bio.as_deref(), Some("new bio"));
        assert_eq!(user.avatar.as_deref(), Some("avatars/ana.png"));
        assert_eq!(user.personal_details.name.as_deref(), Some("Ana"));
        assert!(!user.privacy_settings.show_email);
        assert!(user.privacy_settings.show_bio);
    }

    #[test]
    fn test_privacy_defaults_when_missing() {
        let settings: PrivacySettings = serde_json::from_str("{\"show_bio\": false}").unwrap();
        assert!(settings.show_email);
        assert!(!settings.show_bio);
        assert!(settings.show_personal_details);
    }

    #[test]
    fn test_user_response_never_contains_hash() {
        let user = sample_user(PrivacySettings::default());
        let json = serde_json::to_string(&UserResponse::from(user)).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("$2b$"));
    }
}
