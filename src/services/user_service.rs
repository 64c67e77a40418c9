// ==================== USERS ====================
// Registro, perfil público e histórico de vídeos assistidos

use crate::{
    database::Store,
    models::{
        PersonalDetails, PersonalDetailsInput, ProfileChanges, RegisterUserRequest,
        UpdateProfileRequest, User, Video, DEFAULT_ROLE,
    },
    utils::{parse_id, AppError, AppResult},
};
use bcrypt::hash;
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};

/// Creates a user with a bcrypt-hashed password and the default role.
pub async fn register(store: &dyn Store, request: RegisterUserRequest, bcrypt_cost: u32) -> AppResult<User> {
    let username = request.username.trim();
    let email = request.email.trim().to_lowercase();

    if username.is_empty() || email.is_empty() || request.password.is_empty() {
        return Err(AppError::ValidationFailed(
            "Username, email and password are required".to_string(),
        ));
    }

    if !email.contains('@') {
        return Err(AppError::ValidationFailed("Invalid email".to_string()));
    }

    if store.find_user_by_username_or_email(username, &email).await?.is_some() {
        return Err(AppError::Conflict("Username or email already registered".to_string()));
    }

    // bcrypt é CPU-bound: roda fora do worker do actix
    let password = request.password.clone();
    let password_hash = tokio::task::spawn_blocking(move || hash(password, bcrypt_cost))
        .await
        .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;

    let user = User {
        id: ObjectId::new(),
        username: username.to_string(),
        email,
        password_hash,
        avatar: request.avatar.filter(|a| !a.trim().is_empty()),
        bio: request.bio,
        personal_details: request
            .personal_details
            .map(to_personal_details)
            .unwrap_or_default(),
        privacy_settings: request.privacy_settings.unwrap_or_default(),
        watched_videos: vec![],
        role: DEFAULT_ROLE.to_string(),
        created_at: Some(BsonDateTime::now()),
    };

    store.insert_user(&user).await?;

    log::info!("📝 User registered: {} ({})", user.username, user.id);

    Ok(user)
}

fn to_personal_details(input: PersonalDetailsInput) -> PersonalDetails {
    PersonalDetails {
        name: input.name,
        date_of_birth: input
            .date_of_birth
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|dt| BsonDateTime::from_millis(dt.and_utc().timestamp_millis())),
    }
}

/// The user and the videos they own
pub async fn get_profile(store: &dyn Store, user_id: &str) -> AppResult<(User, Vec<Video>)> {
    let user_oid = parse_id(user_id, "User")?;

    let user = store
        .find_user_by_id(&user_oid)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    with_owned_videos(store, user).await
}

/// Same as `get_profile`, looked up by exact username
pub async fn get_profile_by_username(store: &dyn Store, username: &str) -> AppResult<(User, Vec<Video>)> {
    let username = username.trim();
    if username.is_empty() {
        return Err(AppError::ValidationFailed("Username is required".to_string()));
    }

    let user = store
        .find_user_by_username(username)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    with_owned_videos(store, user).await
}

async fn with_owned_videos(store: &dyn Store, user: User) -> AppResult<(User, Vec<Video>)> {
    let videos = store.find_videos_by_owner(&user.id).await?;

    log::debug!("👤 Profile {} with {} videos", user.username, videos.len());

    Ok((user, videos))
}

/// Merges the given fields into the stored profile. Absent fields are kept;
/// an empty request returns the profile unchanged.
pub async fn update_profile(store: &dyn Store, user_id: &str, request: UpdateProfileRequest) -> AppResult<User> {
    let user_oid = parse_id(user_id, "User")?;
    let changes = to_profile_changes(request)?;

    let user = if changes.is_empty() {
        store.find_user_by_id(&user_oid).await?
    } else {
        store.update_profile(&user_oid, &changes).await?
    }
    .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    log::info!("✏️  Profile of {} updated", user.username);

    Ok(user)
}

/// Points the profile at an already stored avatar image
pub async fn update_avatar(store: &dyn Store, user_id: &str, avatar: &str) -> AppResult<User> {
    if avatar.trim().is_empty() {
        return Err(AppError::ValidationFailed("Avatar path is required".to_string()));
    }

    let request = UpdateProfileRequest {
        avatar: Some(avatar.to_string()),
        ..Default::default()
    };

    update_profile(store, user_id, request).await
}

fn to_profile_changes(request: UpdateProfileRequest) -> AppResult<ProfileChanges> {
    let avatar = match request.avatar {
        Some(avatar) if avatar.trim().is_empty() => {
            return Err(AppError::ValidationFailed("Avatar path cannot be empty".to_string()));
        }
        other => other,
    };

    let details = request.personal_details.map(to_personal_details).unwrap_or_default();
    let privacy = request.privacy_settings.unwrap_or_default();

    Ok(ProfileChanges {
        bio: request.bio,
        avatar,
        name: details.name,
        date_of_birth: details.date_of_birth,
        show_email: privacy.show_email,
        show_bio: privacy.show_bio,
        show_personal_details: privacy.show_personal_details,
    })
}

/// Appends a watch event to the user's history. Repeated views of the same
/// video are kept as separate entries.
pub async fn record_watch(store: &dyn Store, user_id: &str, video_id: &str) -> AppResult<()> {
    let user_oid = parse_id(user_id, "User")?;
    let video_oid = parse_id(video_id, "Video")?;

    if store.find_video_by_id(&video_oid).await?.is_none() {
        return Err(AppError::NotFound("Video not found".to_string()));
    }

    if !store.push_watched_video(&user_oid, &video_oid).await? {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    log::info!("👀 User {} watched video {}", user_id, video_id);

    Ok(())
}
