// ==================== ENGAGEMENT ====================
// Comentários, likes, dislikes e views de um vídeo.
// Contadores e listas são alterados com operações atômicas do banco
// ($inc / $push), nunca com leitura-modificação-escrita.

use crate::{
    database::Store,
    models::{to_utc, Comment, CommentWithAuthor, Counter, PublicProfile},
    utils::{parse_id, AppError, AppResult},
};
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use std::collections::{HashMap, HashSet};

/// Appends a comment to a video.
///
/// The author id is stored without checking that the user exists.
pub async fn add_comment(
    store: &dyn Store,
    video_id: &str,
    author_user_id: &str,
    text: &str,
) -> AppResult<Comment> {
    if text.trim().is_empty() {
        return Err(AppError::ValidationFailed("Comment text is required".to_string()));
    }

    let author = ObjectId::parse_str(author_user_id.trim())
        .map_err(|_| AppError::ValidationFailed("Invalid user id".to_string()))?;
    let video_oid = parse_id(video_id, "Video")?;

    let comment = Comment {
        id: ObjectId::new(),
        text: text.to_string(),
        user_id: author,
        date: BsonDateTime::now(),
    };

    if !store.push_comment(&video_oid, &comment).await? {
        return Err(AppError::NotFound("Video not found".to_string()));
    }

    log::info!("💬 Comment {} added to video {} by {}", comment.id, video_id, author);

    Ok(comment)
}

/// Comments of a video, newest first, each with its author's public profile.
///
/// An author that no longer resolves is shown as an unknown user instead of
/// failing the listing.
pub async fn list_comments(store: &dyn Store, video_id: &str) -> AppResult<Vec<CommentWithAuthor>> {
    let video_oid = parse_id(video_id, "Video")?;

    let video = store
        .find_video_by_id(&video_oid)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    let mut comments = video.comments;

    let mut seen = HashSet::new();
    let author_ids: Vec<ObjectId> = comments
        .iter()
        .map(|c| c.user_id)
        .filter(|id| seen.insert(*id))
        .collect();

    let authors: HashMap<ObjectId, PublicProfile> = store
        .find_users_by_ids(&author_ids)
        .await?
        .iter()
        .map(|user| (user.id, PublicProfile::from(user)))
        .collect();

    // Mais recentes primeiro (sort estável: empates mantêm a ordem de inserção)
    comments.sort_by(|a, b| b.date.cmp(&a.date));

    let listing = comments
        .into_iter()
        .map(|comment| {
            let author = match authors.get(&comment.user_id) {
                Some(profile) => profile.clone(),
                None => {
                    log::warn!(
                        "⚠️  Comment {} on video {} has unknown author {}",
                        comment.id,
                        video_id,
                        comment.user_id
                    );
                    PublicProfile::unknown()
                }
            };

            CommentWithAuthor {
                id: comment.id.to_hex(),
                text: comment.text,
                date: to_utc(comment.date),
                author,
            }
        })
        .collect();

    Ok(listing)
}

/// Adds one like. No per-user deduplication: every call counts.
pub async fn like(store: &dyn Store, video_id: &str) -> AppResult<i64> {
    increment(store, video_id, Counter::Likes).await
}

/// Adds one dislike. No per-user deduplication: every call counts.
pub async fn dislike(store: &dyn Store, video_id: &str) -> AppResult<i64> {
    increment(store, video_id, Counter::Dislikes).await
}

pub async fn record_view(store: &dyn Store, video_id: &str) -> AppResult<i64> {
    increment(store, video_id, Counter::Views).await
}

async fn increment(store: &dyn Store, video_id: &str, counter: Counter) -> AppResult<i64> {
    let video_oid = parse_id(video_id, "Video")?;

    let value = store
        .increment_counter(&video_oid, counter)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    log::info!("👍 Video {} {} -> {}", video_id, counter.field(), value);

    Ok(value)
}
