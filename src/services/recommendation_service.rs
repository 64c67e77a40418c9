// ==================== RECOMMENDATIONS ====================
// Sugestões por sobreposição de tags com o histórico do usuário

use crate::{
    database::Store,
    models::Video,
    utils::{parse_id, AppError, AppResult},
};
use mongodb::bson::oid::ObjectId;
use std::collections::{BTreeSet, HashSet};

pub const MAX_RECOMMENDATIONS: i64 = 10;

/// Videos sharing at least one tag with anything the user has watched,
/// excluding the watched ones, in store order, at most `MAX_RECOMMENDATIONS`.
///
/// No scoring or ranking is applied.
pub async fn recommend(store: &dyn Store, user_id: &str) -> AppResult<Vec<Video>> {
    let user_oid = parse_id(user_id, "User")?;

    let user = store
        .find_user_by_id(&user_oid)
        .await
        .map_err(AppError::into_recommendation_failure)?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let watched_ids = distinct_ids(&user.watched_videos);
    if watched_ids.is_empty() {
        log::debug!("🎯 User {} has no watch history, nothing to recommend", user_id);
        return Ok(vec![]);
    }

    let watched = store
        .find_videos_by_ids(&watched_ids)
        .await
        .map_err(AppError::into_recommendation_failure)?;

    let tags: Vec<String> = watched_tags(&watched).into_iter().collect();
    if tags.is_empty() {
        log::debug!("🎯 Watched videos of user {} carry no tags", user_id);
        return Ok(vec![]);
    }

    let recommendations = store
        .find_videos_by_tags_excluding(&tags, &watched_ids, MAX_RECOMMENDATIONS)
        .await
        .map_err(AppError::into_recommendation_failure)?;

    log::debug!(
        "🎯 {} recommendations for user {} from {} tags",
        recommendations.len(),
        user_id,
        tags.len()
    );

    Ok(recommendations)
}

/// Union of the tags of every watched video
fn watched_tags(watched: &[Video]) -> BTreeSet<String> {
    watched
        .iter()
        .flat_map(|video| video.tags.iter().cloned())
        .collect()
}

/// First occurrence of each id, history order kept
fn distinct_ids(ids: &[ObjectId]) -> Vec<ObjectId> {
    let mut seen = HashSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::{sample_user, sample_video, MemoryStore};

    async fn watch(store: &MemoryStore, user: &ObjectId, video: &ObjectId) {
        assert!(store.push_watched_video(user, video).await.unwrap());
    }

    #[tokio::test]
    async fn test_recommends_only_unwatched_overlapping_videos() {
        let store = MemoryStore::new();
        let user = sample_user("u");
        let uid = user.id;
        store.insert_user(&user).await.unwrap();

        let a = sample_video("A", &["music", "live"], &uid);
        let b = sample_video("B", &["music"], &uid);
        let c = sample_video("C", &["music", "festival"], &uid);
        let d = sample_video("D", &["sports"], &uid);
        for v in [&a, &b, &c, &d] {
            store.insert_video(v).await.unwrap();
        }
        watch(&store, &uid, &a.id).await;
        watch(&store, &uid, &b.id).await;

        let result = recommend(&store, &uid.to_hex()).await.unwrap();
        let ids: Vec<ObjectId> = result.iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![c.id]);
    }

    #[tokio::test]
    async fn test_empty_history_yields_nothing() {
        let store = MemoryStore::new();
        let user = sample_user("fresh");
        store.insert_user(&user).await.unwrap();
        store
            .insert_video(&sample_video("any", &["music"], &user.id))
            .await
            .unwrap();

        let result = recommend(&store, &user.id.to_hex()).await.unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_untagged_history_yields_nothing() {
        let store = MemoryStore::new();
        let user = sample_user("u");
        store.insert_user(&user).await.unwrap();
        let untagged = sample_video("plain", &[], &user.id);
        store.insert_video(&untagged).await.unwrap();
        store
            .insert_video(&sample_video("tagged", &["music"], &user.id))
            .await
            .unwrap();
        watch(&store, &user.id, &untagged.id).await;

        let result = recommend(&store, &user.id.to_hex()).await.unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_result_is_capped_and_respects_overlap() {
        let store = MemoryStore::new();
        let user = sample_user("u");
        let uid = user.id;
        store.insert_user(&user).await.unwrap();

        let seen = sample_video("seen", &["cooking", "travel"], &uid);
        store.insert_video(&seen).await.unwrap();
        for i in 0..15 {
            let tag = if i % 2 == 0 { "cooking" } else { "travel" };
            store
                .insert_video(&sample_video(&format!("v{}", i), &[tag], &uid))
                .await
                .unwrap();
        }
        for i in 0..5 {
            store
                .insert_video(&sample_video(&format!("other{}", i), &["news"], &uid))
                .await
                .unwrap();
        }
        watch(&store, &uid, &seen.id).await;
        // Repeated watch events do not change the outcome
        watch(&store, &uid, &seen.id).await;

        let result = recommend(&store, &uid.to_hex()).await.unwrap();
        assert_eq!(result.len(), MAX_RECOMMENDATIONS as usize);
        for video in &result {
            assert_ne!(video.id, seen.id);
            assert!(video.tags.iter().any(|t| t == "cooking" || t == "travel"));
        }
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let store = MemoryStore::new();

        let err = recommend(&store, &ObjectId::new().to_hex()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = recommend(&store, "definitely-not-an-id").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_store_fault_is_recommendation_failure() {
        let store = MemoryStore::new();
        let user = sample_user("u");
        store.insert_user(&user).await.unwrap();
        store.set_failing(true);

        let err = recommend(&store, &user.id.to_hex()).await.unwrap_err();
        assert_eq!(
            err,
            AppError::RecommendationFailed("server selection timeout".to_string())
        );
    }

    #[test]
    fn test_tag_union_collapses_duplicates() {
        let owner = ObjectId::new();
        let videos = vec![
            sample_video("a", &["music", "live"], &owner),
            sample_video("b", &["music"], &owner),
        ];
        let tags: Vec<String> = watched_tags(&videos).into_iter().collect();
        assert_eq!(tags, vec!["live".to_string(), "music".to_string()]);
    }

    #[test]
    fn test_distinct_ids_keeps_first_occurrence() {
        let (a, b) = (ObjectId::new(), ObjectId::new());
        assert_eq!(distinct_ids(&[a, b, a, b, a]), vec![a, b]);
    }
}
