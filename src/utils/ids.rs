use mongodb::bson::oid::ObjectId;

use super::error::{AppError, AppResult};

/// Parses an id coming from the outside world.
///
/// A malformed id can never resolve to a stored entity, so it is reported the
/// same way as an unknown one.
pub fn parse_id(raw: &str, entity: &str) -> AppResult<ObjectId> {
    ObjectId::parse_str(raw.trim()).map_err(|_| AppError::NotFound(format!("{} not found", entity)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        let id = ObjectId::new();
        assert_eq!(parse_id(&id.to_hex(), "Video").unwrap(), id);
        assert_eq!(
            parse_id("not-an-id", "Video"),
            Err(AppError::NotFound("Video not found".into()))
        );
    }
}
