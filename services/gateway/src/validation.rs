//! Payload validation and sanitization
//!
//! Malformed input stops here with VALIDATION_FAILURE; the engines only
//! ever see sanitized values. Limits are deliberately generous, they exist
//! to bound storage, not to police content.

use crate::error::AppError;
use crate::models::{CreateItemRequest, CreateRatingRequest, UpdateItemRequest, UpdateRatingRequest};
use item_registry::NewItem;
use loyalty_ledger::CreateRating;
use types::item::{ImageRef, ItemEdit};
use types::rating::Score;

const TITLE_MAX: usize = 120;
const DESCRIPTION_MAX: usize = 2000;
const CATEGORY_MAX: usize = 60;
const COMMENT_MAX: usize = 1000;
const IMAGES_MAX: usize = 10;

fn clean_text(value: &str, field: &str, max: usize, required: bool) -> Result<String, AppError> {
    let trimmed = value.trim();
    if required && trimmed.is_empty() {
        return Err(AppError::BadRequest(format!("{} must not be empty", field)));
    }
    if trimmed.chars().count() > max {
        return Err(AppError::BadRequest(format!(
            "{} exceeds {} characters",
            field, max
        )));
    }
    Ok(trimmed.to_string())
}

fn clean_images(images: Vec<String>) -> Result<Vec<ImageRef>, AppError> {
    if images.len() > IMAGES_MAX {
        return Err(AppError::BadRequest(format!(
            "at most {} images per listing",
            IMAGES_MAX
        )));
    }
    images
        .into_iter()
        .map(|raw| {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                Err(AppError::BadRequest("image reference must not be empty".into()))
            } else {
                Ok(ImageRef::new(trimmed))
            }
        })
        .collect()
}

fn clean_location(location: Option<types::item::GeoPoint>) -> Result<Option<types::item::GeoPoint>, AppError> {
    if let Some(point) = &location {
        if !(-90.0..=90.0).contains(&point.lat) || !(-180.0..=180.0).contains(&point.lon) {
            return Err(AppError::BadRequest("location out of range".into()));
        }
    }
    Ok(location)
}

/// Sanitize a listing creation payload
pub fn validate_new_item(payload: CreateItemRequest) -> Result<NewItem, AppError> {
    Ok(NewItem {
        title: clean_text(&payload.title, "title", TITLE_MAX, true)?,
        description: clean_text(&payload.description, "description", DESCRIPTION_MAX, false)?,
        category: clean_text(&payload.category, "category", CATEGORY_MAX, true)?.to_lowercase(),
        condition: payload.condition,
        location: clean_location(payload.location)?,
        images: clean_images(payload.images)?,
    })
}

/// Sanitize a listing edit payload
pub fn validate_item_edit(payload: UpdateItemRequest) -> Result<ItemEdit, AppError> {
    Ok(ItemEdit {
        title: payload
            .title
            .map(|t| clean_text(&t, "title", TITLE_MAX, true))
            .transpose()?,
        description: payload
            .description
            .map(|d| clean_text(&d, "description", DESCRIPTION_MAX, false))
            .transpose()?,
        category: payload
            .category
            .map(|c| clean_text(&c, "category", CATEGORY_MAX, true).map(|c| c.to_lowercase()))
            .transpose()?,
        condition: payload.condition,
        location: clean_location(payload.location)?,
    })
}

/// Sanitize an image reference
pub fn validate_image(raw: String) -> Result<ImageRef, AppError> {
    let mut refs = clean_images(vec![raw])?;
    Ok(refs.remove(0))
}

fn clean_score(raw: u8) -> Result<Score, AppError> {
    Score::try_new(raw)
        .ok_or_else(|| AppError::BadRequest(format!("score must be in [1,5], got {}", raw)))
}

fn clean_comment(comment: Option<String>) -> Result<Option<String>, AppError> {
    comment
        .map(|c| clean_text(&c, "comment", COMMENT_MAX, false))
        .transpose()
        .map(|c| c.filter(|s| !s.is_empty()))
}

/// Sanitize a rating creation payload
pub fn validate_new_rating(payload: CreateRatingRequest) -> Result<CreateRating, AppError> {
    Ok(CreateRating {
        reviewee_id: payload.reviewee_id,
        trade_id: payload.trade_id,
        score: clean_score(payload.score)?,
        comment: clean_comment(payload.comment)?,
    })
}

/// Sanitize a rating revision payload
pub fn validate_rating_update(
    payload: UpdateRatingRequest,
) -> Result<(Score, Option<String>), AppError> {
    Ok((clean_score(payload.score)?, clean_comment(payload.comment)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::item::ItemCondition;

    fn item_payload() -> CreateItemRequest {
        CreateItemRequest {
            title: "  Record player  ".to_string(),
            description: "Belt drive".to_string(),
            category: "Electronics".to_string(),
            condition: ItemCondition::Good,
            location: None,
            images: vec!["img/a.jpg".to_string()],
        }
    }

    #[test]
    fn test_new_item_trimmed_and_lowercased() {
        let item = validate_new_item(item_payload()).unwrap();
        assert_eq!(item.title, "Record player");
        assert_eq!(item.category, "electronics");
        assert_eq!(item.images.len(), 1);
    }

    #[test]
    fn test_empty_title_rejected() {
        let mut payload = item_payload();
        payload.title = "   ".to_string();
        assert!(validate_new_item(payload).is_err());
    }

    #[test]
    fn test_oversized_title_rejected() {
        let mut payload = item_payload();
        payload.title = "x".repeat(121);
        assert!(validate_new_item(payload).is_err());
    }

    #[test]
    fn test_too_many_images_rejected() {
        let mut payload = item_payload();
        payload.images = (0..11).map(|i| format!("img/{}.jpg", i)).collect();
        assert!(validate_new_item(payload).is_err());
    }

    #[test]
    fn test_location_bounds() {
        let mut payload = item_payload();
        payload.location = Some(types::item::GeoPoint { lat: 91.0, lon: 0.0 });
        assert!(validate_new_item(payload).is_err());
    }

    #[test]
    fn test_score_bounds() {
        assert!(clean_score(0).is_err());
        assert!(clean_score(6).is_err());
        assert_eq!(clean_score(5).unwrap().stars(), 5);
    }

    #[test]
    fn test_blank_comment_becomes_none() {
        let cleaned = clean_comment(Some("   ".to_string())).unwrap();
        assert!(cleaned.is_none());
    }
}
