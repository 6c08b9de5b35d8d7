//! Review data types
//!
//! [`Review`] is the strongly-typed shape every store hands to the selector.
//! Raw documents are coalesced into it by [`Review::from_document`], so
//! malformed fields never reach selection logic.

use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result};

/// Default classification tag for reviews
pub const DEFAULT_REVIEW_TYPE: &str = "testimonial";

/// Display name used when a document has no reviewer name
pub const ANONYMOUS_CUSTOMER: &str = "Anonymous";

const MAX_STAFF_ID_LEN: usize = 128;

/// Validated staff member identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct StaffId(String);

impl StaffId {
    /// Parse a staff identifier
    ///
    /// Surrounding whitespace is trimmed. Empty identifiers, identifiers
    /// longer than 128 characters, and identifiers containing `/` or control
    /// characters are rejected.
    pub fn parse(raw: &str) -> Result<Self> {
        let id = raw.trim();

        if id.is_empty() {
            return Err(Error::InvalidArgument("staff_id must not be empty".to_string()));
        }

        if id.chars().count() > MAX_STAFF_ID_LEN {
            return Err(Error::InvalidArgument(format!(
                "staff_id must be at most {} characters",
                MAX_STAFF_ID_LEN
            )));
        }

        if id.chars().any(|c| c == '/' || c.is_control()) {
            return Err(Error::InvalidArgument(format!(
                "staff_id contains invalid characters: {:?}",
                id
            )));
        }

        Ok(Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StaffId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StaffId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A customer review of a staff member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Unique identifier within the store
    pub id: String,

    /// Staff member the review targets (empty for generic entries)
    pub staff_id: String,

    /// Display name of the reviewer
    pub customer_name: String,

    /// Rating from 1 to 5, None when missing or out of range
    pub stars: Option<u8>,

    /// Free-form review text
    pub text: String,

    /// Classification tag (e.g. "testimonial")
    #[serde(rename = "type")]
    pub review_type: String,

    /// Manually curated highlight
    pub featured_review: bool,

    /// Store-assigned creation time
    pub created_at: Option<DateTime<Utc>>,
}

impl Review {
    /// Coalesce an untyped store document into a review
    ///
    /// Returns None when the document has no usable `id` or `staffId`.
    /// Every other field falls back to a default when missing or malformed.
    pub fn from_document(doc: &Value) -> Option<Self> {
        let id = identifier(doc.get("id"))?;
        let staff_id = identifier(doc.get("staffId"))?;

        Some(Self {
            id,
            staff_id,
            customer_name: non_empty_string(doc.get("customerName"))
                .unwrap_or_else(|| ANONYMOUS_CUSTOMER.to_string()),
            stars: doc.get("stars").and_then(coerce_stars),
            text: doc
                .get("text")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            review_type: non_empty_string(doc.get("type"))
                .unwrap_or_else(|| DEFAULT_REVIEW_TYPE.to_string()),
            featured_review: doc.get("featuredReview").is_some_and(coerce_flag),
            created_at: doc.get("createdAt").and_then(coerce_timestamp),
        })
    }

    /// Ordering key for "top rated": missing stars rank below any rating
    pub fn rank(&self) -> u8 {
        self.stars.unwrap_or(0)
    }
}

/// Input for creating a review through the write path
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub staff_id: String,
    pub customer_name: String,
    pub stars: u8,
    #[serde(default)]
    pub text: String,
    #[serde(rename = "type", default = "default_review_type")]
    pub review_type: String,
    #[serde(default)]
    pub featured_review: bool,
}

fn default_review_type() -> String {
    DEFAULT_REVIEW_TYPE.to_string()
}

impl NewReview {
    /// Create a new review input with default type and no text
    pub fn new(staff_id: impl Into<String>, customer_name: impl Into<String>, stars: u8) -> Self {
        Self {
            staff_id: staff_id.into(),
            customer_name: customer_name.into(),
            stars,
            text: String::new(),
            review_type: default_review_type(),
            featured_review: false,
        }
    }

    /// Set the review text
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Mark the review as featured
    pub fn featured(mut self) -> Self {
        self.featured_review = true;
        self
    }

    /// Check the input before it is written, returning the parsed staff id
    pub fn validate(&self) -> Result<StaffId> {
        let staff_id = StaffId::parse(&self.staff_id)?;

        if self.customer_name.trim().is_empty() {
            return Err(Error::InvalidArgument(
                "customerName must not be empty".to_string(),
            ));
        }

        if !(1..=5).contains(&self.stars) {
            return Err(Error::InvalidArgument(format!(
                "stars must be between 1 and 5, got {}",
                self.stars
            )));
        }

        Ok(staff_id)
    }
}

fn identifier(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn non_empty_string(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn coerce_stars(value: &Value) -> Option<u8> {
    let stars = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))?,
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };

    (1..=5).contains(&stars).then_some(stars as u8)
}

fn coerce_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_i64() == Some(1),
        Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}

fn coerce_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => Utc.timestamp_millis_opt(n.as_i64()?).single(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_staff_id_trims() {
        let id = StaffId::parse("  S1 ").unwrap();
        assert_eq!(id.as_str(), "S1");
    }

    #[test]
    fn test_staff_id_rejects_bad_shapes() {
        for raw in ["", "   ", "a/b", "tab\there", &"x".repeat(129)] {
            assert!(
                matches!(StaffId::parse(raw), Err(Error::InvalidArgument(_))),
                "expected {:?} to be rejected",
                raw
            );
        }
    }

    #[test]
    fn test_from_document_full() {
        let doc = json!({
            "id": "r1",
            "staffId": "S1",
            "customerName": "Ada",
            "stars": 4,
            "text": "Great shift",
            "type": "testimonial",
            "featuredReview": true,
            "createdAt": "2024-03-01T10:00:00Z"
        });

        let review = Review::from_document(&doc).unwrap();
        assert_eq!(review.id, "r1");
        assert_eq!(review.staff_id, "S1");
        assert_eq!(review.customer_name, "Ada");
        assert_eq!(review.stars, Some(4));
        assert!(review.featured_review);
        assert_eq!(
            review.created_at,
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_from_document_defaults() {
        let doc = json!({ "id": 17, "staffId": "S9" });

        let review = Review::from_document(&doc).unwrap();
        assert_eq!(review.id, "17");
        assert_eq!(review.customer_name, ANONYMOUS_CUSTOMER);
        assert_eq!(review.stars, None);
        assert_eq!(review.text, "");
        assert_eq!(review.review_type, DEFAULT_REVIEW_TYPE);
        assert!(!review.featured_review);
        assert!(review.created_at.is_none());
    }

    #[test]
    fn test_from_document_coerces_loose_fields() {
        let doc = json!({
            "id": "r2",
            "staffId": "S1",
            "stars": "5",
            "featuredReview": "TRUE",
            "createdAt": 1_700_000_000_000_i64
        });

        let review = Review::from_document(&doc).unwrap();
        assert_eq!(review.stars, Some(5));
        assert!(review.featured_review);
        assert_eq!(review.created_at.unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_from_document_out_of_range_stars() {
        for stars in [json!(0), json!(6), json!(-3), json!(4.5), json!("lots"), json!(null)] {
            let doc = json!({ "id": "r", "staffId": "S", "stars": stars });
            assert_eq!(Review::from_document(&doc).unwrap().stars, None);
        }
    }

    #[test]
    fn test_from_document_requires_ids() {
        assert!(Review::from_document(&json!({ "staffId": "S1" })).is_none());
        assert!(Review::from_document(&json!({ "id": "r1" })).is_none());
        assert!(Review::from_document(&json!({ "id": "", "staffId": "S1" })).is_none());
        assert!(Review::from_document(&json!("not an object")).is_none());
    }

    #[test]
    fn test_serializes_camel_case() {
        let review = Review::from_document(&json!({ "id": "r1", "staffId": "S1", "stars": 3 }))
            .unwrap();
        let value = serde_json::to_value(&review).unwrap();
        assert_eq!(value["staffId"], "S1");
        assert_eq!(value["customerName"], ANONYMOUS_CUSTOMER);
        assert_eq!(value["type"], DEFAULT_REVIEW_TYPE);
        assert_eq!(value["featuredReview"], false);
        assert!(value["createdAt"].is_null());
    }

    #[test]
    fn test_new_review_validation() {
        assert!(NewReview::new("S1", "Ada", 5).validate().is_ok());
        assert!(NewReview::new("", "Ada", 5).validate().is_err());
        assert!(NewReview::new("S1", "  ", 5).validate().is_err());
        assert!(NewReview::new("S1", "Ada", 0).validate().is_err());
        assert!(NewReview::new("S1", "Ada", 6).validate().is_err());
    }

    #[test]
    fn test_new_review_json_defaults() {
        let input: NewReview =
            serde_json::from_str(r#"{"staffId":"S1","customerName":"Ada","stars":4}"#).unwrap();
        assert_eq!(input.review_type, DEFAULT_REVIEW_TYPE);
        assert!(!input.featured_review);
        assert_eq!(input.text, "");
    }
}
