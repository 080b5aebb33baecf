//! Record → display mapping.
//!
//! Field names drifted across schema revisions, so every logical field is
//! looked up through an ordered list of candidate keys and the first
//! present, non-empty value wins.

use chrono::DateTime;
use serde_json::Value;

use crate::{Fields, Record, RecordId};

pub const PLACEHOLDER_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1560518883-ce09059eeffa?auto=format&fit=crop&w=800&q=80";
pub const DEFAULT_CARD_TITLE: &str = "Untitled";
pub const DEFAULT_DETAIL_TITLE: &str = "Untitled Property";
pub const PRICE_ON_REQUEST: &str = "Price on request";

const LIST_DELIMITER: &str = ", ";

const CARD_TITLE_KEYS: &[&str] = &["title", "Title", "name", "Name"];
const CARD_DESCRIPTION_KEYS: &[&str] = &["description", "Description", "notes", "Notes"];
const CARD_IMAGE_KEYS: &[&str] = &["image", "Image", "photo", "Photo"];

const DETAIL_TITLE_KEYS: &[&str] = &["title", "Name"];
const DETAIL_SUMMARY_KEYS: &[&str] = &["summary", "Notes"];
const DETAIL_BHK_KEYS: &[&str] = &["bhk_type", "Assignee"];
const DETAIL_PROPERTY_KEYS: &[&str] = &["property_type", "Status"];
const DETAIL_LOCATION_KEYS: &[&str] = &["location", "Attachment Summary"];
const DETAIL_PRICE_KEYS: &[&str] = &["price_estimate"];
const DETAIL_STATUS_KEYS: &[&str] = &["status", "status 2"];
const DETAIL_FURNISHED_KEYS: &[&str] = &["furnished_status"];
const DETAIL_AREA_KEYS: &[&str] = &["area_sqft", "Attachments"];
const DETAIL_AMENITY_KEYS: &[&str] = &["amenities"];
const DETAIL_HIGHLIGHT_KEYS: &[&str] = &["highlights"];
const DETAIL_IMAGE_KEYS: &[&str] = &["screenshot_refs", "image", "Image", "photo", "Photo"];

/// Image to show, remembering whether it is already the placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub url: String,
    pub is_placeholder: bool,
}

impl ImageRef {
    pub fn direct(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            is_placeholder: false,
        }
    }

    pub fn placeholder() -> Self {
        Self {
            url: PLACEHOLDER_IMAGE_URL.to_string(),
            is_placeholder: true,
        }
    }

    /// Replacement after a failed load. The placeholder itself is never retried.
    pub fn on_load_error(&self) -> Option<ImageRef> {
        if self.is_placeholder {
            None
        } else {
            Some(Self::placeholder())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Positive,
    Negative,
    Neutral,
}

impl StatusTone {
    fn of(status: &str) -> Option<Self> {
        match status {
            "" => None,
            "Available" => Some(StatusTone::Positive),
            "Sold" => Some(StatusTone::Negative),
            _ => Some(StatusTone::Neutral),
        }
    }
}

/// Grid card for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardModel {
    pub id: RecordId,
    pub title: String,
    pub description: String,
    pub image: ImageRef,
    pub created_date: String,
}

/// Detail page for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailModel {
    pub id: RecordId,
    pub title: String,
    pub summary: String,
    pub bhk_type: String,
    pub property_type: String,
    pub location: String,
    pub price: String,
    pub status: String,
    pub status_tone: Option<StatusTone>,
    pub furnished: String,
    pub area_sqft: String,
    pub amenities: Vec<String>,
    pub highlights: Vec<String>,
    pub image: ImageRef,
    pub created_date: String,
}

pub fn present_card(record: &Record) -> CardModel {
    let fields = &record.fields;
    CardModel {
        id: record.id.clone(),
        title: text_field(fields, CARD_TITLE_KEYS, DEFAULT_CARD_TITLE),
        description: text_field(fields, CARD_DESCRIPTION_KEYS, ""),
        image: image_field(fields, CARD_IMAGE_KEYS),
        created_date: created_date(&record.created_time),
    }
}

pub fn present_detail(record: &Record) -> DetailModel {
    let fields = &record.fields;
    let status = text_field(fields, DETAIL_STATUS_KEYS, "");
    DetailModel {
        id: record.id.clone(),
        title: text_field(fields, DETAIL_TITLE_KEYS, DEFAULT_DETAIL_TITLE),
        summary: text_field(fields, DETAIL_SUMMARY_KEYS, ""),
        bhk_type: text_field(fields, DETAIL_BHK_KEYS, ""),
        property_type: text_field(fields, DETAIL_PROPERTY_KEYS, ""),
        location: text_field(fields, DETAIL_LOCATION_KEYS, ""),
        price: text_field(fields, DETAIL_PRICE_KEYS, PRICE_ON_REQUEST),
        status_tone: StatusTone::of(&status),
        status,
        furnished: text_field(fields, DETAIL_FURNISHED_KEYS, ""),
        area_sqft: text_field(fields, DETAIL_AREA_KEYS, ""),
        amenities: list_field(fields, DETAIL_AMENITY_KEYS),
        highlights: list_field(fields, DETAIL_HIGHLIGHT_KEYS),
        image: image_field(fields, DETAIL_IMAGE_KEYS),
        created_date: created_date(&record.created_time),
    }
}

/// First candidate key whose value is present and non-empty.
pub fn first_present<'a>(fields: &'a Fields, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| fields.get(*key))
        .find(|value| is_present(value))
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    }
}

fn text_field(fields: &Fields, keys: &[&str], default: &str) -> String {
    first_present(fields, keys)
        .and_then(value_text)
        .unwrap_or_else(|| default.to_string())
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(value_text).collect();
            (!parts.is_empty()).then(|| parts.join(LIST_DELIMITER))
        }
        Value::Null | Value::Object(_) => None,
    }
}

fn list_field(fields: &Fields, keys: &[&str]) -> Vec<String> {
    match first_present(fields, keys) {
        Some(Value::Array(items)) => items.iter().filter_map(value_text).collect(),
        Some(Value::String(joined)) => joined
            .split(LIST_DELIMITER)
            .filter(|item| !item.is_empty())
            .map(ToOwned::to_owned)
            .collect(),
        _ => Vec::new(),
    }
}

fn image_field(fields: &Fields, keys: &[&str]) -> ImageRef {
    let url = match first_present(fields, keys) {
        Some(Value::Array(items)) => items
            .first()
            .and_then(|attachment| attachment.get("url"))
            .and_then(Value::as_str)
            .filter(|url| !url.trim().is_empty()),
        Some(Value::String(url)) if !url.trim().is_empty() => Some(url.as_str()),
        _ => None,
    };
    url.map(ImageRef::direct).unwrap_or_else(ImageRef::placeholder)
}

fn created_date(created_time: &str) -> String {
    DateTime::parse_from_rfc3339(created_time)
        .map(|parsed| parsed.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| created_time.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            _ => panic!("fields must be an object"),
        }
    }

    #[test]
    fn first_present_skips_empty_values() {
        let f = fields(json!({ "title": "", "Title": null, "name": "Kept", "Name": "Later" }));
        assert_eq!(first_present(&f, CARD_TITLE_KEYS), Some(&json!("Kept")));
    }

    #[test]
    fn numbers_render_as_text() {
        let f = fields(json!({ "area_sqft": 1200 }));
        assert_eq!(text_field(&f, DETAIL_AREA_KEYS, ""), "1200");
    }

    #[test]
    fn location_array_is_joined() {
        let f = fields(json!({ "location": ["Baner", "Pune"] }));
        assert_eq!(text_field(&f, DETAIL_LOCATION_KEYS, ""), "Baner, Pune");
    }

    #[test]
    fn attachment_without_url_falls_back_to_placeholder() {
        let f = fields(json!({ "image": [{ "filename": "x.jpg" }] }));
        assert_eq!(image_field(&f, CARD_IMAGE_KEYS), ImageRef::placeholder());
    }

    #[test]
    fn placeholder_load_error_is_one_shot() {
        let image = ImageRef::direct("https://cdn.example.com/a.jpg");
        let fallback = image.on_load_error().expect("direct image falls back");
        assert!(fallback.is_placeholder);
        assert_eq!(fallback.on_load_error(), None);
    }

    #[test]
    fn created_date_keeps_unparseable_input() {
        assert_eq!(created_date("2024-01-15T10:30:00.000Z"), "2024-01-15");
        assert_eq!(created_date("yesterday"), "yesterday");
    }
}
