use gallery_core::{
    present_card, present_detail, Fields, ImageRef, Record, StatusTone, DEFAULT_CARD_TITLE,
    PLACEHOLDER_IMAGE_URL, PRICE_ON_REQUEST,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn record(fields: Value) -> Record {
    let Value::Object(fields) = fields else {
        panic!("fields must be a JSON object");
    };
    Record::new("rec1", fields, "2024-01-15T10:30:00.000Z")
}

#[test]
fn title_uses_the_only_candidate_present() {
    let card = present_card(&record(json!({ "title": "X" })));
    assert_eq!(card.title, "X");
}

#[test]
fn title_defaults_without_candidates() {
    let card = present_card(&record(json!({ "rating": 5 })));
    assert_eq!(card.title, DEFAULT_CARD_TITLE);
    assert_eq!(card.description, "");
}

#[test]
fn old_and_new_key_spellings_both_work() {
    let old = present_card(&record(json!({ "Name": "Old", "Notes": "legacy notes" })));
    let new = present_card(&record(json!({ "title": "New", "description": "fresh" })));
    assert_eq!((old.title.as_str(), old.description.as_str()), ("Old", "legacy notes"));
    assert_eq!((new.title.as_str(), new.description.as_str()), ("New", "fresh"));
}

#[test]
fn image_attachment_array_yields_first_url() {
    let card = present_card(&record(json!({ "image": [{ "url": "A" }, { "url": "Z" }] })));
    assert_eq!(card.image, ImageRef::direct("A"));
}

#[test]
fn image_bare_string_is_direct_url() {
    let card = present_card(&record(json!({ "image": "B" })));
    assert_eq!(card.image.url, "B");
    assert!(!card.image.is_placeholder);
}

#[test]
fn missing_image_is_placeholder() {
    let card = present_card(&record(json!({ "title": "No picture" })));
    assert_eq!(card.image.url, PLACEHOLDER_IMAGE_URL);
    assert!(card.image.is_placeholder);
}

#[test]
fn detail_maps_property_schema() {
    let detail = present_detail(&record(json!({
        "title": "2BHK near park",
        "summary": "Bright corner flat",
        "bhk_type": "2 BHK",
        "property_type": "Apartment",
        "location": ["Baner", "Pune"],
        "status": "Available",
        "furnished_status": "Semi",
        "area_sqft": 950,
        "amenities": ["Lift", "Parking"],
        "highlights": "Corner unit, East facing",
        "screenshot_refs": [{ "url": "https://cdn.example.com/s1.png" }]
    })));

    assert_eq!(detail.title, "2BHK near park");
    assert_eq!(detail.summary, "Bright corner flat");
    assert_eq!(detail.bhk_type, "2 BHK");
    assert_eq!(detail.property_type, "Apartment");
    assert_eq!(detail.location, "Baner, Pune");
    assert_eq!(detail.price, PRICE_ON_REQUEST);
    assert_eq!(detail.status_tone, Some(StatusTone::Positive));
    assert_eq!(detail.furnished, "Semi");
    assert_eq!(detail.area_sqft, "950");
    assert_eq!(detail.amenities, vec!["Lift", "Parking"]);
    assert_eq!(detail.highlights, vec!["Corner unit", "East facing"]);
    assert_eq!(detail.image.url, "https://cdn.example.com/s1.png");
    assert_eq!(detail.created_date, "2024-01-15");
}

#[test]
fn detail_falls_back_to_legacy_keys() {
    let detail = present_detail(&record(json!({
        "Name": "Legacy row",
        "Notes": "from the old table",
        "Assignee": "3 BHK",
        "Status": "Villa",
        "Attachment Summary": "Kothrud",
        "status 2": "Sold",
        "Attachments": "1800",
        "screenshot_refs": "https://cdn.example.com/direct.png"
    })));

    assert_eq!(detail.title, "Legacy row");
    assert_eq!(detail.summary, "from the old table");
    assert_eq!(detail.bhk_type, "3 BHK");
    assert_eq!(detail.property_type, "Villa");
    assert_eq!(detail.location, "Kothrud");
    assert_eq!(detail.status, "Sold");
    assert_eq!(detail.status_tone, Some(StatusTone::Negative));
    assert_eq!(detail.area_sqft, "1800");
    assert_eq!(detail.image.url, "https://cdn.example.com/direct.png");
    assert!(detail.amenities.is_empty());
}

#[test]
fn presenting_twice_is_identical() {
    let rec = record(json!({
        "title": "Same",
        "image": [{ "url": "https://cdn.example.com/x.jpg" }],
        "highlights": "a, b"
    }));
    assert_eq!(present_card(&rec), present_card(&rec));
    assert_eq!(present_detail(&rec), present_detail(&rec));
}

#[test]
fn empty_fields_present_cleanly() {
    let rec = Record::new("rec0", Fields::new(), "");
    let detail = present_detail(&rec);
    assert_eq!(detail.status_tone, None);
    assert_eq!(detail.created_date, "");
    assert!(detail.image.is_placeholder);
}
