use gallery_core::{
    AppViewModel, CardModel, DetailModel, DetailView, StatusTone, UploadState, UploadView,
};

pub fn render_cards(view: &AppViewModel) -> Vec<String> {
    if view.loading {
        return vec!["Loading records...".to_string()];
    }
    if let Some(error) = &view.error {
        return vec![format!("Error: {error}")];
    }
    if view.cards.is_empty() {
        return vec!["No records found.".to_string()];
    }
    view.cards.iter().flat_map(card_lines).collect()
}

fn card_lines(card: &CardModel) -> Vec<String> {
    let mut lines = vec![format!("[{}] {}", card.id, card.title)];
    if !card.description.is_empty() {
        lines.push(format!("    {}", card.description));
    }
    lines.push(format!("    image: {}", card.image.url));
    if !card.created_date.is_empty() {
        lines.push(format!("    created: {}", card.created_date));
    }
    lines
}

pub fn render_detail(view: &AppViewModel) -> Vec<String> {
    match &view.detail {
        DetailView::Empty => vec!["Nothing selected.".to_string()],
        DetailView::Loading => vec!["Loading record...".to_string()],
        DetailView::NotFound => vec!["Record not found.".to_string()],
        DetailView::Error(message) => vec![format!("Error: {message}")],
        DetailView::Ready(detail) => detail_lines(detail),
    }
}

fn detail_lines(detail: &DetailModel) -> Vec<String> {
    let mut lines = vec![detail.title.clone()];
    if !detail.summary.is_empty() {
        lines.push(detail.summary.clone());
    }
    let facts = [
        ("BHK", &detail.bhk_type),
        ("Type", &detail.property_type),
        ("Location", &detail.location),
        ("Price", &detail.price),
        ("Furnished", &detail.furnished),
        ("Area (sqft)", &detail.area_sqft),
    ];
    for (label, value) in facts {
        if !value.is_empty() {
            lines.push(format!("{label}: {value}"));
        }
    }
    if let Some(tone) = detail.status_tone {
        let marker = match tone {
            StatusTone::Positive => "+",
            StatusTone::Negative => "-",
            StatusTone::Neutral => "~",
        };
        lines.push(format!("Status: {} ({marker})", detail.status));
    }
    if !detail.amenities.is_empty() {
        lines.push(format!("Amenities: {}", detail.amenities.join(" | ")));
    }
    if !detail.highlights.is_empty() {
        lines.push("Highlights:".to_string());
        lines.extend(detail.highlights.iter().map(|item| format!("  * {item}")));
    }
    lines.push(format!("Image: {}", detail.image.url));
    if !detail.created_date.is_empty() {
        lines.push(format!("Created: {}", detail.created_date));
    }
    lines
}

/// One status line for the upload surface.
pub fn render_upload(view: &UploadView) -> String {
    let file = match (&view.file_name, &view.file_size_mb, &view.duration_secs) {
        (Some(name), Some(size), Some(secs)) => format!("{name} ({size} MB, {secs}s)"),
        (Some(name), _, _) => name.clone(),
        _ => "no file".to_string(),
    };
    match view.state {
        UploadState::Idle if view.probing => format!("Checking {file}..."),
        UploadState::Idle => match &view.message {
            Some(message) => format!("Rejected: {message}"),
            None if view.can_submit => format!("Ready: {file}"),
            None => "Pick a video to upload.".to_string(),
        },
        UploadState::Uploading => format!("Uploading {file}: {}%", view.progress),
        UploadState::Processing => format!("Processing {file}..."),
        UploadState::Queued => format!(
            "Queued {file} as job {}",
            view.job_id.as_deref().unwrap_or("?")
        ),
        UploadState::Error => format!(
            "Upload failed: {}",
            view.message.as_deref().unwrap_or("unknown error")
        ),
    }
}
