//! Sample receipt listing for demo clients.

use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;
use tally_core::AppError;

const SAMPLE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

#[derive(Debug, Serialize, PartialEq)]
pub struct SampleImage {
    pub name: String,
    pub url: String,
}

fn is_sample_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SAMPLE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Image files in `dir`, sorted by name. A missing directory yields an empty list.
pub async fn read_samples(dir: &Path, url_prefix: &str) -> Result<Vec<SampleImage>, AppError> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut samples = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !entry.file_type().await?.is_file() || !is_sample_image(&path) {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        samples.push(SampleImage {
            name: name.to_string(),
            url: format!("{}/{}", url_prefix, name),
        });
    }

    samples.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(samples)
}

pub async fn list_samples(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let samples = read_samples(&state.samples.dir, &state.samples.url_prefix).await?;
    Ok(Json(samples))
}
