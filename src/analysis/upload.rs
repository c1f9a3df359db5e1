use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use thiserror::Error;
use tracing::{info, instrument};

use crate::analysis::dto::AnalysisResult;
use crate::analysis::mock::{food_name_from_file_name, generate_mock_analysis};
use crate::state::AppState;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("`{file_name}` is not an image (content type {content_type})")]
    NotAnImage {
        file_name: String,
        content_type: String,
    },
    #[error("`{0}` is empty")]
    Empty(String),
}

pub struct UploadItem<'a> {
    pub file_name: &'a str,
    pub body: Bytes,
    pub content_type: &'a str,
}

pub fn mime_from_ext(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "heic" => Some("image/heic"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

pub fn to_data_url(body: &[u8], content_type: &str) -> String {
    format!("data:{};base64,{}", content_type, STANDARD.encode(body))
}

/// Runs the upload flow: simulated latency, mock result, then the result
/// becomes current and is prepended to history.
#[instrument(skip(st, item), fields(file = %item.file_name, bytes = item.body.len()))]
pub async fn analyze_upload(
    st: &mut AppState,
    item: UploadItem<'_>,
) -> anyhow::Result<AnalysisResult> {
    if !item.content_type.starts_with("image/") {
        return Err(UploadError::NotAnImage {
            file_name: item.file_name.to_string(),
            content_type: item.content_type.to_string(),
        }
        .into());
    }
    if item.body.is_empty() {
        return Err(UploadError::Empty(item.file_name.to_string()).into());
    }

    let image_url = to_data_url(&item.body, item.content_type);
    let food_name = food_name_from_file_name(item.file_name);

    st.analysis.set_analyzing(true);
    tokio::time::sleep(st.config.analysis_delay).await;
    let result = generate_mock_analysis(&food_name, &image_url);

    st.analysis.set_current(result.clone());
    let saved = st.analysis.add_to_history(result.clone()).await;
    st.analysis.set_analyzing(false);
    saved?;

    info!(id = %result.id, food = %result.food_name, "analysis complete");
    Ok(result)
}
