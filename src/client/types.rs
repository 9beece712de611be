use serde::{Deserialize, Serialize};

use crate::upload::Performance;

/// JSON body the upload endpoint accepts. Chunked uploads additionally
/// set `session_id`, `chunk_index`, and `is_chunk`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    pub file_data: String,
    pub file_name: String,
    pub file_type: String,
    pub reference_id: String,
    pub section_name: String,
    pub document_name: String,
    pub zoneinfo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_chunk: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub url: String,
    pub key: String,
    /// Server-reported timings, when the endpoint measures them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance: Option<Performance>,
}

/// Reassembly request: ordered chunk keys plus the session that
/// produced them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombineRequest {
    pub chunk_keys: Vec<String>,
    pub session_id: String,
    pub reference_id: String,
    pub section_name: String,
    pub document_name: String,
    pub zoneinfo: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombineResponse {
    pub url: String,
    pub key: String,
}
