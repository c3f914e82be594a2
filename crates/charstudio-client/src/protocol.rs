//! `generateContent` wire types.
//!
//! Request and response bodies for the model's JSON API. A part is
//! either text or inline base64 image data; part order and MIME types
//! are preserved faithfully in both directions. Response types default
//! every field so unfamiliar additions from the server never fail a
//! parse.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

use charstudio_core::{AspectRatio, ImageResource};

/// Inline image payload: base64 bytes plus their MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    /// MIME type of the encoded bytes, e.g. `image/png`.
    pub mime_type: String,
    /// Base64-encoded image bytes.
    pub data: String,
}

impl InlineData {
    /// Render as a `data:` URI without decoding the payload.
    #[must_use]
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// One content part. Exactly one of the fields is set on anything we
/// send; the server may add part kinds we ignore, so both are optional
/// on the way in.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    /// Plain text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Inline image data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    /// A text part.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// An inline image part, base64-encoding the bytes.
    #[must_use]
    pub fn inline_image(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            inline_data: Some(InlineData {
                mime_type: mime_type.into(),
                data: BASE64.encode(bytes),
            }),
            ..Self::default()
        }
    }

    /// An inline image part from an uploaded resource, bytes forwarded
    /// exactly as received.
    #[must_use]
    pub fn from_resource(resource: &ImageResource) -> Self {
        Self::inline_image(resource.mime_type.clone(), &resource.bytes)
    }
}

/// An ordered list of parts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Content {
    /// The parts, in order.
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// Requested output shape for generated images.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    /// Wire label, e.g. `"16:9"`.
    pub aspect_ratio: String,
}

/// Generation parameters. We always request both image and text
/// modalities back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Modalities the response may contain.
    pub response_modalities: Vec<String>,
    /// Output aspect ratio, when the caller requests one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_config: Option<ImageConfig>,
}

/// Request body for `models/{model}:generateContent`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// One content entry holding the ordered parts.
    pub contents: Vec<Content>,
    /// Generation parameters.
    pub generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    /// Build a request from ordered parts, optionally pinning the
    /// output aspect ratio.
    #[must_use]
    pub fn new(parts: Vec<Part>, aspect_ratio: Option<AspectRatio>) -> Self {
        Self {
            contents: vec![Content { parts }],
            generation_config: GenerationConfig {
                response_modalities: vec!["IMAGE".to_string(), "TEXT".to_string()],
                image_config: aspect_ratio.map(|ratio| ImageConfig {
                    aspect_ratio: ratio.label().to_string(),
                }),
            },
        }
    }
}

/// One response candidate.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Candidate {
    /// The candidate's content, absent on safety blocks.
    #[serde(default)]
    pub content: Option<Content>,
}

/// Response body from `generateContent`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GenerateContentResponse {
    /// Candidates, best first. Only the first is consumed.
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// The first candidate's parts, in order. Empty when the response
    /// carried no usable content.
    #[must_use]
    pub fn parts(&self) -> &[Part] {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map_or(&[], |content| content.parts.as_slice())
    }
}

/// Error detail the API returns alongside non-2xx statuses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    /// The nested error object.
    #[serde(default)]
    pub error: ApiErrorDetail,
}

/// The nested error object inside [`ApiErrorBody`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorDetail {
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
}
