//! The generation pipeline.
//!
//! Turns reference images plus a prompt (or a working image plus a
//! painted mask) into an ordered list of result entries, recording one
//! history item per generated image. The pipeline is a state machine:
//! `Idle -> Submitting -> WaitingOnModel -> Idle`, with a guard that
//! rejects a second submission while one is in flight. Every exit path,
//! success or failure, returns to `Idle`.

use charstudio_core::{AspectRatio, HistoryLog, ImageResource};

use crate::client::{ClientError, GeminiClient};
use crate::protocol::{GenerateContentRequest, GenerateContentResponse, Part};

/// Active display language; selects the facial-consistency instruction
/// prepended to fresh-generation prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    /// English.
    #[default]
    En,
    /// Somali.
    So,
}

impl Language {
    /// The fixed instruction that anchors generated faces to the
    /// reference images.
    #[must_use]
    pub const fn consistency_prefix(self) -> &'static str {
        match self {
            Self::En => "Maintain the facial features from these reference images.",
            Self::So => "Astaamaha wejiga ka ilaali sawiradan tixraaca ah.",
        }
    }

    /// The user prompt with the consistency instruction prepended.
    #[must_use]
    pub fn prefixed(self, prompt: &str) -> String {
        format!("{} {prompt}", self.consistency_prefix())
    }
}

/// A validated fresh-generation request: at least one reference image
/// (in slot order) and a non-empty prompt.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Reference images in slot order, empty slots excluded.
    pub references: Vec<ImageResource>,
    /// The user's prompt, as typed.
    pub prompt: String,
    /// Requested output aspect ratio.
    pub aspect_ratio: AspectRatio,
}

impl GenerationRequest {
    /// Check the request invariants.
    ///
    /// # Errors
    ///
    /// [`GenerateError::InvalidRequest`] when no reference image is
    /// present or the prompt is empty after trimming.
    pub fn validate(&self) -> Result<(), GenerateError> {
        if self.references.is_empty() {
            return Err(GenerateError::InvalidRequest(
                "at least one reference image is required",
            ));
        }
        if self.prompt.trim().is_empty() {
            return Err(GenerateError::InvalidRequest("prompt must not be empty"));
        }
        Ok(())
    }
}

/// One classified entry from a model response, in part order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultEntry {
    /// A text part.
    Text(String),
    /// An image part, rendered as a data URI.
    Image(String),
}

/// Pipeline failures. Every variant leaves history untouched except
/// that parts already classified before the failure are discarded; the
/// pipeline always returns to [`Phase::Idle`].
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// A generation is already in flight.
    #[error("a generation is already in flight")]
    Busy,

    /// The request failed validation before submission.
    #[error("invalid request: {0}")]
    InvalidRequest(&'static str),

    /// The model answered, but with no image part.
    #[error("the model returned no image")]
    NoImage,

    /// The round trip itself failed.
    #[error(transparent)]
    Model(#[from] ClientError),
}

/// Anything that can serve a `generateContent` round trip. The real
/// implementation is [`GeminiClient`]; tests substitute a mock.
#[allow(async_fn_in_trait)]
pub trait ImageModel {
    /// Perform one round trip.
    async fn generate(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ClientError>;
}

impl ImageModel for GeminiClient {
    async fn generate(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ClientError> {
        Self::generate(self, request).await
    }
}

/// Pipeline phase, as seen by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Nothing in flight; submission allowed.
    #[default]
    Idle,
    /// Inputs accepted, request being assembled.
    Submitting,
    /// Round trip in progress.
    WaitingOnModel,
}

/// The double-submit guard. The UI holds one of these and brackets
/// every generation with [`Generator::try_begin`] and
/// [`Generator::finish`].
#[derive(Debug, Default)]
pub struct Generator {
    phase: Phase,
}

impl Generator {
    /// A generator in the idle phase.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns `true` when a new submission would be accepted.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    /// Claim the pipeline for a new generation.
    ///
    /// # Errors
    ///
    /// [`GenerateError::Busy`] when a generation is already in flight.
    pub fn try_begin(&mut self) -> Result<(), GenerateError> {
        if self.phase != Phase::Idle {
            return Err(GenerateError::Busy);
        }
        self.phase = Phase::Submitting;
        Ok(())
    }

    /// Mark the round trip as started.
    pub fn waiting(&mut self) {
        self.phase = Phase::WaitingOnModel;
    }

    /// Release the pipeline. Called on every exit path.
    pub fn finish(&mut self) {
        self.phase = Phase::Idle;
    }
}

/// Assemble the parts for a fresh generation: reference images in slot
/// order, then the prefixed prompt text.
#[must_use]
pub fn build_generation_parts(request: &GenerationRequest, language: Language) -> Vec<Part> {
    let mut parts: Vec<Part> = request
        .references
        .iter()
        .map(Part::from_resource)
        .collect();
    parts.push(Part::text(language.prefixed(&request.prompt)));
    parts
}

/// Assemble the parts for a mask-guided edit: the working image, the
/// binarized mask, then the edit prompt with no prefix instruction.
#[must_use]
pub fn build_edit_parts(
    original: &ImageResource,
    mask: &ImageResource,
    edit_prompt: &str,
) -> Vec<Part> {
    vec![
        Part::from_resource(original),
        Part::from_resource(mask),
        Part::text(edit_prompt),
    ]
}

/// Classify a response into ordered result entries.
///
/// Image parts become data URIs; text parts pass through; unfamiliar
/// part kinds are skipped. Order is preserved.
///
/// # Errors
///
/// [`GenerateError::NoImage`] when no part carried image data.
pub fn classify(response: &GenerateContentResponse) -> Result<Vec<ResultEntry>, GenerateError> {
    let mut entries = Vec::new();
    let mut saw_image = false;
    for part in response.parts() {
        if let Some(text) = &part.text {
            entries.push(ResultEntry::Text(text.clone()));
        } else if let Some(inline) = &part.inline_data {
            saw_image = true;
            entries.push(ResultEntry::Image(inline.to_data_uri()));
        }
    }
    if saw_image {
        Ok(entries)
    } else {
        Err(GenerateError::NoImage)
    }
}

/// The image that becomes the active working image: the last image
/// part of a classified response, the same part that ends up newest in
/// the history log.
#[must_use]
pub fn newest_image(entries: &[ResultEntry]) -> Option<&str> {
    entries.iter().rev().find_map(|entry| match entry {
        ResultEntry::Image(uri) => Some(uri.as_str()),
        ResultEntry::Text(_) => None,
    })
}

fn record_images(entries: &[ResultEntry], prompt: &str, ratio: AspectRatio, history: &mut HistoryLog) {
    for entry in entries {
        if let ResultEntry::Image(uri) = entry {
            history.record(uri.clone(), prompt.to_string(), ratio);
        }
    }
}

/// Run a fresh generation end to end: validate, submit, classify, and
/// record one history item per image part (in part order, so the last
/// image part ends up newest).
///
/// The caller brackets this with [`Generator::try_begin`] /
/// [`Generator::finish`] and owns the rotating status display.
///
/// # Errors
///
/// Any [`GenerateError`]; history is untouched on every error.
pub async fn run_generation<M: ImageModel>(
    model: &M,
    request: &GenerationRequest,
    language: Language,
    history: &mut HistoryLog,
) -> Result<Vec<ResultEntry>, GenerateError> {
    request.validate()?;
    let parts = build_generation_parts(request, language);
    let wire = GenerateContentRequest::new(parts, Some(request.aspect_ratio));
    let response = model.generate(&wire).await?;
    let entries = classify(&response)?;
    record_images(&entries, &request.prompt, request.aspect_ratio, history);
    Ok(entries)
}

/// Run a mask-guided edit end to end. History items carry the base
/// prompt annotated with the edit, e.g. `"a knight (edit: add a hat)"`.
///
/// # Errors
///
/// Any [`GenerateError`]; history is untouched on every error.
pub async fn run_mask_edit<M: ImageModel>(
    model: &M,
    original: &ImageResource,
    mask: &ImageResource,
    edit_prompt: &str,
    base_prompt: &str,
    aspect_ratio: AspectRatio,
    history: &mut HistoryLog,
) -> Result<Vec<ResultEntry>, GenerateError> {
    if edit_prompt.trim().is_empty() {
        return Err(GenerateError::InvalidRequest(
            "edit prompt must not be empty",
        ));
    }
    let parts = build_edit_parts(original, mask, edit_prompt);
    // Edits keep the working image's own dimensions; no aspect pin.
    let wire = GenerateContentRequest::new(parts, None);
    let response = model.generate(&wire).await?;
    let entries = classify(&response)?;
    let annotated = format!("{base_prompt} (edit: {edit_prompt})");
    record_images(&entries, &annotated, aspect_ratio, history);
    Ok(entries)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::protocol::{Candidate, Content, InlineData};
    use std::cell::RefCell;

    struct MockModel {
        response: GenerateContentResponse,
        fail: bool,
        seen: RefCell<Vec<GenerateContentRequest>>,
    }

    impl MockModel {
        fn returning(parts: Vec<Part>) -> Self {
            Self {
                response: GenerateContentResponse {
                    candidates: vec![Candidate {
                        content: Some(Content { parts }),
                    }],
                },
                fail: false,
                seen: RefCell::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                response: GenerateContentResponse::default(),
                fail: true,
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl ImageModel for MockModel {
        async fn generate(
            &self,
            request: &GenerateContentRequest,
        ) -> Result<GenerateContentResponse, ClientError> {
            self.seen.borrow_mut().push(request.clone());
            if self.fail {
                return Err(ClientError::Api {
                    status: 500,
                    message: "internal".to_string(),
                });
            }
            Ok(self.response.clone())
        }
    }

    fn image_part(tag: &str) -> Part {
        Part {
            inline_data: Some(InlineData {
                mime_type: "image/png".to_string(),
                data: tag.to_string(),
            }),
            ..Part::default()
        }
    }

    fn request() -> GenerationRequest {
        GenerationRequest {
            references: vec![ImageResource::new(vec![1], "image/png")],
            prompt: "a knight".to_string(),
            aspect_ratio: AspectRatio::Widescreen,
        }
    }

    #[test]
    fn two_images_one_text_classify_in_order_and_record_twice() {
        let model = MockModel::returning(vec![
            image_part("AAAA"),
            Part::text("a caption"),
            image_part("BBBB"),
        ]);
        let mut history = HistoryLog::new();

        let entries =
            pollster::block_on(run_generation(&model, &request(), Language::En, &mut history))
                .unwrap();

        assert_eq!(
            entries,
            vec![
                ResultEntry::Image("data:image/png;base64,AAAA".to_string()),
                ResultEntry::Text("a caption".to_string()),
                ResultEntry::Image("data:image/png;base64,BBBB".to_string()),
            ],
        );
        // Recorded in part order: the later part is newest.
        assert_eq!(history.len(), 2);
        assert_eq!(history.list_all()[0].image, "data:image/png;base64,BBBB");
        assert_eq!(history.list_all()[1].image, "data:image/png;base64,AAAA");
        assert_eq!(history.list_all()[0].prompt, "a knight");
        assert_eq!(
            history.list_all()[0].aspect_ratio,
            AspectRatio::Widescreen
        );
    }

    #[test]
    fn newest_image_is_the_last_image_part_and_matches_the_history_head() {
        let model = MockModel::returning(vec![
            image_part("AAAA"),
            Part::text("a caption"),
            image_part("BBBB"),
        ]);
        let mut history = HistoryLog::new();
        let entries =
            pollster::block_on(run_generation(&model, &request(), Language::En, &mut history))
                .unwrap();

        let newest = newest_image(&entries).unwrap();
        assert_eq!(newest, "data:image/png;base64,BBBB");
        assert_eq!(history.list_all()[0].image, newest);
        assert_eq!(newest_image(&[ResultEntry::Text("no image".to_string())]), None);
    }

    #[test]
    fn text_only_response_is_no_image_and_history_is_untouched() {
        let model = MockModel::returning(vec![Part::text("sorry")]);
        let mut history = HistoryLog::new();
        let result =
            pollster::block_on(run_generation(&model, &request(), Language::En, &mut history));
        assert!(matches!(result, Err(GenerateError::NoImage)));
        assert!(history.is_empty());
    }

    #[test]
    fn transport_failure_maps_to_model_error() {
        let model = MockModel::failing();
        let mut history = HistoryLog::new();
        let result =
            pollster::block_on(run_generation(&model, &request(), Language::En, &mut history));
        assert!(matches!(
            result,
            Err(GenerateError::Model(ClientError::Api { status: 500, .. })),
        ));
        assert!(history.is_empty());
    }

    #[test]
    fn generation_parts_are_references_then_prefixed_text() {
        let req = GenerationRequest {
            references: vec![
                ImageResource::new(vec![1], "image/png"),
                ImageResource::new(vec![2], "image/jpeg"),
            ],
            prompt: "a knight".to_string(),
            aspect_ratio: AspectRatio::Square,
        };
        let parts = build_generation_parts(&req, Language::En);
        assert_eq!(parts.len(), 3);
        assert!(parts[0].inline_data.is_some());
        assert_eq!(
            parts[1].inline_data.as_ref().unwrap().mime_type,
            "image/jpeg",
        );
        assert_eq!(
            parts[2].text.as_deref(),
            Some("Maintain the facial features from these reference images. a knight"),
        );
    }

    #[test]
    fn somali_prefix_is_used_for_somali_language() {
        let parts = build_generation_parts(&request(), Language::So);
        let text = parts.last().unwrap().text.as_deref().unwrap();
        assert!(text.starts_with("Astaamaha wejiga ka ilaali sawiradan tixraaca ah. "));
    }

    #[test]
    fn edit_parts_are_original_mask_then_unprefixed_text() {
        let original = ImageResource::new(vec![1], "image/png");
        let mask = ImageResource::new(vec![2], "image/png");
        let parts = build_edit_parts(&original, &mask, "add a hat");
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[2].text.as_deref(), Some("add a hat"));
    }

    #[test]
    fn edit_records_annotated_prompt_and_sends_no_aspect_pin() {
        let model = MockModel::returning(vec![image_part("CCCC")]);
        let mut history = HistoryLog::new();
        let original = ImageResource::new(vec![1], "image/png");
        let mask = ImageResource::new(vec![2], "image/png");

        pollster::block_on(run_mask_edit(
            &model,
            &original,
            &mask,
            "add a hat",
            "a knight",
            AspectRatio::Portrait,
            &mut history,
        ))
        .unwrap();

        assert_eq!(history.list_all()[0].prompt, "a knight (edit: add a hat)");
        let sent = model.seen.borrow();
        assert!(sent[0].generation_config.image_config.is_none());
        assert_eq!(sent[0].contents[0].parts.len(), 3);
    }

    #[test]
    fn fresh_generation_pins_the_aspect_ratio() {
        let model = MockModel::returning(vec![image_part("AAAA")]);
        let mut history = HistoryLog::new();
        pollster::block_on(run_generation(&model, &request(), Language::En, &mut history))
            .unwrap();
        let sent = model.seen.borrow();
        assert_eq!(
            sent[0]
                .generation_config
                .image_config
                .as_ref()
                .unwrap()
                .aspect_ratio,
            "16:9",
        );
    }

    #[test]
    fn validation_rejects_empty_inputs() {
        let mut no_refs = request();
        no_refs.references.clear();
        assert!(matches!(
            no_refs.validate(),
            Err(GenerateError::InvalidRequest(_)),
        ));

        let mut blank_prompt = request();
        blank_prompt.prompt = "   ".to_string();
        assert!(matches!(
            blank_prompt.validate(),
            Err(GenerateError::InvalidRequest(_)),
        ));

        let mut history = HistoryLog::new();
        let model = MockModel::returning(vec![image_part("AAAA")]);
        let result = pollster::block_on(run_generation(
            &model,
            &blank_prompt,
            Language::En,
            &mut history,
        ));
        assert!(matches!(result, Err(GenerateError::InvalidRequest(_))));
        // Validation failed before any round trip.
        assert!(model.seen.borrow().is_empty());
    }

    #[test]
    fn busy_guard_rejects_a_second_submit() {
        let mut generator = Generator::new();
        assert!(generator.is_idle());
        generator.try_begin().unwrap();
        assert!(matches!(generator.try_begin(), Err(GenerateError::Busy)));
        generator.waiting();
        assert_eq!(generator.phase(), Phase::WaitingOnModel);
        assert!(matches!(generator.try_begin(), Err(GenerateError::Busy)));
        generator.finish();
        assert!(generator.try_begin().is_ok());
    }
}
