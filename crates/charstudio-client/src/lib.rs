//! charstudio-client: Model transport and the generation pipeline.
//!
//! Wire types for the `generateContent` API, a thin `reqwest`-backed
//! HTTP client, and the pipeline that turns reference images plus a
//! prompt into classified results and history entries. The pipeline is
//! generic over an [`ImageModel`] so it runs against a mock in native
//! tests and against the real endpoint in the browser.

pub mod client;
pub mod pipeline;
pub mod protocol;

pub use client::{ClientError, GeminiClient};
pub use pipeline::{
    GenerateError, GenerationRequest, Generator, ImageModel, Language, Phase, ResultEntry,
    newest_image, run_generation, run_mask_edit,
};
pub use protocol::{
    Candidate, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    ImageConfig, InlineData, Part,
};
