use std::fmt;

use crate::caption::prompt::{CaptionPrompt, DesignType, Tone};
use crate::caption::source::{CaptionSource, clean_caption};
use crate::config::OverlayConfig;
use crate::encode::jpeg::JPEG_MIME;
use crate::foundation::error::{OverlayError, OverlayResult};
use crate::render::overlay::OverlayRenderer;
use crate::scene::placement::Placement;
use crate::scene::style::{CaptionPolicy, StyleConfig};

/// Suggested download name for exported designs.
pub const EXPORT_FILE_NAME: &str = "ai_generated_poster.jpg";

/// A finalized, non-empty caption held by the caller between generation and rendering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Caption(String);

impl Caption {
    /// Rejects blank text.
    pub fn new(text: impl Into<String>) -> OverlayResult<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(OverlayError::input("caption is empty"));
        }
        Ok(Self(text))
    }

    /// Caption text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Caption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ask the caption source for a caption.
#[derive(Clone, Debug)]
pub struct GenerateRequest {
    /// Kind of design.
    pub design_type: DesignType,
    /// What the caption is about.
    pub topic: String,
    /// Requested voice.
    pub tone: Tone,
    /// Authenticated user the request is made for; only logged.
    pub requested_by: Option<String>,
}

/// Draw a caption over an uploaded image.
#[derive(Clone, Debug)]
pub struct RenderRequest {
    /// Uploaded image bytes (JPEG/PNG). Never modified.
    pub image: Vec<u8>,
    /// Caption as generated or typed.
    pub caption: Caption,
    /// Styling.
    pub style: StyleConfig,
    /// Placement.
    pub placement: Placement,
    /// Caller-side caption transform.
    pub policy: CaptionPolicy,
    /// Authenticated user the request is made for; only logged.
    pub requested_by: Option<String>,
}

impl RenderRequest {
    /// Request with default placement and the family's default caption policy.
    pub fn new(image: Vec<u8>, caption: Caption, style: StyleConfig) -> Self {
        Self {
            image,
            caption,
            policy: CaptionPolicy::for_family(style.family),
            style,
            placement: Placement::default(),
            requested_by: None,
        }
    }
}

/// Finished design.
#[derive(Clone, Debug)]
pub struct RenderResponse {
    /// Caption exactly as drawn (after the caption policy).
    pub caption: String,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Number of lines drawn.
    pub line_count: usize,
    /// The family asset was unavailable and a fallback font was used.
    pub font_fallback: bool,
    /// Encoded export.
    pub jpeg: Vec<u8>,
}

impl RenderResponse {
    /// MIME type of [`RenderResponse::jpeg`].
    pub fn mime(&self) -> &'static str {
        JPEG_MIME
    }
}

/// Generate -> render flow with no ambient state: everything arrives in requests and leaves in
/// responses.
#[derive(Clone, Debug)]
pub struct DesignSession {
    renderer: OverlayRenderer,
    jpeg_quality: u8,
}

impl DesignSession {
    /// Session built from `config`.
    pub fn new(config: &OverlayConfig) -> OverlayResult<Self> {
        config.validate()?;
        Ok(Self {
            renderer: config.renderer(),
            jpeg_quality: config.jpeg_quality,
        })
    }

    /// Session around an existing renderer.
    pub fn with_renderer(renderer: OverlayRenderer, jpeg_quality: u8) -> Self {
        Self {
            renderer,
            jpeg_quality,
        }
    }

    /// The renderer in use.
    pub fn renderer(&self) -> &OverlayRenderer {
        &self.renderer
    }

    /// Ask `source` for a caption.
    #[tracing::instrument(skip_all, fields(user = req.requested_by.as_deref().unwrap_or("-")))]
    pub fn generate(
        &self,
        req: &GenerateRequest,
        source: &dyn CaptionSource,
    ) -> OverlayResult<Caption> {
        let prompt = CaptionPrompt::new(req.design_type, &req.topic, req.tone)?;
        tracing::debug!(prompt = %prompt, "requesting caption");
        let raw = source.generate(&prompt)?;
        let text = clean_caption(&raw)?;
        tracing::info!(chars = text.chars().count(), "caption generated");
        Caption::new(text)
    }

    /// Apply the caption policy, render, and encode.
    #[tracing::instrument(skip_all, fields(user = req.requested_by.as_deref().unwrap_or("-")))]
    pub fn render(&self, req: &RenderRequest) -> OverlayResult<RenderResponse> {
        if req.image.is_empty() {
            return Err(OverlayError::input("please upload an image first"));
        }
        let caption = req.policy.apply(req.caption.as_str());
        let image = crate::assets::decode::decode_image(&req.image)?;
        let rendered = self
            .renderer
            .render(&image, &caption, &req.style, &req.placement)?;
        let jpeg = rendered.to_jpeg(self.jpeg_quality)?;

        let (width, height) = rendered.image().dimensions();
        Ok(RenderResponse {
            caption,
            width,
            height,
            line_count: rendered.lines().len(),
            font_fallback: rendered.font_origin().is_fallback(),
            jpeg,
        })
    }

    /// One-shot flow: validate inputs, generate a caption, render it.
    pub fn create(
        &self,
        req: &GenerateRequest,
        source: &dyn CaptionSource,
        image: Vec<u8>,
        style: StyleConfig,
        placement: Placement,
        policy: CaptionPolicy,
    ) -> OverlayResult<RenderResponse> {
        if image.is_empty() {
            return Err(OverlayError::input("please upload an image first"));
        }
        let caption = self.generate(req, source)?;
        self.render(&RenderRequest {
            image,
            caption,
            style,
            placement,
            policy,
            requested_by: req.requested_by.clone(),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/design.rs"]
mod tests;
