//! Overlayer draws a caption over an image and exports the result as JPEG.
//!
//! The caption is word-wrapped to the image width, placed by percentage coordinates, styled per
//! font family (outline for memes, soft drop shadow otherwise) and composited onto a copy of the
//! input. Captions can be typed or requested from a [`CaptionSource`].
//!
//! - Build an [`OverlayRenderer`] (directly or from an [`OverlayConfig`])
//! - Render with [`OverlayRenderer::render`] / [`OverlayRenderer::render_jpeg`]
//! - Or drive the generate -> render flow through a [`DesignSession`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod caption;
/// File- and environment-driven settings.
pub mod config;
mod encode;
mod foundation;
mod render;
mod scene;
mod session;
mod text;

pub use crate::foundation::core::Rgb8;
pub use crate::foundation::error::{OverlayError, OverlayResult};

pub use crate::assets::decode::{DecodedImage, decode_image};
pub use crate::assets::fonts::{FontBook, FontOrigin, FontTable, LoadedFont};
pub use crate::caption::prompt::{CaptionPrompt, DesignType, Tone};
pub use crate::caption::source::{CaptionSource, CommandCaptionSource, FixedCaption, clean_caption};
pub use crate::config::{FONTS_DIR_ENV, OverlayConfig};
pub use crate::encode::jpeg::{JPEG_MIME, encode_jpeg};
pub use crate::render::overlay::{LineBox, OverlayRenderer, RenderOptions, RenderedImage};
pub use crate::scene::placement::Placement;
pub use crate::scene::style::{CaptionPolicy, FontFamily, StyleConfig};
pub use crate::session::design::{
    Caption, DesignSession, EXPORT_FILE_NAME, GenerateRequest, RenderRequest, RenderResponse,
};
pub use crate::text::wrap::wrap_words;
