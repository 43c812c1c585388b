//! Extraction errors.
//!
//! These never escape the extraction boundary: the pipeline turns every
//! one of them into an empty palette (and the next fallback stage). They
//! exist so the stages stay individually testable and so logs say why a
//! stage was skipped.

use thiserror::Error;

use crate::source::FetchError;

#[derive(Debug, Error)]
pub enum ExtractError {
    /// The logo bytes could not be fetched.
    #[error("failed to fetch logo {logo_ref:?}: {source}")]
    Fetch {
        logo_ref: String,
        #[source]
        source: FetchError,
    },

    /// The bytes are not well-formed vector markup.
    #[error("failed to parse logo markup: {0}")]
    Parse(#[from] roxmltree::Error),

    /// The bytes are not text at all.
    #[error("logo markup is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// The bytes are not a decodable raster image.
    #[error("failed to decode logo image: {0}")]
    Decode(#[from] image::ImageError),

    /// Parsing worked but the palette fails the quality gate.
    #[error("extracted palette is insufficient ({colors} colors)")]
    Insufficient { colors: usize },
}
