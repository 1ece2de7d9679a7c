//! Binary activity file adapter
//!
//! Binary decoding is delegated to a [`BinaryDecoder`]. The default decoder does
//! not read the payload at all and substitutes sample data, with every field
//! tagged as synthesized.

use crate::error::ComputeError;
use crate::types::Record;
use tracing::warn;

use super::{FormatAdapter, ParseContext};

/// Decoder for binary wearable payloads
pub trait BinaryDecoder {
    fn decode(&self, bytes: &[u8], ctx: &mut ParseContext<'_>) -> Result<Vec<Record>, ComputeError>;
}

/// Stand-in decoder that returns sample data
pub struct SyntheticDecoder;

impl BinaryDecoder for SyntheticDecoder {
    fn decode(&self, bytes: &[u8], ctx: &mut ParseContext<'_>) -> Result<Vec<Record>, ComputeError> {
        if !ctx.synthesize {
            return Err(ComputeError::ParseError(
                "binary decoding is not available and synthesis is disabled".to_string(),
            ));
        }
        warn!(
            bytes = bytes.len(),
            days = ctx.sample_days,
            "binary payload not decoded, substituting sample data"
        );
        Ok(ctx.generator.generate(ctx.sample_days))
    }
}

/// FIT export adapter
pub struct FitAdapter {
    decoder: Box<dyn BinaryDecoder + Send + Sync>,
}

impl Default for FitAdapter {
    fn default() -> Self {
        Self::new(Box::new(SyntheticDecoder))
    }
}

impl FitAdapter {
    pub fn new(decoder: Box<dyn BinaryDecoder + Send + Sync>) -> Self {
        Self { decoder }
    }
}

impl FormatAdapter for FitAdapter {
    fn parse(&self, bytes: &[u8], ctx: &mut ParseContext<'_>) -> Result<Vec<Record>, ComputeError> {
        self.decoder.decode(bytes, ctx)
    }
}
