//! decode → extract → resolve, as one call.

use serde::Serialize;

use crate::decode::{self, ByteBuffer};
use crate::error::{AnalysisError, InternalFault};
use crate::features::{self, FeatureSet};
use crate::resolve::{self, Verdict};

/// Deterministic result of analyzing one hash.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    /// The hash as supplied.
    pub hash: String,
    #[serde(skip)]
    pub bytes: ByteBuffer,
    pub features: FeatureSet,
    #[serde(flatten)]
    pub verdict: Verdict,
}

/// Run the deterministic part of the pipeline.
///
/// Validation failures return before any statistics are computed.
pub fn analyze(input: &str) -> Result<Analysis, AnalysisError> {
    let bytes = decode::decode(input)?;
    let features = features::extract(&bytes);
    ensure_finite(&features)?;
    let verdict = resolve::resolve(&features);
    Ok(Analysis {
        hash: input.to_string(),
        bytes,
        features,
        verdict,
    })
}

fn ensure_finite(features: &FeatureSet) -> Result<(), InternalFault> {
    match features
        .float_fields()
        .into_iter()
        .find(|(_, value)| !value.is_finite())
    {
        Some((feature, _)) => Err(InternalFault::DegenerateStatistic { feature }),
        None => Ok(()),
    }
}
