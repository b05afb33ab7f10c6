use crate::{AnalysisError, Result};
use model::TelemetrySample;

/// A sample paired with its time since the first sample of the sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct ElapsedSample {
    pub elapsed_s: f64,
    pub sample: TelemetrySample,
}

/// Re-bases session timestamps onto the start of the sequence.
///
/// The first element always comes out at exactly 0.0. Empty input and
/// timestamps that step backwards are rejected.
pub fn align(samples: &[TelemetrySample]) -> Result<Vec<ElapsedSample>> {
    let first = samples
        .first()
        .ok_or_else(|| AnalysisError::transform("align", "empty sample sequence"))?;
    let t0 = first.session_time;

    let mut out = Vec::with_capacity(samples.len());
    let mut prev = t0;
    for (i, s) in samples.iter().enumerate() {
        if s.session_time < prev {
            return Err(AnalysisError::transform(
                "align",
                format!(
                    "timestamp at index {i} ({:.3}s) precedes previous sample ({:.3}s)",
                    s.session_time.as_secs_f64(),
                    prev.as_secs_f64()
                ),
            ));
        }
        prev = s.session_time;
        out.push(ElapsedSample { elapsed_s: (s.session_time - t0).as_secs_f64(), sample: s.clone() });
    }
    Ok(out)
}
