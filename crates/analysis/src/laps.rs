use crate::{AnalysisError, Result};
use model::Lap;

/// Picks the driver's quickest valid lap.
///
/// Untimed and deleted laps are never candidates. When two laps share the
/// quickest time, the one recorded first in the lap table wins.
pub fn select_fastest<'a>(laps: &'a [Lap], driver_code: &str) -> Result<&'a Lap> {
    laps.iter()
        .filter(|l| l.driver == driver_code && l.is_valid())
        .filter_map(|l| l.lap_time.map(|t| (t, l)))
        // min_by_key keeps the first of equal minima
        .min_by_key(|(t, _)| *t)
        .map(|(_, l)| l)
        .ok_or_else(|| AnalysisError::driver_not_found(driver_code))
}
