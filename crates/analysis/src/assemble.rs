use crate::{
    align, decimate, rotate_samples, select_fastest, AnalysisError, ElapsedSample, Result, Rotation,
};
use model::{DriverTelemetryRecord, NormalizedSample, Session};
use std::num::NonZeroUsize;
use tracing::debug;

/// Runs one driver's fastest lap through the normalization pipeline:
/// select, extract, decimate, rotate, align, project.
pub fn build_driver_record(
    session: &Session,
    driver_code: &str,
    rotation: &Rotation,
    stride: NonZeroUsize,
) -> Result<DriverTelemetryRecord> {
    let lap = select_fastest(session.laps(), driver_code)?;
    let raw = session.lap_telemetry(lap).ok_or_else(|| {
        AnalysisError::transform(
            "extract",
            format!("no telemetry loaded for {} lap {}", lap.driver, lap.lap_number),
        )
    })?;

    let kept = decimate(raw, stride);
    let rotated = rotate_samples(rotation, &kept);
    let aligned = align(&rotated)?;

    debug!(
        driver = driver_code,
        lap = lap.lap_number,
        raw = raw.len(),
        kept = aligned.len(),
        stride = stride.get(),
        "Assembled driver telemetry"
    );

    Ok(DriverTelemetryRecord {
        code: driver_code.to_string(),
        data: aligned.iter().map(project).collect(),
    })
}

/// Maps an aligned sample onto the outgoing channel set.
pub fn project(s: &ElapsedSample) -> NormalizedSample {
    NormalizedSample {
        distance: s.sample.distance,
        speed: s.sample.speed,
        throttle: s.sample.throttle,
        brake: u8::from(s.sample.brake),
        x: s.sample.x,
        y: s.sample.y,
        time: s.elapsed_s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{lap, run, session, with_lap};
    use crate::rotation_matrix;
    use proptest::prelude::*;

    fn stride(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_uses_fastest_lap_samples() {
        let s = with_lap(session(), lap("NOR", 1, Some(84.0)), run(100.0, 6));
        let s = with_lap(s, lap("NOR", 2, Some(83.0)), run(200.0, 9));
        let rec = build_driver_record(&s, "NOR", &Rotation::identity(), stride(1)).unwrap();
        assert_eq!(rec.code, "NOR");
        assert_eq!(rec.data.len(), 9);
        assert_eq!(rec.data[0].time, 0.0);
        assert!((rec.data[8].time - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_brake_is_projected_to_integer() {
        let s = with_lap(session(), lap("NOR", 1, Some(84.0)), run(0.0, 4));
        let rec = build_driver_record(&s, "NOR", &Rotation::identity(), stride(1)).unwrap();
        let brakes: Vec<u8> = rec.data.iter().map(|d| d.brake).collect();
        assert_eq!(brakes, vec![1, 0, 0, 1]);
    }

    #[test]
    fn test_stride_reduces_output() {
        let s = with_lap(session(), lap("RUS", 1, Some(84.0)), run(50.0, 10));
        let rec = build_driver_record(&s, "RUS", &Rotation::identity(), stride(4)).unwrap();
        let distances: Vec<f64> = rec.data.iter().map(|d| d.distance).collect();
        assert_eq!(distances, vec![0.0, 80.0, 160.0]);
        assert_eq!(rec.data[0].time, 0.0);
        assert!((rec.data[1].time - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_driver_is_not_found() {
        let s = with_lap(session(), lap("RUS", 1, Some(84.0)), run(50.0, 10));
        let err = build_driver_record(&s, "SAI", &Rotation::identity(), stride(1)).unwrap_err();
        assert_eq!(err, AnalysisError::driver_not_found("SAI"));
    }

    #[test]
    fn test_lap_without_telemetry_is_transform_error() {
        let mut s = session();
        s.laps.push(lap("GAS", 1, Some(85.0)));
        let err = build_driver_record(&s, "GAS", &Rotation::identity(), stride(1)).unwrap_err();
        assert!(matches!(err, AnalysisError::Transform { stage: "extract", .. }));
    }

    #[test]
    fn test_empty_lap_telemetry_is_transform_error() {
        let s = with_lap(session(), lap("GAS", 1, Some(85.0)), vec![]);
        let err = build_driver_record(&s, "GAS", &Rotation::identity(), stride(1)).unwrap_err();
        assert!(!err.is_not_found());
    }

    proptest! {
        #[test]
        fn rotation_and_alignment_commute_with_decimation(
            angle in -360.0f64..360.0,
            n in 1usize..120,
            k in 1usize..9,
            t0 in 0.0f64..5000.0
        ) {
            let raw = run(t0, n);
            let r = rotation_matrix(angle);

            let late = decimate(&align(&rotate_samples(&r, &raw)).unwrap(), stride(k));
            let early = align(&rotate_samples(&r, &decimate(&raw, stride(k)))).unwrap();

            prop_assert_eq!(late.len(), early.len());
            for (a, b) in late.iter().zip(&early) {
                prop_assert_eq!(a.sample.x, b.sample.x);
                prop_assert_eq!(a.sample.y, b.sample.y);
                prop_assert_eq!(a.elapsed_s, b.elapsed_s);
            }
        }
    }
}
