use crate::{build_driver_record, Result, Rotation};
use model::{CircuitAnnotations, CircuitInfo, CornerAnnotation, RaceDataResponse, Session};
use std::num::NonZeroUsize;

/// Rotates corner markers into the track frame, keeping provider order.
pub fn annotate_corners(circuit: &CircuitInfo, rotation: &Rotation) -> Vec<CornerAnnotation> {
    circuit
        .corners
        .iter()
        .map(|c| {
            let p = rotation.apply(c.position());
            CornerAnnotation { number: c.label(), x: p.x, y: p.y, distance: c.distance }
        })
        .collect()
}

/// Builds the race-data payload for one or two drivers.
///
/// The circuit rotation is computed once and shared by corners and every
/// driver. Any failure for either driver fails the whole response.
pub fn build_response(
    session: &Session,
    circuit: &CircuitInfo,
    driver1: &str,
    driver2: Option<&str>,
    stride: NonZeroUsize,
) -> Result<RaceDataResponse> {
    let rotation = Rotation::from_degrees(circuit.rotation);
    let corners = annotate_corners(circuit, &rotation);

    let driver1 = build_driver_record(session, driver1, &rotation, stride)?;
    let driver2 = driver2
        .map(|code| build_driver_record(session, code, &rotation, stride))
        .transpose()?;

    Ok(RaceDataResponse { circuit_info: CircuitAnnotations { corners }, driver1, driver2 })
}
