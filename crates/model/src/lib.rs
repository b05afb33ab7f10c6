use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt, str::FromStr, time::Duration};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SessionKind {
    Practice1,
    Practice2,
    Practice3,
    SprintQualifying,
    Sprint,
    Qualifying,
    Race,
}

impl SessionKind {
    pub const ALL: [SessionKind; 7] = [
        SessionKind::Practice1,
        SessionKind::Practice2,
        SessionKind::Practice3,
        SessionKind::SprintQualifying,
        SessionKind::Sprint,
        SessionKind::Qualifying,
        SessionKind::Race,
    ];

    /// Short code used in query strings and archive directory names.
    pub fn code(&self) -> &'static str {
        match self {
            SessionKind::Practice1 => "FP1",
            SessionKind::Practice2 => "FP2",
            SessionKind::Practice3 => "FP3",
            SessionKind::SprintQualifying => "SQ",
            SessionKind::Sprint => "S",
            SessionKind::Qualifying => "Q",
            SessionKind::Race => "R",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SessionKind::Practice1 => "Practice 1",
            SessionKind::Practice2 => "Practice 2",
            SessionKind::Practice3 => "Practice 3",
            SessionKind::SprintQualifying => "Sprint Qualifying",
            SessionKind::Sprint => "Sprint",
            SessionKind::Qualifying => "Qualifying",
            SessionKind::Race => "Race",
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown session type '{0}'")]
pub struct ParseSessionKindError(pub String);

impl FromStr for SessionKind {
    type Err = ParseSessionKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.trim().to_ascii_lowercase().as_str() {
            "fp1" | "practice 1" => SessionKind::Practice1,
            "fp2" | "practice 2" => SessionKind::Practice2,
            "fp3" | "practice 3" => SessionKind::Practice3,
            "sq" | "sprint qualifying" | "sprint shootout" => SessionKind::SprintQualifying,
            "s" | "sprint" => SessionKind::Sprint,
            "q" | "qualifying" => SessionKind::Qualifying,
            "r" | "race" => SessionKind::Race,
            _ => return Err(ParseSessionKindError(s.to_string())),
        };
        Ok(kind)
    }
}

impl TryFrom<String> for SessionKind {
    type Error = ParseSessionKindError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SessionKind> for String {
    fn from(kind: SessionKind) -> Self {
        kind.code().to_string()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId {
    pub year: i32,
    pub event: String,
    pub kind: SessionKind,
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.year, self.event, self.kind)
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct EventInfo {
    pub round: u32,
    pub name: String,
    #[serde(default)]
    pub location: String,
}

impl EventInfo {
    /// Pre-season and in-season test days carry "Testing" in their name.
    pub fn is_testing(&self) -> bool {
        self.name.to_ascii_lowercase().contains("test")
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Lap {
    pub driver: String,
    pub lap_number: u32,
    #[serde(default, with = "secs::option")]
    pub lap_time: Option<Duration>,
    #[serde(default)]
    pub deleted: bool,
}

impl Lap {
    /// Timed and not struck from the classification.
    pub fn is_valid(&self) -> bool {
        self.lap_time.is_some() && !self.deleted
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct TelemetrySample {
    /// Session-relative, not lap-relative.
    #[serde(with = "secs")]
    pub session_time: Duration,
    pub distance: f64,
    pub speed: f64,
    pub throttle: f64,
    pub brake: bool,
    pub x: f64,
    pub y: f64,
}

impl TelemetrySample {
    pub fn position(&self) -> Point2 {
        Point2 { x: self.x, y: self.y }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Corner {
    pub number: u32,
    #[serde(default)]
    pub letter: Option<String>,
    pub x: f64,
    pub y: f64,
    pub distance: f64,
}

impl Corner {
    pub fn label(&self) -> String {
        match &self.letter {
            Some(letter) => format!("{}{}", self.number, letter),
            None => self.number.to_string(),
        }
    }

    pub fn position(&self) -> Point2 {
        Point2 { x: self.x, y: self.y }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct CircuitInfo {
    /// Degrees.
    pub rotation: f64,
    #[serde(default)]
    pub corners: Vec<Corner>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LapKey {
    pub driver: String,
    pub lap_number: u32,
}

impl LapKey {
    pub fn new(driver: impl Into<String>, lap_number: u32) -> Self {
        Self { driver: driver.into(), lap_number }
    }
}

impl From<&Lap> for LapKey {
    fn from(lap: &Lap) -> Self {
        Self { driver: lap.driver.clone(), lap_number: lap.lap_number }
    }
}

/// A resolved and loaded session. Built by a provider, read-only afterwards.
#[derive(Clone, Debug)]
pub struct Session {
    pub id: SessionId,
    pub drivers: Vec<String>,
    pub laps: Vec<Lap>,
    pub circuit: Option<CircuitInfo>,
    pub telemetry: HashMap<LapKey, Vec<TelemetrySample>>,
}

impl Session {
    pub fn new(id: SessionId) -> Self {
        Self { id, drivers: Vec::new(), laps: Vec::new(), circuit: None, telemetry: HashMap::new() }
    }

    pub fn driver_list(&self) -> &[String] {
        &self.drivers
    }

    pub fn circuit_info(&self) -> Option<&CircuitInfo> {
        self.circuit.as_ref()
    }

    pub fn laps(&self) -> &[Lap] {
        &self.laps
    }

    /// `None` when telemetry was not materialized for this lap.
    pub fn lap_telemetry(&self, lap: &Lap) -> Option<&[TelemetrySample]> {
        self.telemetry.get(&LapKey::from(lap)).map(Vec::as_slice)
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct NormalizedSample {
    pub distance: f64,
    pub speed: f64,
    pub throttle: f64,
    pub brake: u8,
    pub x: f64,
    pub y: f64,
    /// Seconds since the first sample of the lap.
    pub time: f64,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct DriverTelemetryRecord {
    pub code: String,
    pub data: Vec<NormalizedSample>,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct CornerAnnotation {
    pub number: String,
    #[serde(rename = "X")]
    pub x: f64,
    #[serde(rename = "Y")]
    pub y: f64,
    #[serde(rename = "Distance")]
    pub distance: f64,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct CircuitAnnotations {
    pub corners: Vec<CornerAnnotation>,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct RaceDataResponse {
    pub circuit_info: CircuitAnnotations,
    pub driver1: DriverTelemetryRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver2: Option<DriverTelemetryRecord>,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ScheduleResponse {
    pub events: Vec<String>,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct DriversResponse {
    pub drivers: Vec<String>,
}

/// Serde adapter storing a `Duration` as fractional seconds.
pub mod secs {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let raw = f64::deserialize(d)?;
        Duration::try_from_secs_f64(raw).map_err(D::Error::custom)
    }

    pub mod option {
        use serde::{de::Error, Deserialize, Deserializer, Serializer};
        use std::time::Duration;

        pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
            match value {
                Some(d) => s.serialize_some(&d.as_secs_f64()),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
            Option::<f64>::deserialize(d)?
                .map(|raw| Duration::try_from_secs_f64(raw).map_err(D::Error::custom))
                .transpose()
        }
    }
}
