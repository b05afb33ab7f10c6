use anyhow::{bail, Context, Result};
use model::SessionKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,      // e.g. "0.0.0.0:8000"
    pub archive_root: PathBuf,  // session archive tree
    pub default_session: SessionKind,
    /// Decimation stride when a request does not ask for one.
    pub default_stride: usize,
    pub max_stride: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".into(),
            archive_root: default_archive_root(),
            default_session: SessionKind::Qualifying,
            default_stride: 1,
            max_stride: 16,
        }
    }
}

fn default_archive_root() -> PathBuf {
    let local = PathBuf::from("archive");
    if local.is_dir() {
        return local;
    }
    dirs_next::data_dir().map(|d| d.join("lapline").join("archive")).unwrap_or(local)
}

impl ServerConfig {
    /// Defaults, then the JSON file named by `LAPLINE_CONFIG`, then
    /// individual `LAPLINE_*` variables.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = match get("LAPLINE_CONFIG") {
            Some(path) => {
                let raw = std::fs::read_to_string(&path).with_context(|| format!("read config {path}"))?;
                serde_json::from_str::<ServerConfig>(&raw).with_context(|| format!("parse config {path}"))?
            }
            None => ServerConfig::default(),
        };

        if let Some(v) = get("LAPLINE_BIND_ADDR") {
            cfg.bind_addr = v;
        }
        if let Some(v) = get("LAPLINE_ARCHIVE") {
            cfg.archive_root = PathBuf::from(v);
        }
        if let Some(v) = get("LAPLINE_SESSION") {
            cfg.default_session = v.parse::<SessionKind>().context("LAPLINE_SESSION")?;
        }
        if let Some(v) = get("LAPLINE_STRIDE") {
            cfg.default_stride = v.trim().parse::<usize>().with_context(|| format!("LAPLINE_STRIDE '{v}'"))?;
        }
        if let Some(v) = get("LAPLINE_MAX_STRIDE") {
            cfg.max_stride = v.trim().parse::<usize>().with_context(|| format!("LAPLINE_MAX_STRIDE '{v}'"))?;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_stride == 0 || self.max_stride == 0 {
            bail!("strides must be at least 1");
        }
        if self.default_stride > self.max_stride {
            bail!("default_stride {} exceeds max_stride {}", self.default_stride, self.max_stride);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn test_defaults_validate() {
        let cfg = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.bind_addr, "0.0.0.0:8000");
        assert_eq!(cfg.default_session, SessionKind::Qualifying);
        assert_eq!(cfg.default_stride, 1);
    }

    #[test]
    fn test_env_overrides() {
        let cfg = ServerConfig::from_lookup(lookup(&[
            ("LAPLINE_BIND_ADDR", "127.0.0.1:9000"),
            ("LAPLINE_ARCHIVE", "/srv/archive"),
            ("LAPLINE_SESSION", "race"),
            ("LAPLINE_STRIDE", "4"),
        ]))
        .unwrap();
        assert_eq!(cfg.bind_addr, "127.0.0.1:9000");
        assert_eq!(cfg.archive_root, PathBuf::from("/srv/archive"));
        assert_eq!(cfg.default_session, SessionKind::Race);
        assert_eq!(cfg.default_stride, 4);
    }

    #[test]
    fn test_bad_values_rejected() {
        assert!(ServerConfig::from_lookup(lookup(&[("LAPLINE_STRIDE", "0")])).is_err());
        assert!(ServerConfig::from_lookup(lookup(&[("LAPLINE_STRIDE", "fast")])).is_err());
        assert!(ServerConfig::from_lookup(lookup(&[("LAPLINE_SESSION", "warmup")])).is_err());
        assert!(ServerConfig::from_lookup(lookup(&[("LAPLINE_STRIDE", "8"), ("LAPLINE_MAX_STRIDE", "4")])).is_err());
    }

    #[test]
    fn test_config_file_with_partial_fields() {
        let path = std::env::temp_dir().join(format!("lapline-config-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, r#"{ "default_session": "FP2", "max_stride": 8 }"#).unwrap();
        let cfg = ServerConfig::from_lookup(lookup(&[
            ("LAPLINE_CONFIG", path.to_str().unwrap()),
            ("LAPLINE_STRIDE", "2"),
        ]))
        .unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(cfg.default_session, SessionKind::Practice2);
        assert_eq!(cfg.max_stride, 8);
        assert_eq!(cfg.default_stride, 2);
        assert_eq!(cfg.bind_addr, "0.0.0.0:8000");
    }

    #[test]
    fn test_missing_config_file_is_error() {
        let err = ServerConfig::from_lookup(lookup(&[("LAPLINE_CONFIG", "/nonexistent/lapline.json")]));
        assert!(err.is_err());
    }
}
