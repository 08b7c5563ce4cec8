use crate::curve::CurveSet;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_MAX_TURNS: u32 = 100;

/// Where the per-slot confidence coefficients come from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CoefficientSource {
    #[default]
    Inline,
    /// Read as a flat list of numbers from the protocol input, right after
    /// the header, and acknowledged with `INITIALIZED`.
    External,
    File(PathBuf),
}

/// How an opinion is combined with its own confidence weight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeightingPolicy {
    /// `opinion * curve(opinion)`
    #[default]
    SelfWeighted,
    /// `opinion / curve(opinion)`; a zero weight under a non-zero opinion is
    /// fatal.
    Normalized,
}

impl WeightingPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SelfWeighted => "self-weighted",
            Self::Normalized => "normalized",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EngineConfig {
    pub debug: bool,
    pub timing: bool,
    pub coefficients_source: CoefficientSource,
    pub weighting: WeightingPolicy,
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let coefficients_source = if let Ok(path) = env::var("OLYMBITS_CURVES") {
            CoefficientSource::File(PathBuf::from(path))
        } else if read_env_bool("OLYMBITS_TUNABLES", false) {
            CoefficientSource::External
        } else {
            CoefficientSource::Inline
        };

        Self {
            debug: read_env_bool("OLYMBITS_DEBUG", false),
            timing: read_env_bool("OLYMBITS_TIMING", false),
            coefficients_source,
            weighting: WeightingPolicy::default(),
        }
    }

    /// Curves that do not need protocol input. `External` returns `None`;
    /// the driver reads those after the header.
    pub fn resolve_curves(&self) -> Result<Option<CurveSet>> {
        match &self.coefficients_source {
            CoefficientSource::Inline => Ok(Some(CurveSet::builtin())),
            CoefficientSource::External => Ok(None),
            CoefficientSource::File(path) => CurveSet::from_file(path).map(Some),
        }
    }

    pub fn observes(&self) -> bool {
        self.debug || self.timing
    }
}

pub(crate) fn read_env_bool(name: &str, default: bool) -> bool {
    match env::var(name) {
        Ok(value) => parse_bool(&value).unwrap_or_else(|| {
            tracing::warn!("ignoring {name}={value:?}: expected a boolean");
            default
        }),
        Err(_) => default,
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim() {
        "1" | "true" | "TRUE" | "yes" | "on" => Some(true),
        "0" | "false" | "FALSE" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[test]
    fn defaults_are_quiet_inline_self_weighted() {
        let cfg = EngineConfig::default();
        assert!(!cfg.debug);
        assert!(!cfg.timing);
        assert!(!cfg.observes());
        assert_eq!(cfg.coefficients_source, CoefficientSource::Inline);
        assert_eq!(cfg.weighting, WeightingPolicy::SelfWeighted);
    }

    #[test]
    fn parses_boolean_spellings() {
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool(" TRUE "), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool(""), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn inline_and_external_curve_resolution() -> Result<()> {
        let inline = EngineConfig::default().resolve_curves()?;
        assert_eq!(inline, Some(CurveSet::builtin()));

        let external = EngineConfig {
            coefficients_source: CoefficientSource::External,
            ..EngineConfig::default()
        };
        assert_eq!(external.resolve_curves()?, None);
        Ok(())
    }

    #[test]
    fn missing_curve_file_is_an_error() {
        let cfg = EngineConfig {
            coefficients_source: CoefficientSource::File(PathBuf::from("/nonexistent/curves.json")),
            ..EngineConfig::default()
        };
        assert!(cfg.resolve_curves().is_err());
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn bad_env_value_warns_through_installed_subscriber() {
        let captured = Captured::default();
        let sink = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || sink.clone())
            .finish();
        env::set_var("OLYMBITS_TEST_BAD_BOOL", "maybe");

        let value = tracing::subscriber::with_default(subscriber, || {
            read_env_bool("OLYMBITS_TEST_BAD_BOOL", true)
        });

        assert!(value);
        let logs = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(logs.contains("OLYMBITS_TEST_BAD_BOOL"), "{logs}");
    }
}
