use crate::{
    error::{TimeError, TimeResult},
    types::TimeExponent,
};
use serde::{Deserialize, Serialize};

/// A run's time configuration: the precision and the scope hierarchy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunConfig {
    /// Finest time unit of the run. Unset leaves the default of 0.
    #[serde(default)]
    pub precision: Option<TimeExponent>,
    #[serde(default)]
    pub scopes: Vec<ScopeConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopeConfig {
    pub name: String,
    /// Dotted full name of an earlier scope in the same file,
    /// e.g. `top.cpu`.
    #[serde(default)]
    pub parent: Option<String>,
    pub units: TimeExponent,
}

impl RunConfig {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        Ok(Self::from_json(&content)?)
    }

    pub fn from_json(content: &str) -> TimeResult<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

/// Parse a `:vpi_time_precision` directive, e.g. `:vpi_time_precision - 12;`.
/// The sign and the magnitude may be separated by whitespace; a missing
/// sign means positive.
pub fn parse_precision_directive(line: &str) -> TimeResult<TimeExponent> {
    const KEYWORD: &str = ":vpi_time_precision";

    let rest = line
        .trim()
        .strip_prefix(KEYWORD)
        .ok_or_else(|| TimeError::Config(format!("not a precision directive: {line:?}")))?;
    let rest = rest.trim();
    let rest = rest
        .strip_suffix(';')
        .ok_or_else(|| TimeError::Config(format!("missing ';' in {line:?}")))?
        .trim();

    let (negative, digits) = match rest.chars().next() {
        Some('-') => (true, rest[1..].trim_start()),
        Some('+') => (false, rest[1..].trim_start()),
        _ => (false, rest),
    };
    if digits.starts_with(['+', '-']) {
        return Err(TimeError::Config(format!("repeated sign in {line:?}")));
    }
    let magnitude: u32 = digits
        .parse()
        .map_err(|e| TimeError::Config(format!("bad precision {digits:?} in {line:?}: {e}")))?;
    let signed = if negative { -i64::from(magnitude) } else { i64::from(magnitude) };
    TimeExponent::try_from(signed)
        .map_err(|_| TimeError::Config(format!("precision out of range in {line:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_signed_directives() {
        assert_eq!(parse_precision_directive(":vpi_time_precision - 12;").unwrap(), -12);
        assert_eq!(parse_precision_directive(":vpi_time_precision + 0;").unwrap(), 0);
        assert_eq!(parse_precision_directive("  :vpi_time_precision -9;\n").unwrap(), -9);
        assert_eq!(parse_precision_directive(":vpi_time_precision 2;").unwrap(), 2);
    }

    #[test]
    fn accepts_the_most_negative_exponent() {
        assert_eq!(
            parse_precision_directive(":vpi_time_precision - 2147483648;").unwrap(),
            i32::MIN
        );
    }

    #[test]
    fn rejects_malformed_directives() {
        for line in [
            ":vpi_module \"system\";",
            ":vpi_time_precision - 12",
            ":vpi_time_precision - ;",
            ":vpi_time_precision - x;",
            ":vpi_time_precision - -12;",
            ":vpi_time_precision + -5;",
            ":vpi_time_precision - -2147483648;",
            ":vpi_time_precision + 2147483648;",
        ] {
            assert!(
                matches!(parse_precision_directive(line), Err(TimeError::Config(_))),
                "accepted {line:?}"
            );
        }
    }

    #[test]
    fn precision_is_optional_in_json() {
        let config = RunConfig::from_json(r#"{ "scopes": [ { "name": "top", "units": -9 } ] }"#)
            .unwrap();
        assert_eq!(config.precision, None);
        assert_eq!(config.scopes.len(), 1);
        assert_eq!(config.scopes[0].parent, None);
    }
}
