// Nagios-style range thresholds and the warn/crit and in/out spec grammars.
//
// Range forms (optional leading '@' inverts):
//   ""     always accept
//   N      0 <= x <= N
//   N:     x >= N
//   ~:N    x <= N
//   N:M    N <= x <= M

use crate::error::{CheckError, Result};
use crate::models::Status;

/// Acceptance predicate over one number.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeThreshold {
    low: f64,
    high: f64,
    inverted: bool,
    text: String,
}

impl RangeThreshold {
    pub fn parse(spec: &str) -> Result<Self> {
        let text = spec.trim();
        let (inverted, body) = match text.strip_prefix('@') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let bad = || CheckError::config(format!("invalid range threshold '{}'", spec));

        let (low, high) = if body.is_empty() {
            (f64::NEG_INFINITY, f64::INFINITY)
        } else if let Some((start, end)) = body.split_once(':') {
            let low = if start == "~" {
                f64::NEG_INFINITY
            } else {
                parse_number(start).ok_or_else(bad)?
            };
            let high = if end.is_empty() {
                if start == "~" {
                    return Err(bad());
                }
                f64::INFINITY
            } else {
                parse_number(end).ok_or_else(bad)?
            };
            (low, high)
        } else {
            (0.0, parse_number(body).ok_or_else(bad)?)
        };
        if low > high {
            return Err(CheckError::config(format!(
                "range threshold '{}': start is greater than end",
                spec
            )));
        }
        Ok(Self {
            low,
            high,
            inverted,
            text: text.to_string(),
        })
    }

    pub fn accepts(&self, x: f64) -> bool {
        let inside = x >= self.low && x <= self.high;
        inside != self.inverted
    }

    /// `Status::Ok` when accepted, otherwise `severity`.
    pub fn evaluate(&self, x: f64, severity: Status) -> Status {
        if self.accepts(x) { Status::Ok } else { severity }
    }

    /// Original text, for metric annotations.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl std::fmt::Display for RangeThreshold {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

fn parse_number(s: &str) -> Option<f64> {
    let v: f64 = s.trim().parse().ok()?;
    v.is_finite().then_some(v)
}

/// Optional "-" disables a position.
fn parse_slot(part: &str) -> Result<Option<RangeThreshold>> {
    let part = part.trim();
    if part == "-" {
        Ok(None)
    } else {
        RangeThreshold::parse(part).map(Some)
    }
}

/// Warning and critical predicates for one value; either may be absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThresholdPair {
    pub warning: Option<RangeThreshold>,
    pub critical: Option<RangeThreshold>,
}

impl ThresholdPair {
    /// Single-direction grammar: `crit` or `warn,crit`.
    pub fn parse(spec: &str) -> Result<Self> {
        let parts = split_spec(spec);
        match parts.as_slice() {
            [] => Ok(Self::default()),
            [crit] => Ok(Self {
                warning: None,
                critical: parse_slot(crit)?,
            }),
            [warn, crit] => Ok(Self {
                warning: parse_slot(warn)?,
                critical: parse_slot(crit)?,
            }),
            _ => Err(CheckError::config(format!(
                "threshold '{}': expected 'crit' or 'warn,crit'",
                spec
            ))),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.warning.is_none() && self.critical.is_none()
    }

    /// Critical rejection wins over warning rejection.
    pub fn evaluate(&self, x: f64) -> Status {
        if let Some(crit) = &self.critical
            && !crit.accepts(x)
        {
            return Status::Critical;
        }
        match &self.warning {
            Some(warn) => warn.evaluate(x, Status::Warning),
            None => Status::Ok,
        }
    }
}

/// Thresholds for an inbound/outbound metric pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectionalThresholds {
    pub inbound: ThresholdPair,
    pub outbound: ThresholdPair,
}

impl DirectionalThresholds {
    /// `inWarn,inCrit,outWarn,outCrit` | `warn,crit` (both directions) | `crit` (both directions).
    pub fn parse(spec: &str) -> Result<Self> {
        let parts = split_spec(spec);
        match parts.as_slice() {
            [] => Ok(Self::default()),
            [crit] => {
                let pair = ThresholdPair {
                    warning: None,
                    critical: parse_slot(crit)?,
                };
                Ok(Self {
                    inbound: pair.clone(),
                    outbound: pair,
                })
            }
            [warn, crit] => {
                let pair = ThresholdPair {
                    warning: parse_slot(warn)?,
                    critical: parse_slot(crit)?,
                };
                Ok(Self {
                    inbound: pair.clone(),
                    outbound: pair,
                })
            }
            [in_warn, in_crit, out_warn, out_crit] => Ok(Self {
                inbound: ThresholdPair {
                    warning: parse_slot(in_warn)?,
                    critical: parse_slot(in_crit)?,
                },
                outbound: ThresholdPair {
                    warning: parse_slot(out_warn)?,
                    critical: parse_slot(out_crit)?,
                },
            }),
            _ => Err(CheckError::config(format!(
                "threshold '{}': expected 1, 2 or 4 comma-separated parts",
                spec
            ))),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.inbound.is_empty() && self.outbound.is_empty()
    }
}

/// A blank spec or a lone "-" means "not configured".
fn split_spec(spec: &str) -> Vec<&str> {
    let spec = spec.trim();
    if spec.is_empty() || spec == "-" {
        return Vec::new();
    }
    spec.split(',').collect()
}
