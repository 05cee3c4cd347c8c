//! Release label embedded in raw-module archive names.
//!
//! The label comes from `RELEASE_VERSION` when it is set to a non-empty
//! value, otherwise from the current UTC date in `YYYYMMDD` form.

use crate::error::{PackagerError, Result};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Environment variable that overrides the date-based label.
pub const RELEASE_VERSION_ENV: &str = "RELEASE_VERSION";

/// A validated release label (e.g. `20200101`).
///
/// The label becomes part of a filename, so it may contain only ASCII
/// alphanumerics, hyphens, dots, and underscores.
///
/// # Examples
///
/// ```
/// use fake_bpy_packager::release_label::ReleaseLabel;
///
/// let label = ReleaseLabel::try_from("20200101").expect("valid label");
/// assert_eq!(label.as_str(), "20200101");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReleaseLabel(String);

fn is_valid_label_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '.' || c == '_'
}

impl ReleaseLabel {
    /// Resolve the label from an optional override and the current time.
    ///
    /// An unset or empty override falls back to the UTC date of `now`.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::InvalidReleaseLabel`] if the override contains
    /// characters that cannot appear in a filename.
    pub fn resolve(override_value: Option<&str>, now: SystemTime) -> Result<Self> {
        match override_value {
            Some(value) if !value.is_empty() => Self::try_from(value),
            _ => Ok(Self::from_date(now)),
        }
    }

    /// Resolve the label from `RELEASE_VERSION` and the system clock.
    ///
    /// # Errors
    ///
    /// See [`Self::resolve`].
    pub fn from_env() -> Result<Self> {
        let value = std::env::var(RELEASE_VERSION_ENV).ok();
        Self::resolve(value.as_deref(), SystemTime::now())
    }

    /// Build a `YYYYMMDD` label from the UTC date of `now`.
    ///
    /// Times before the Unix epoch clamp to `19700101`.
    #[must_use]
    pub fn from_date(now: SystemTime) -> Self {
        let secs = now
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_secs());
        Self(format_epoch_date(secs))
    }

    /// Return the label as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for ReleaseLabel {
    type Error = PackagerError;

    fn try_from(value: &str) -> Result<Self> {
        if value.is_empty() {
            return Err(PackagerError::InvalidReleaseLabel {
                value: value.to_owned(),
                reason: "label must not be empty".to_owned(),
            });
        }
        if let Some(bad) = value.chars().find(|c| !is_valid_label_char(*c)) {
            return Err(PackagerError::InvalidReleaseLabel {
                value: value.to_owned(),
                reason: format!("invalid character '{bad}'"),
            });
        }
        Ok(Self(value.to_owned()))
    }
}

impl AsRef<str> for ReleaseLabel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReleaseLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Format a Unix epoch timestamp as `YYYYMMDD`.
fn format_epoch_date(epoch_secs: u64) -> String {
    let (year, month, day) = civil_from_epoch(epoch_secs);
    format!("{year:04}{month:02}{day:02}")
}

/// Convert a Unix epoch timestamp to a `(year, month, day)` triple.
///
/// Howard Hinnant's `civil_from_days` algorithm (public domain).
fn civil_from_epoch(epoch_secs: u64) -> (u32, u32, u32) {
    #[expect(
        clippy::cast_possible_wrap,
        reason = "day counts since 1970 fit comfortably in i64"
    )]
    let z = (epoch_secs / 86_400) as i64 + 719_468;
    let era = z.div_euclid(146_097);
    #[expect(clippy::cast_sign_loss, reason = "rem_euclid is never negative")]
    let doe = z.rem_euclid(146_097) as u64; // [0, 146_096]
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    #[expect(clippy::cast_possible_wrap, reason = "year of era is below 400")]
    let year_base = (yoe as i64) + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = if month <= 2 { year_base + 1 } else { year_base };
    #[expect(
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation,
        reason = "post-epoch years, months, and days fit in u32"
    )]
    (year as u32, month as u32, day as u32)
}
