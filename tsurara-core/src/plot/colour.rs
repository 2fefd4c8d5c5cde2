//! Colour mapping of bar widths.

use std::{fmt, str::FromStr};

use serde::Serialize;

const DEFAULT_COLOUR_MAP: &str = "Blues";
const NO_COLOUR_MAP: &str = "none";

/// Colour scale applied to bars, named as the drawing backend knows it.
///
/// # Examples
/// ```
/// use tsurara_core::ColourMap;
///
/// assert_eq!("none".parse::<ColourMap>(), Ok(ColourMap::None));
/// assert_eq!(ColourMap::default().name(), Some("Blues"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum ColourMap {
    /// A named colour scale; bars are shaded by normalised width.
    Named(String),
    /// Bars are drawn solid black and no colour bar is shown.
    None,
}

impl Default for ColourMap {
    fn default() -> Self {
        Self::Named(DEFAULT_COLOUR_MAP.to_owned())
    }
}

impl ColourMap {
    /// Returns the colour scale name, or `None` for solid bars.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            Self::None => None,
        }
    }
}

impl FromStr for ColourMap {
    type Err = std::convert::Infallible;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case(NO_COLOUR_MAP) {
            Ok(Self::None)
        } else {
            Ok(Self::Named(trimmed.to_owned()))
        }
    }
}

impl fmt::Display for ColourMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name().unwrap_or(NO_COLOUR_MAP))
    }
}

/// Normalises bar widths onto `[0, 1]` over the domain `[0, max width]`.
///
/// An empty bar set, or one whose widest bar is not positive, falls back to
/// the domain `[0, 1]`.
///
/// # Examples
/// ```
/// use tsurara_core::WidthNormaliser;
///
/// let normaliser = WidthNormaliser::from_widths(&[10.0, 40.0]);
/// assert_eq!(normaliser.normalise(10.0), 0.25);
///
/// let empty = WidthNormaliser::from_widths(&[]);
/// assert_eq!(empty.domain(), (0.0, 1.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WidthNormaliser {
    max: f64,
}

impl WidthNormaliser {
    /// Builds a normaliser from the widths to be coloured.
    #[must_use]
    pub fn from_widths(widths: &[f64]) -> Self {
        let max = widths.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let max = if max.is_finite() && max > 0.0 { max } else { 1.0 };
        Self { max }
    }

    /// Returns the `(min, max)` domain of the scale.
    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        (0.0, self.max)
    }

    /// Maps `width` into `[0, 1]`, clamping out-of-domain values.
    #[must_use]
    pub fn normalise(&self, width: f64) -> f64 {
        (width / self.max).clamp(0.0, 1.0)
    }
}

/// Legend describing how bar shading maps to cluster size.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ColourBar {
    /// Colour scale the legend describes.
    pub colour_map: String,
    /// Width domain covered by the scale.
    pub domain: (f64, f64),
    /// Axis label for the legend.
    pub label: &'static str,
}

impl ColourBar {
    pub(super) fn new(colour_map: &str, normaliser: &WidthNormaliser, log_size: bool) -> Self {
        Self {
            colour_map: colour_map.to_owned(),
            domain: normaliser.domain(),
            label: if log_size {
                "log(Number of points)"
            } else {
                "Number of points"
            },
        }
    }
}
