//! Instrument identities for the composite sources.

use serde::{Deserialize, Serialize};

/// The instruments a composite can be built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Instrument {
    /// SDO Atmospheric Imaging Assembly (EUV disk imager)
    Aia,
    /// MLSO K-Coronagraph (inner corona)
    KCor,
    /// SOHO LASCO C2 (outer corona)
    LascoC2,
    /// Anything else; loaded but not specially processed
    Unknown,
}

impl Instrument {
    /// Name used in composite titles.
    pub fn display_name(&self) -> &'static str {
        match self {
            Instrument::Aia => "AIA",
            Instrument::KCor => "KCor",
            Instrument::LascoC2 => "LASCO",
            Instrument::Unknown => "Unknown",
        }
    }

    /// Lowercase name used in output file names.
    pub fn file_tag(&self) -> String {
        self.display_name().to_lowercase()
    }

    /// Identify the instrument from the INSTRUME, TELESCOP and DETECTOR
    /// header values (any may be absent).
    pub fn from_header_values(
        instrume: Option<&str>,
        telescop: Option<&str>,
        detector: Option<&str>,
    ) -> Self {
        let fields: Vec<String> = [instrume, telescop, detector]
            .iter()
            .flatten()
            .map(|v| v.trim().to_uppercase())
            .collect();

        let has = |needle: &str| fields.iter().any(|f| f.contains(needle));

        if has("AIA") {
            Instrument::Aia
        } else if has("KCOR") || has("K-COR") {
            Instrument::KCor
        } else if has("LASCO") && (has("C2") || detector.is_none()) {
            Instrument::LascoC2
        } else {
            Instrument::Unknown
        }
    }
}

impl std::fmt::Display for Instrument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_header_values() {
        assert_eq!(
            Instrument::from_header_values(Some("AIA_3"), Some("SDO/AIA"), None),
            Instrument::Aia
        );
        assert_eq!(
            Instrument::from_header_values(Some("COSMO K-Coronagraph"), Some("COSMO K-Coronagraph"), None),
            Instrument::KCor
        );
        assert_eq!(
            Instrument::from_header_values(None, Some("MLSO"), None),
            Instrument::Unknown
        );
        assert_eq!(
            Instrument::from_header_values(Some("LASCO"), Some("SOHO"), Some("C2")),
            Instrument::LascoC2
        );
        assert_eq!(
            Instrument::from_header_values(Some("LASCO"), Some("SOHO"), Some("C3")),
            Instrument::Unknown
        );
    }

    #[test]
    fn test_names() {
        assert_eq!(Instrument::KCor.display_name(), "KCor");
        assert_eq!(Instrument::KCor.file_tag(), "kcor");
        assert_eq!(Instrument::LascoC2.to_string(), "LASCO");
    }
}
