//! Observation metadata read from map headers: time, solar radius, wavelength.

use chrono::{DateTime, Datelike, Utc};
use corona_common::{parse_time, CompositeError, CompositeResult};
use fits_io::Header;

/// Mean photospheric radius in meters.
pub const SOLAR_RADIUS_M: f64 = 695_700_000.0;

/// Astronomical unit in meters.
pub const AU_M: f64 = 149_597_870_700.0;

/// Solar angular radius at 1 AU, arcsec.
pub const RSUN_ARCSEC_1AU: f64 = 959.63;

/// Where the solar radius of a map came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadiusSource {
    Keyword(&'static str),
    ObserverDistance,
    ObservationDate,
}

/// Observation instant of a map.
///
/// Looks at DATE-OBS (joined with TIME-OBS when DATE-OBS holds only a date),
/// then DATE_OBS, then T_OBS.
pub fn observation_date(header: &Header) -> CompositeResult<DateTime<Utc>> {
    if let Some(date) = header.get_str("DATE-OBS") {
        let date = date.trim();
        let combined = match header.get_str("TIME-OBS") {
            Some(time) if !date.contains('T') && !date.contains(' ') && !time.trim().is_empty() => {
                format!("{} {}", date, time.trim())
            }
            _ => date.to_string(),
        };
        return Ok(parse_time(&combined)?);
    }

    for key in ["DATE_OBS", "T_OBS"] {
        if let Some(value) = header.get_str(key) {
            return Ok(parse_time(value)?);
        }
    }

    Err(CompositeError::missing_metadata("DATE-OBS", "observation time"))
}

/// Sun–observer distance in AU for an Earth-based or L1 observer.
///
/// Uses the first-order eccentricity term with perihelion on January 4.
pub fn earth_sun_distance_au(date: &DateTime<Utc>) -> f64 {
    let day = date.ordinal() as f64;
    1.0 - 0.01672 * (0.9856 * (day - 4.0)).to_radians().cos()
}

/// Angular solar radius in arcsec, with the source it was taken from.
pub fn solar_radius_arcsec(header: &Header, date: &DateTime<Utc>) -> (f64, RadiusSource) {
    for key in ["RSUN_OBS", "RSUN_ARC", "RSUN"] {
        if let Some(value) = header.get_f64(key).filter(|v| v.is_finite() && *v > 0.0) {
            return (value, RadiusSource::Keyword(key));
        }
    }

    if let Some(dsun) = header.get_f64("DSUN_OBS").filter(|v| v.is_finite() && *v > 0.0) {
        let radius = (SOLAR_RADIUS_M / dsun).atan().to_degrees() * 3600.0;
        return (radius, RadiusSource::ObserverDistance);
    }

    (
        RSUN_ARCSEC_1AU / earth_sun_distance_au(date),
        RadiusSource::ObservationDate,
    )
}

/// Observed wavelength in angstrom, when recorded.
pub fn wavelength(header: &Header) -> Option<f64> {
    header.get_f64("WAVELNTH")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use fits_io::Value;

    fn header(entries: &[(&str, Value)]) -> Header {
        let mut h = Header::new();
        for (k, v) in entries {
            h.set(k, v.clone());
        }
        h
    }

    #[test]
    fn test_date_obs_iso() {
        let h = header(&[("DATE-OBS", Value::Text("2021-01-01T12:00:15".into()))]);
        assert_eq!(
            observation_date(&h).unwrap(),
            Utc.with_ymd_and_hms(2021, 1, 1, 12, 0, 15).unwrap()
        );
    }

    #[test]
    fn test_date_obs_with_time_obs() {
        let h = header(&[
            ("DATE-OBS", Value::Text("2021/01/01".into())),
            ("TIME-OBS", Value::Text("11:48:07.456".into())),
        ]);
        let date = observation_date(&h).unwrap();
        assert_eq!(date.format("%H:%M:%S%.3f").to_string(), "11:48:07.456");
    }

    #[test]
    fn test_t_obs_fallback() {
        let h = header(&[("T_OBS", Value::Text("2021-01-01T11:55:00.57Z".into()))]);
        assert!(observation_date(&h).is_ok());
    }

    #[test]
    fn test_missing_date_is_error() {
        let err = observation_date(&Header::new()).unwrap_err();
        assert!(matches!(err, CompositeError::MissingMetadata { .. }));
    }

    #[test]
    fn test_radius_keyword_order() {
        let date = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
        let h = header(&[
            ("RSUN", Value::Float(970.0)),
            ("RSUN_OBS", Value::Float(975.5)),
        ]);
        assert_eq!(solar_radius_arcsec(&h, &date), (975.5, RadiusSource::Keyword("RSUN_OBS")));
    }

    #[test]
    fn test_radius_from_distance() {
        let date = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
        let h = header(&[("DSUN_OBS", Value::Float(AU_M))]);
        let (radius, source) = solar_radius_arcsec(&h, &date);
        assert_eq!(source, RadiusSource::ObserverDistance);
        assert!((radius - 959.2).abs() < 1.0);
    }

    #[test]
    fn test_radius_from_date_is_larger_at_perihelion() {
        let january = Utc.with_ymd_and_hms(2021, 1, 4, 0, 0, 0).unwrap();
        let july = Utc.with_ymd_and_hms(2021, 7, 4, 0, 0, 0).unwrap();
        let (r_jan, source) = solar_radius_arcsec(&Header::new(), &january);
        let (r_jul, _) = solar_radius_arcsec(&Header::new(), &july);
        assert_eq!(source, RadiusSource::ObservationDate);
        assert!(r_jan > 975.0 && r_jan < 977.0);
        assert!(r_jul < 945.0);
    }
}
