//! Range checks for incoming telemetry

use crate::ingest::TelemetryReading;
use crate::IngestError;

const RANGES: &[(&str, f64, f64)] = &[
    ("engine_load", 0.0, 1.0),
    ("oil_quality", 0.0, 10.0),
    ("battery_percent", 0.0, 100.0),
    ("tire_pressure", 0.0, 100.0),
    ("brake_temp", 0.0, 300.0),
    ("fuel_consumption", 0.0, 100.0),
];

/// Validate a reading against the accepted sensor ranges.
///
/// The first violation is returned; a reading is either accepted whole or
/// rejected whole.
pub fn validate_reading(reading: &TelemetryReading) -> Result<(), IngestError> {
    if reading.vehicle_id.is_empty() {
        return Err(IngestError::MissingField("vehicle_id"));
    }

    let values = [
        reading.engine_load,
        reading.oil_quality,
        reading.battery_percent,
        reading.tire_pressure,
        reading.brake_temp,
        reading.fuel_consumption,
    ];
    for (&(field, min, max), value) in RANGES.iter().zip(values) {
        if value < min || value > max {
            return Err(IngestError::OutOfRange {
                field,
                value,
                min,
                max,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use storage::BrakeCondition;

    fn reading() -> TelemetryReading {
        TelemetryReading {
            vehicle_id: "V001".to_string(),
            timestamp: Some(Utc::now()),
            mileage: 52_300,
            engine_load: 0.62,
            oil_quality: 6.4,
            battery_percent: 88.0,
            brake_condition: BrakeCondition::Good,
            brake_temp: 75.0,
            tire_pressure: 32.0,
            fuel_consumption: 8.5,
        }
    }

    #[test]
    fn test_accepts_nominal_reading() {
        assert!(validate_reading(&reading()).is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_engine_load() {
        let mut r = reading();
        r.engine_load = 1.4;
        let err = validate_reading(&r).unwrap_err();
        assert!(matches!(err, IngestError::OutOfRange { field: "engine_load", .. }));
    }

    #[test]
    fn test_rejects_negative_oil_quality() {
        let mut r = reading();
        r.oil_quality = -0.1;
        assert!(validate_reading(&r).is_err());
    }

    #[test]
    fn test_rejects_missing_vehicle_id() {
        let mut r = reading();
        r.vehicle_id = String::new();
        let err = validate_reading(&r).unwrap_err();
        assert!(matches!(err, IngestError::MissingField("vehicle_id")));
    }
}
