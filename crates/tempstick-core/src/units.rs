//! Unit helpers for sensor values

/// Convert a temperature in degrees Celsius to degrees Fahrenheit
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    (celsius * 9.0 / 5.0) + 32.0
}

/// Express an RSSI value in dBm as a signal quality percentage
///
/// The mapping is linear (`2 * (dbm + 100)`) and not clamped, so readings
/// above -50 dBm report more than 100%.
pub fn signal_quality(dbm: f64) -> String {
    format!("{}%", 2.0 * (dbm + 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_celsius_to_fahrenheit() {
        assert!((celsius_to_fahrenheit(0.0) - 32.0).abs() < 0.01);
        assert!((celsius_to_fahrenheit(37.0) - 98.6).abs() < 0.01);
        assert!((celsius_to_fahrenheit(-273.15) - -459.67).abs() < 0.01);
        assert!((celsius_to_fahrenheit(1000.0) - 1832.0).abs() < 0.01);
    }

    #[test]
    fn test_signal_quality() {
        assert_eq!(signal_quality(-100.0), "0%");
        assert_eq!(signal_quality(-75.0), "50%");
        assert_eq!(signal_quality(0.0), "200%");
        assert_eq!(signal_quality(-110.0), "-20%");
    }
}
