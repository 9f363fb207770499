//! Conversions between platform units and Govee native units.
//!
//! The platform speaks brightness 1-255, color temperature in mireds and
//! colors as hue/saturation. Govee devices speak brightness 0-254, Kelvin and
//! RGB byte triples. Everything in here is pure; conversions happen only at
//! the entity boundary.

/// Warmest color temperature accepted by the Govee API.
pub const COLOR_TEMP_KELVIN_MIN: u32 = 2000;
/// Coldest color temperature accepted by the Govee API.
pub const COLOR_TEMP_KELVIN_MAX: u32 = 9000;

const MIRED_SCALE: u32 = 1_000_000;

/// Native brightness (0-254) to platform brightness (1-255).
///
/// ```
/// use govee_hass_rs::convert::brightness_to_platform;
///
/// assert_eq!(brightness_to_platform(0), 1);
/// assert_eq!(brightness_to_platform(254), 255);
/// ```
pub fn brightness_to_platform(native: u8) -> u8 {
    native.saturating_add(1)
}

/// Platform brightness (1-255) to native brightness (0-254).
pub fn brightness_to_native(platform: u8) -> u8 {
    platform.saturating_sub(1)
}

/// Returns `None` for zero, which has no Kelvin equivalent.
pub fn mireds_to_kelvin(mireds: u32) -> Option<u32> {
    reciprocal(mireds)
}

/// Returns `None` for zero, which the Govee API uses for "unset".
///
/// ```
/// use govee_hass_rs::convert::kelvin_to_mireds;
///
/// assert_eq!(kelvin_to_mireds(2000), Some(500));
/// assert_eq!(kelvin_to_mireds(0), None);
/// ```
pub fn kelvin_to_mireds(kelvin: u32) -> Option<u32> {
    reciprocal(kelvin)
}

fn reciprocal(value: u32) -> Option<u32> {
    if value == 0 {
        return None;
    }
    Some((MIRED_SCALE + value / 2) / value)
}

/// Clamp any Kelvin value into the range supported by the Govee API.
pub fn clamp_kelvin(value: i64) -> u32 {
    // Bounds fit in u32, so the cast after clamping is lossless.
    value.clamp(
        i64::from(COLOR_TEMP_KELVIN_MIN),
        i64::from(COLOR_TEMP_KELVIN_MAX),
    ) as u32
}

/// Hue (degrees) and saturation (percent) to an RGB triple at full value.
pub fn hs_to_rgb(hue: f64, saturation: f64) -> (u8, u8, u8) {
    let s = (saturation / 100.0).clamp(0.0, 1.0);
    if s == 0.0 {
        return (255, 255, 255);
    }

    let h = (hue / 360.0).rem_euclid(1.0) * 6.0;
    let i = h.floor();
    let f = h - i;
    let p = 1.0 - s;
    let q = 1.0 - s * f;
    let t = 1.0 - s * (1.0 - f);

    let (r, g, b) = match (i as u8) % 6 {
        0 => (1.0, t, p),
        1 => (q, 1.0, p),
        2 => (p, 1.0, t),
        3 => (p, q, 1.0),
        4 => (t, p, 1.0),
        _ => (1.0, p, q),
    };

    (to_byte(r), to_byte(g), to_byte(b))
}

/// RGB triple to hue (degrees) and saturation (percent), 3 decimals.
pub fn rgb_to_hs(red: u8, green: u8, blue: u8) -> (f64, f64) {
    let r = f64::from(red) / 255.0;
    let g = f64::from(green) / 255.0;
    let b = f64::from(blue) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    if max == min {
        return (0.0, 0.0);
    }

    let delta = max - min;
    let s = delta / max;
    let rc = (max - r) / delta;
    let gc = (max - g) / delta;
    let bc = (max - b) / delta;

    let h = if r == max {
        bc - gc
    } else if g == max {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };
    let h = (h / 6.0).rem_euclid(1.0);

    (round3(h * 360.0), round3(s * 100.0))
}

fn to_byte(channel: f64) -> u8 {
    (channel * 255.0).round() as u8
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brightness_round_trip() {
        for native in 0..=254u8 {
            assert_eq!(brightness_to_native(brightness_to_platform(native)), native);
        }
    }

    #[test]
    fn test_brightness_bounds() {
        assert_eq!(brightness_to_platform(0), 1);
        assert_eq!(brightness_to_native(255), 254);
        assert_eq!(brightness_to_native(1), 0);
    }

    #[test]
    fn test_mired_round_trip_error_is_bounded() {
        for kelvin in 2000..=9000u32 {
            let mireds = kelvin_to_mireds(kelvin).unwrap();
            let again = mireds_to_kelvin(mireds).and_then(kelvin_to_mireds).unwrap();
            assert!(
                mireds.abs_diff(again) <= 1,
                "kelvin {kelvin}: {mireds} vs {again}"
            );
        }
    }

    #[test]
    fn test_mired_rounds_to_nearest() {
        assert_eq!(mireds_to_kelvin(300), Some(3333));
        assert_eq!(kelvin_to_mireds(9000), Some(111));
        assert_eq!(kelvin_to_mireds(6500), Some(154));
    }

    #[test]
    fn test_zero_has_no_reciprocal() {
        assert_eq!(mireds_to_kelvin(0), None);
        assert_eq!(kelvin_to_mireds(0), None);
    }

    #[test]
    fn test_clamp_kelvin() {
        for value in [i64::MIN, -1, 0, 1999, 2000, 4500, 9000, 9001, i64::MAX] {
            let clamped = clamp_kelvin(value);
            assert!((COLOR_TEMP_KELVIN_MIN..=COLOR_TEMP_KELVIN_MAX).contains(&clamped));
        }
        assert_eq!(clamp_kelvin(-5), COLOR_TEMP_KELVIN_MIN);
        assert_eq!(clamp_kelvin(4500), 4500);
        assert_eq!(clamp_kelvin(1_000_000), COLOR_TEMP_KELVIN_MAX);
    }

    #[test]
    fn test_hs_to_rgb_primaries() {
        assert_eq!(hs_to_rgb(0.0, 100.0), (255, 0, 0));
        assert_eq!(hs_to_rgb(120.0, 100.0), (0, 255, 0));
        assert_eq!(hs_to_rgb(240.0, 100.0), (0, 0, 255));
        assert_eq!(hs_to_rgb(360.0, 100.0), (255, 0, 0));
        assert_eq!(hs_to_rgb(30.0, 0.0), (255, 255, 255));
        assert_eq!(hs_to_rgb(0.0, 50.0), (255, 128, 128));
    }

    #[test]
    fn test_rgb_to_hs_primaries() {
        assert_eq!(rgb_to_hs(255, 0, 0), (0.0, 100.0));
        assert_eq!(rgb_to_hs(0, 255, 0), (120.0, 100.0));
        assert_eq!(rgb_to_hs(0, 0, 255), (240.0, 100.0));
        assert_eq!(rgb_to_hs(255, 255, 255), (0.0, 0.0));
        assert_eq!(rgb_to_hs(0, 0, 0), (0.0, 0.0));
    }

    #[test]
    fn test_hs_survives_rgb() {
        let (r, g, b) = hs_to_rgb(200.0, 80.0);
        let (h, s) = rgb_to_hs(r, g, b);
        assert!((h - 200.0).abs() < 1.0, "hue {h}");
        assert!((s - 80.0).abs() < 1.0, "saturation {s}");
    }
}
