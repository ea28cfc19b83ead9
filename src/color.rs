//! Color conversions used by the hue-ordered region sort.

/// RGB to HSV with integer-friendly ranges: hue in `[0, 1536)` (256 * 6),
/// saturation and value in `[0, 255]`.
///
/// Hue 0 is red; the scale wraps at 1536.
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
    const MAX_HUE: f64 = 256.0 * 6.0;
    let (r, g, b) = (r as f64, g as f64, b as f64);

    let (val, mut sat, m1, m2) = if r > g {
        if r > b {
            let sat = if g > b { r - b } else { r - g };
            (r, sat, g - b, 6.0)
        } else {
            (b, b - g, r - g, 4.0)
        }
    } else if g > b {
        let sat = if b > r { g - r } else { g - b };
        (g, sat, b - r, 2.0)
    } else {
        (b, b - r, r - g, 4.0)
    };

    let hue;
    if val == 0.0 {
        sat = 0.0;
        hue = 0.0;
    } else if sat == 0.0 {
        hue = 0.0;
    } else {
        let mut h = (MAX_HUE * (m2 * sat + m1)) / (6.0 * sat);
        if h >= MAX_HUE {
            h -= MAX_HUE;
        }
        hue = h;
        sat = (255.0 * sat) / val;
    }

    (hue, sat, val)
}

/// Parse `#rgb` or `#rrggbb` (leading `#` optional) into `[r, g, b, a]`
/// with components in `[0, 255]` and alpha 255. Malformed input is black.
pub fn parse_hex_color(s: &str) -> [u8; 4] {
    let s = s.strip_prefix('#').unwrap_or(s);
    let digits: Vec<u8> = match s.len() {
        3 => s
            .chars()
            .filter_map(|c| c.to_digit(16))
            .map(|d| (d * 16 + d) as u8)
            .collect(),
        6 => s
            .as_bytes()
            .chunks(2)
            .filter_map(|p| u8::from_str_radix(std::str::from_utf8(p).ok()?, 16).ok())
            .collect(),
        _ => Vec::new(),
    };
    match digits.as_slice() {
        [r, g, b] => [*r, *g, *b, 255],
        _ => [0, 0, 0, 255],
    }
}

/// Parse a computed-style `rgb(r, g, b)` / `rgba(r, g, b, a)` string.
/// Alpha defaults to 1.0 when absent.
pub fn parse_css_color(s: &str) -> Option<[f64; 4]> {
    let s = s.trim();
    let body = s
        .strip_prefix("rgba(")
        .or_else(|| s.strip_prefix("rgb("))?
        .strip_suffix(')')?;
    let mut parts = body.split(',').map(str::trim);
    let r = parts.next()?.parse::<f64>().ok()?;
    let g = parts.next()?.parse::<f64>().ok()?;
    let b = parts.next()?.parse::<f64>().ok()?;
    let a = match parts.next() {
        Some(p) => p.parse::<f64>().ok()?,
        None => 1.0,
    };
    if parts.next().is_some() {
        return None;
    }
    Some([r, g, b, a])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_hues() {
        assert_eq!(rgb_to_hsv(255, 0, 0), (0.0, 255.0, 255.0));
        assert_eq!(rgb_to_hsv(0, 255, 0), (512.0, 255.0, 255.0));
        assert_eq!(rgb_to_hsv(0, 0, 255), (1024.0, 255.0, 255.0));
    }

    #[test]
    fn greys_have_no_hue() {
        assert_eq!(rgb_to_hsv(0, 0, 0), (0.0, 0.0, 0.0));
        let (h, s, v) = rgb_to_hsv(128, 128, 128);
        assert_eq!((h, s), (0.0, 0.0));
        assert_eq!(v, 128.0);
    }

    #[test]
    fn hue_orders_along_the_wheel() {
        let (orange, ..) = rgb_to_hsv(0xe3, 0x89, 0x39);
        let (green, ..) = rgb_to_hsv(0x60, 0xbf, 0x20);
        let (blue, ..) = rgb_to_hsv(0x41, 0x95, 0xdc);
        assert!(orange < green && green < blue);
    }

    #[test]
    fn hex_parsing() {
        assert_eq!(parse_hex_color("#4195dc"), [0x41, 0x95, 0xdc, 255]);
        assert_eq!(parse_hex_color("e42b28"), [0xe4, 0x2b, 0x28, 255]);
        assert_eq!(parse_hex_color("#f80"), [0xff, 0x88, 0x00, 255]);
        assert_eq!(parse_hex_color("not a color"), [0, 0, 0, 255]);
        assert_eq!(parse_hex_color("#12345"), [0, 0, 0, 255]);
    }

    #[test]
    fn css_color_parsing() {
        assert_eq!(
            parse_css_color("rgb(65, 149, 220)"),
            Some([65.0, 149.0, 220.0, 1.0])
        );
        assert_eq!(
            parse_css_color("rgba(0, 0, 0, 0.5)"),
            Some([0.0, 0.0, 0.0, 0.5])
        );
        assert_eq!(parse_css_color("#4195dc"), None);
    }
}
