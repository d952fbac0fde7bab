/// Hex color parsing for preset and attribute values.
///
/// Accepts 6-hex-digit strings with an optional leading `#`, case-insensitive.
/// Malformed input never errors: rendering must survive a bad preset, so the
/// float conversion falls back to opaque white.

/// Parse `#rrggbb` into byte channels. `None` on anything malformed.
pub fn parse_hex(hex: &str) -> Option<[u8; 3]> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
    let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
    let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
    Some([r, g, b])
}

/// Convert a hex color to normalized float RGB, each channel in [0, 1].
/// Invalid input yields white rather than failing.
pub fn hex_to_rgbf(hex: &str) -> [f32; 3] {
    match parse_hex(hex) {
        Some([r, g, b]) => [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0],
        None => [1.0, 1.0, 1.0],
    }
}

/// True if the string is a well-formed 6-digit hex color.
pub fn is_valid_hex(hex: &str) -> bool {
    parse_hex(hex).is_some()
}

/// Canonical form: lowercase with a leading `#`. `None` if malformed.
pub fn normalize_hex(hex: &str) -> Option<String> {
    parse_hex(hex).map(|[r, g, b]| format!("#{:02x}{:02x}{:02x}", r, g, b))
}
