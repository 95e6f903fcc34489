// Byte-size string parsing

/// Suffix table, longest suffixes first so "MiB" is not matched as "B".
const BYTE_UNITS: [(&str, f64); 7] = [
    ("KiB", 1024.0),
    ("MiB", 1024.0 * 1024.0),
    ("GiB", 1024.0 * 1024.0 * 1024.0),
    ("kB", 1000.0),
    ("MB", 1_000_000.0),
    ("GB", 1_000_000_000.0),
    ("B", 1.0),
];

/// Parses a byte-size string with a trailing unit suffix: binary
/// `KiB`/`MiB`/`GiB`, decimal `kB`/`MB`/`GB`, or bare `B`.
/// Unrecognized or too-short input yields 0.
pub fn convert_to_bytes(raw: &str) -> u64 {
    for (suffix, factor) in BYTE_UNITS {
        if raw.len() > suffix.len() && raw.ends_with(suffix) {
            let num: f64 = raw[..raw.len() - suffix.len()].parse().unwrap_or(0.0);
            return (num * factor) as u64;
        }
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_binary_units() {
        assert_eq!(convert_to_bytes("1KiB"), 1024);
        assert_eq!(convert_to_bytes("1.5GiB"), 1_610_612_736);
        assert_eq!(convert_to_bytes("2MiB"), 2 * 1024 * 1024);
    }

    #[test]
    fn parses_decimal_units() {
        assert_eq!(convert_to_bytes("500MB"), 500_000_000);
        assert_eq!(convert_to_bytes("3kB"), 3000);
        assert_eq!(convert_to_bytes("2GB"), 2_000_000_000);
    }

    #[test]
    fn parses_bare_bytes() {
        assert_eq!(convert_to_bytes("10B"), 10);
    }

    #[test]
    fn unrecognized_input_yields_zero() {
        assert_eq!(convert_to_bytes(""), 0);
        assert_eq!(convert_to_bytes("B"), 0);
        assert_eq!(convert_to_bytes("12"), 0);
        assert_eq!(convert_to_bytes("5TiB"), 0);
        assert_eq!(convert_to_bytes("xMB"), 0);
    }
}
