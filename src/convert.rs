/*!
Converters for the `convert` stage of a pipeline.

Any `Fn(&str) -> Result<T, ValueError>` can be a converter. This module
provides the common ones: [`parsed`] for any type implementing
[`ParsedValue`], and [`boolean`], which reads the usual spellings of true and
false and is used for flags set from environment variables.
 */

use std::{fmt::Display, str::FromStr};

use crate::errors::ValueError;

/**
For types with a [`FromStr`] implementation, [`ParsedValue`] allows them to be
used with [`parsed`]. It also describes the type for error messages and
provides a default placeholder for usage messages.
 */
pub trait ParsedValue: FromStr {
    /// How to describe the expected value in an error, like `"integer"`
    const EXPECTED: &'static str;

    /// The default metavar for options of this type, like `INT`
    const METAVAR: &'static str;
}

macro_rules! parsed_values {
    ($(
        $type:ident $(:: $path:ident)* => ($expected:literal, $metavar:literal)
    ),* $(,)?) => {
        $(
            impl ParsedValue for $type $(:: $path)* {
                const EXPECTED: &'static str = $expected;
                const METAVAR: &'static str = $metavar;
            }
        )*
    };
}

parsed_values! {
    u8 => ("integer", "INT"),
    u16 => ("integer", "INT"),
    u32 => ("integer", "INT"),
    u64 => ("integer", "INT"),
    u128 => ("integer", "INT"),
    usize => ("integer", "INT"),
    i8 => ("integer", "INT"),
    i16 => ("integer", "INT"),
    i32 => ("integer", "INT"),
    i64 => ("integer", "INT"),
    i128 => ("integer", "INT"),
    isize => ("integer", "INT"),
    f32 => ("number", "FLOAT"),
    f64 => ("number", "FLOAT"),
    char => ("character", "CHAR"),
    String => ("string", "TEXT"),
    std::path::PathBuf => ("path", "FILE"),
    std::net::IpAddr => ("IP address", "ADDR"),
    std::net::Ipv4Addr => ("IPv4 address", "ADDR"),
    std::net::Ipv6Addr => ("IPv6 address", "ADDR"),
    std::net::SocketAddr => ("socket address", "ADDR"),
}

/// Convert a raw string with [`FromStr`]
pub fn parsed<T>(raw: &str) -> Result<T, ValueError>
where
    T: ParsedValue,
    T::Err: Display,
{
    raw.parse()
        .map_err(|err| ValueError::conversion(raw, T::EXPECTED, err))
}

/// Read a boolean, accepting `true`/`false`, `t`/`f`, `yes`/`no`, `y`/`n`,
/// `on`/`off`, and `1`/`0`, in any case.
pub fn boolean(raw: &str) -> Result<bool, ValueError> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "on" | "1" => Ok(true),
        "false" | "f" | "no" | "n" | "off" | "0" => Ok(false),
        _ => Err(ValueError::conversion(
            raw,
            "boolean",
            "expected one of true/false, yes/no, on/off, or 1/0",
        )),
    }
}

/// Read a non-negative count, as used for counted flags set from the
/// environment.
pub fn count(raw: &str) -> Result<usize, ValueError> {
    parsed(raw.trim())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn parsed_reports_the_expected_type() {
        assert_eq!(parsed::<i32>("-12"), Ok(-12));
        assert_eq!(parsed::<PathBuf>("/home"), Ok(PathBuf::from("/home")));

        match parsed::<u8>("300") {
            Err(ValueError::Conversion { raw, expected, .. }) => {
                assert_eq!(raw, "300");
                assert_eq!(expected, "integer");
            }
            other => panic!("expected a conversion error, got {other:?}"),
        }
    }

    #[test]
    fn booleans() {
        for raw in ["YES", "true", "On", "1", "y"] {
            assert_eq!(boolean(raw), Ok(true), "{raw}");
        }

        for raw in ["false", "NO", "off", "0", "F"] {
            assert_eq!(boolean(raw), Ok(false), "{raw}");
        }

        assert!(boolean("maybe").is_err());
    }

    #[test]
    fn counts() {
        assert_eq!(count("3"), Ok(3));
        assert_eq!(count(" 5 "), Ok(5));
        assert!(count("-1").is_err());
    }
}
