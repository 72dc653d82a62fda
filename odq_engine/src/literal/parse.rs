//! Literal parsing against declared types and facets
//!
//! Two entry points: `parse_literal` checks a token against a known target
//! type (key predicates, function parameters), `infer_literal` derives the
//! type from the token's own lexical shape (expression operands). Lexical
//! shape errors and value-domain errors stay distinct: a token of the wrong
//! family is a `LiteralTypeMismatch`, a well-formed token whose value does
//! not fit is a `LiteralOutOfRange`.

use super::value::TypedValue;
use crate::edm::{EdmSimpleType, Facets};
use crate::error::{UriResult, UriSyntaxError};
use crate::utils::Span;
use chrono::{DateTime, NaiveDateTime, NaiveTime};

/// Parse a raw token against a declared simple type and its facets
pub fn parse_literal(
    raw: &str,
    target: EdmSimpleType,
    facets: &Facets,
    span: Span,
) -> UriResult<TypedValue> {
    if raw == "null" {
        return if facets.is_nullable() {
            Ok(TypedValue::Null)
        } else {
            Err(UriSyntaxError::literal_type_mismatch(
                raw,
                target.name(),
                span,
            ))
        };
    }

    match target {
        EdmSimpleType::String => {
            let text = unquote(raw)
                .ok_or_else(|| UriSyntaxError::literal_type_mismatch(raw, target.name(), span))?;
            if let Some(max) = facets.max_length {
                if text.chars().count() > max {
                    return Err(UriSyntaxError::literal_out_of_range(raw, target.name(), span));
                }
            }
            Ok(TypedValue::String(text))
        }
        EdmSimpleType::Boolean => match raw {
            "true" => Ok(TypedValue::Boolean(true)),
            "false" => Ok(TypedValue::Boolean(false)),
            _ => Err(UriSyntaxError::literal_type_mismatch(raw, target.name(), span)),
        },
        EdmSimpleType::Guid => parse_guid(raw, span).map(TypedValue::Guid),
        EdmSimpleType::Binary => parse_binary(raw, span).map(TypedValue::Binary),
        EdmSimpleType::DateTime => parse_datetime(raw, span).map(TypedValue::DateTime),
        EdmSimpleType::DateTimeOffset => {
            parse_datetime_offset(raw, span).map(TypedValue::DateTimeOffset)
        }
        EdmSimpleType::Time => parse_time(raw, span).map(TypedValue::Time),
        EdmSimpleType::SByte => parse_integer(raw, target, span, i8::MIN as i128, i8::MAX as i128)
            .map(|v| TypedValue::SByte(v as i8)),
        EdmSimpleType::Byte => parse_integer(raw, target, span, 0, u8::MAX as i128)
            .map(|v| TypedValue::Byte(v as u8)),
        EdmSimpleType::Int16 => {
            parse_integer(raw, target, span, i16::MIN as i128, i16::MAX as i128)
                .map(|v| TypedValue::Int16(v as i16))
        }
        EdmSimpleType::Int32 => {
            parse_integer(raw, target, span, i32::MIN as i128, i32::MAX as i128)
                .map(|v| TypedValue::Int32(v as i32))
        }
        EdmSimpleType::Int64 => {
            let text = raw.strip_suffix(['L', 'l']).unwrap_or(raw);
            parse_integer(text, target, span, i64::MIN as i128, i64::MAX as i128)
                .map(|v| TypedValue::Int64(v as i64))
        }
        EdmSimpleType::Single => {
            let text = raw.strip_suffix(['f', 'F']).unwrap_or(raw);
            text.parse::<f32>()
                .map(TypedValue::Single)
                .map_err(|_| UriSyntaxError::literal_type_mismatch(raw, target.name(), span))
        }
        EdmSimpleType::Double => {
            let text = raw.strip_suffix(['d', 'D']).unwrap_or(raw);
            text.parse::<f64>()
                .map(TypedValue::Double)
                .map_err(|_| UriSyntaxError::literal_type_mismatch(raw, target.name(), span))
        }
        EdmSimpleType::Decimal => parse_decimal(raw, facets, span).map(TypedValue::Decimal),
    }
}

/// Derive a value and type from a token's lexical shape alone
pub fn infer_literal(raw: &str, span: Span) -> UriResult<TypedValue> {
    match raw {
        "null" => return Ok(TypedValue::Null),
        "true" => return Ok(TypedValue::Boolean(true)),
        "false" => return Ok(TypedValue::Boolean(false)),
        _ => {}
    }

    if raw.starts_with('\'') {
        let text = unquote(raw)
            .ok_or_else(|| UriSyntaxError::literal_type_mismatch(raw, "Edm.String", span))?;
        return Ok(TypedValue::String(text));
    }
    if raw.starts_with("guid'") {
        return parse_guid(raw, span).map(TypedValue::Guid);
    }
    if raw.starts_with("datetimeoffset'") {
        return parse_datetime_offset(raw, span).map(TypedValue::DateTimeOffset);
    }
    if raw.starts_with("datetime'") {
        return parse_datetime(raw, span).map(TypedValue::DateTime);
    }
    if raw.starts_with("time'") {
        return parse_time(raw, span).map(TypedValue::Time);
    }
    if raw.starts_with("binary'") || raw.starts_with("X'") || raw.starts_with("x'") {
        return parse_binary(raw, span).map(TypedValue::Binary);
    }

    infer_numeric(raw, span)
}

fn infer_numeric(raw: &str, span: Span) -> UriResult<TypedValue> {
    if let Some(text) = raw.strip_suffix(['L', 'l']) {
        return parse_integer(text, EdmSimpleType::Int64, span, i64::MIN as i128, i64::MAX as i128)
            .map(|v| TypedValue::Int64(v as i64));
    }
    if let Some(text) = raw.strip_suffix(['M', 'm']) {
        return parse_decimal(text, &Facets::none(), span).map(TypedValue::Decimal);
    }
    if let Some(text) = raw.strip_suffix(['F', 'f']) {
        return text
            .parse::<f32>()
            .map(TypedValue::Single)
            .map_err(|_| UriSyntaxError::literal_type_mismatch(raw, "Edm.Single", span));
    }
    if let Some(text) = raw.strip_suffix(['D', 'd']) {
        return text
            .parse::<f64>()
            .map(TypedValue::Double)
            .map_err(|_| UriSyntaxError::literal_type_mismatch(raw, "Edm.Double", span));
    }

    if is_integer_text(raw) {
        // Widen only as far as the value requires
        return match raw.parse::<i128>() {
            Ok(v) if v >= i32::MIN as i128 && v <= i32::MAX as i128 => {
                Ok(TypedValue::Int32(v as i32))
            }
            Ok(v) if v >= i64::MIN as i128 && v <= i64::MAX as i128 => {
                Ok(TypedValue::Int64(v as i64))
            }
            _ => Err(UriSyntaxError::literal_out_of_range(raw, "Edm.Int64", span)),
        };
    }

    // Unsuffixed fractional or exponent notation reads as Edm.Double
    raw.parse::<f64>()
        .map(TypedValue::Double)
        .map_err(|_| UriSyntaxError::literal_type_mismatch(raw, "Edm literal", span))
}

fn is_integer_text(text: &str) -> bool {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn parse_integer(
    raw: &str,
    target: EdmSimpleType,
    span: Span,
    min: i128,
    max: i128,
) -> UriResult<i128> {
    if !is_integer_text(raw) {
        return Err(UriSyntaxError::literal_type_mismatch(raw, target.name(), span));
    }
    match raw.parse::<i128>() {
        Ok(v) if v >= min && v <= max => Ok(v),
        _ => Err(UriSyntaxError::literal_out_of_range(raw, target.name(), span)),
    }
}

fn parse_decimal(raw: &str, facets: &Facets, span: Span) -> UriResult<String> {
    let text = raw.strip_suffix(['M', 'm']).unwrap_or(raw);
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);

    let (whole, fraction) = match unsigned.split_once('.') {
        Some((w, f)) => (w, f),
        None => (unsigned, ""),
    };
    let lexically_valid = !whole.is_empty()
        && whole.bytes().all(|b| b.is_ascii_digit())
        && fraction.bytes().all(|b| b.is_ascii_digit())
        && (!unsigned.contains('.') || !fraction.is_empty());
    if !lexically_valid {
        return Err(UriSyntaxError::literal_type_mismatch(raw, "Edm.Decimal", span));
    }

    if let Some(precision) = facets.precision {
        let digits = whole.trim_start_matches('0').len().max(1) + fraction.len();
        if digits > precision as usize {
            return Err(UriSyntaxError::literal_out_of_range(raw, "Edm.Decimal", span));
        }
    }
    if let Some(scale) = facets.scale {
        if fraction.len() > scale as usize {
            return Err(UriSyntaxError::literal_out_of_range(raw, "Edm.Decimal", span));
        }
    }

    Ok(text.strip_prefix('+').unwrap_or(text).to_string())
}

/// Strip surrounding single quotes, collapsing '' escapes
fn unquote(raw: &str) -> Option<String> {
    let inner = raw.strip_prefix('\'')?.strip_suffix('\'')?;

    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\'' {
            // A quote inside must be doubled
            if chars.next() != Some('\'') {
                return None;
            }
        }
        result.push(c);
    }
    Some(result)
}

fn prefixed_body<'a>(raw: &'a str, prefix: &str) -> Option<&'a str> {
    raw.strip_prefix(prefix)?
        .strip_prefix('\'')?
        .strip_suffix('\'')
}

fn parse_guid(raw: &str, span: Span) -> UriResult<String> {
    let body = prefixed_body(raw, "guid")
        .ok_or_else(|| UriSyntaxError::literal_type_mismatch(raw, "Edm.Guid", span))?;

    let groups: Vec<&str> = body.split('-').collect();
    let expected = [8, 4, 4, 4, 12];
    let valid = groups.len() == 5
        && groups
            .iter()
            .zip(expected.iter())
            .all(|(g, len)| g.len() == *len && g.bytes().all(|b| b.is_ascii_hexdigit()));
    if !valid {
        return Err(UriSyntaxError::literal_type_mismatch(raw, "Edm.Guid", span));
    }
    Ok(body.to_lowercase())
}

fn parse_binary(raw: &str, span: Span) -> UriResult<Vec<u8>> {
    let body = prefixed_body(raw, "binary")
        .or_else(|| prefixed_body(raw, "X"))
        .or_else(|| prefixed_body(raw, "x"))
        .ok_or_else(|| UriSyntaxError::literal_type_mismatch(raw, "Edm.Binary", span))?;

    if body.len() % 2 != 0 || !body.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(UriSyntaxError::literal_type_mismatch(raw, "Edm.Binary", span));
    }
    let bytes = body
        .as_bytes()
        .chunks(2)
        .map(|pair| {
            let hex = std::str::from_utf8(pair).unwrap_or("");
            u8::from_str_radix(hex, 16)
                .map_err(|_| UriSyntaxError::literal_type_mismatch(raw, "Edm.Binary", span))
        })
        .collect::<UriResult<Vec<u8>>>()?;
    Ok(bytes)
}

fn parse_datetime(raw: &str, span: Span) -> UriResult<NaiveDateTime> {
    let body = prefixed_body(raw, "datetime")
        .ok_or_else(|| UriSyntaxError::literal_type_mismatch(raw, "Edm.DateTime", span))?;

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(body, format) {
            return Ok(dt);
        }
    }
    Err(UriSyntaxError::literal_type_mismatch(raw, "Edm.DateTime", span))
}

fn parse_datetime_offset(raw: &str, span: Span) -> UriResult<DateTime<chrono::FixedOffset>> {
    let body = prefixed_body(raw, "datetimeoffset")
        .ok_or_else(|| UriSyntaxError::literal_type_mismatch(raw, "Edm.DateTimeOffset", span))?;

    DateTime::parse_from_rfc3339(body)
        .map_err(|_| UriSyntaxError::literal_type_mismatch(raw, "Edm.DateTimeOffset", span))
}

fn parse_time(raw: &str, span: Span) -> UriResult<NaiveTime> {
    let body = prefixed_body(raw, "time")
        .ok_or_else(|| UriSyntaxError::literal_type_mismatch(raw, "Edm.Time", span))?;

    let mismatch = || UriSyntaxError::literal_type_mismatch(raw, "Edm.Time", span);
    let mut rest = body.strip_prefix("PT").ok_or_else(mismatch)?;

    let mut hours = 0u32;
    let mut minutes = 0u32;
    let mut seconds = 0u32;
    let mut saw_component = false;

    for (designator, slot) in [('H', &mut hours), ('M', &mut minutes), ('S', &mut seconds)] {
        if let Some(pos) = rest.find(designator) {
            let (digits, tail) = rest.split_at(pos);
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(mismatch());
            }
            *slot = digits.parse().map_err(|_| mismatch())?;
            rest = &tail[1..];
            saw_component = true;
        }
    }

    if !saw_component || !rest.is_empty() {
        return Err(mismatch());
    }

    NaiveTime::from_hms_opt(hours, minutes, seconds)
        .ok_or_else(|| UriSyntaxError::literal_out_of_range(raw, "Edm.Time", span))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literal::format_literal;
    use assert_matches::assert_matches;

    fn span() -> Span {
        Span::new(0, 1)
    }

    #[test]
    fn test_string_parsing() {
        let value =
            parse_literal("'O''Neil'", EdmSimpleType::String, &Facets::none(), span()).unwrap();
        assert_eq!(value, TypedValue::String("O'Neil".to_string()));

        let err = parse_literal("unquoted", EdmSimpleType::String, &Facets::none(), span());
        assert_matches!(err, Err(UriSyntaxError::LiteralTypeMismatch { .. }));
    }

    #[test]
    fn test_string_max_length_facet() {
        let facets = Facets::with_max_length(3);
        assert!(parse_literal("'abc'", EdmSimpleType::String, &facets, span()).is_ok());
        assert_matches!(
            parse_literal("'abcd'", EdmSimpleType::String, &facets, span()),
            Err(UriSyntaxError::LiteralOutOfRange { .. })
        );
    }

    #[test]
    fn test_integer_range_vs_shape() {
        assert_eq!(
            parse_literal("200", EdmSimpleType::Byte, &Facets::none(), span()).unwrap(),
            TypedValue::Byte(200)
        );
        assert_matches!(
            parse_literal("300", EdmSimpleType::Byte, &Facets::none(), span()),
            Err(UriSyntaxError::LiteralOutOfRange { .. })
        );
        assert_matches!(
            parse_literal("abc", EdmSimpleType::Byte, &Facets::none(), span()),
            Err(UriSyntaxError::LiteralTypeMismatch { .. })
        );
    }

    #[test]
    fn test_int64_suffix() {
        assert_eq!(
            parse_literal("42L", EdmSimpleType::Int64, &Facets::none(), span()).unwrap(),
            TypedValue::Int64(42)
        );
        assert_eq!(
            parse_literal("42", EdmSimpleType::Int64, &Facets::none(), span()).unwrap(),
            TypedValue::Int64(42)
        );
    }

    #[test]
    fn test_null_respects_nullability() {
        assert_eq!(
            parse_literal("null", EdmSimpleType::Int32, &Facets::none(), span()).unwrap(),
            TypedValue::Null
        );
        assert_matches!(
            parse_literal("null", EdmSimpleType::Int32, &Facets::not_nullable(), span()),
            Err(UriSyntaxError::LiteralTypeMismatch { .. })
        );
    }

    #[test]
    fn test_decimal_facets() {
        let facets = Facets {
            precision: Some(4),
            scale: Some(2),
            ..Facets::none()
        };
        assert!(parse_literal("12.34M", EdmSimpleType::Decimal, &facets, span()).is_ok());
        assert_matches!(
            parse_literal("12.345M", EdmSimpleType::Decimal, &facets, span()),
            Err(UriSyntaxError::LiteralOutOfRange { .. })
        );
        assert_matches!(
            parse_literal("12345.6M", EdmSimpleType::Decimal, &facets, span()),
            Err(UriSyntaxError::LiteralOutOfRange { .. })
        );
    }

    #[test]
    fn test_guid_parsing() {
        let raw = "guid'12345678-ABCD-abcd-1234-123456789012'";
        let value = parse_literal(raw, EdmSimpleType::Guid, &Facets::none(), span()).unwrap();
        assert_eq!(
            value,
            TypedValue::Guid("12345678-abcd-abcd-1234-123456789012".to_string())
        );

        assert_matches!(
            parse_literal("guid'not-a-guid'", EdmSimpleType::Guid, &Facets::none(), span()),
            Err(UriSyntaxError::LiteralTypeMismatch { .. })
        );
    }

    #[test]
    fn test_binary_parsing() {
        let value =
            parse_literal("binary'01AB'", EdmSimpleType::Binary, &Facets::none(), span()).unwrap();
        assert_eq!(value, TypedValue::Binary(vec![0x01, 0xAB]));

        let alt = parse_literal("X'FF'", EdmSimpleType::Binary, &Facets::none(), span()).unwrap();
        assert_eq!(alt, TypedValue::Binary(vec![0xFF]));
    }

    #[test]
    fn test_datetime_parsing() {
        let value = parse_literal(
            "datetime'2026-08-29T12:30:00'",
            EdmSimpleType::DateTime,
            &Facets::none(),
            span(),
        )
        .unwrap();
        assert_matches!(value, TypedValue::DateTime(_));

        assert_matches!(
            parse_literal(
                "datetime'29.08.2026'",
                EdmSimpleType::DateTime,
                &Facets::none(),
                span()
            ),
            Err(UriSyntaxError::LiteralTypeMismatch { .. })
        );
    }

    #[test]
    fn test_time_parsing() {
        let value = parse_literal(
            "time'PT12H30M5S'",
            EdmSimpleType::Time,
            &Facets::none(),
            span(),
        )
        .unwrap();
        assert_eq!(value, TypedValue::Time(NaiveTime::from_hms_opt(12, 30, 5).unwrap()));

        assert_matches!(
            parse_literal("time'PT99H'", EdmSimpleType::Time, &Facets::none(), span()),
            Err(UriSyntaxError::LiteralOutOfRange { .. })
        );
    }

    #[test]
    fn test_inference() {
        assert_eq!(infer_literal("42", span()).unwrap(), TypedValue::Int32(42));
        assert_eq!(
            infer_literal("5000000000", span()).unwrap(),
            TypedValue::Int64(5_000_000_000)
        );
        assert_eq!(
            infer_literal("42L", span()).unwrap(),
            TypedValue::Int64(42)
        );
        assert_eq!(
            infer_literal("1.5", span()).unwrap(),
            TypedValue::Double(1.5)
        );
        assert_eq!(
            infer_literal("1.5M", span()).unwrap(),
            TypedValue::Decimal("1.5".to_string())
        );
        assert_eq!(
            infer_literal("'hi'", span()).unwrap(),
            TypedValue::String("hi".to_string())
        );
        assert_eq!(
            infer_literal("true", span()).unwrap(),
            TypedValue::Boolean(true)
        );
        assert_matches!(
            infer_literal("@@", span()),
            Err(UriSyntaxError::LiteralTypeMismatch { .. })
        );
    }

    #[test]
    fn test_round_trip_canonical_forms() {
        let cases = [
            ("42", EdmSimpleType::Int32),
            ("42L", EdmSimpleType::Int64),
            ("4.5M", EdmSimpleType::Decimal),
            ("'hello'", EdmSimpleType::String),
            ("true", EdmSimpleType::Boolean),
            ("guid'12345678-abcd-abcd-1234-123456789012'", EdmSimpleType::Guid),
            ("binary'01AB'", EdmSimpleType::Binary),
            ("datetime'2026-08-29T12:30:00'", EdmSimpleType::DateTime),
            ("time'PT12H30M5S'", EdmSimpleType::Time),
        ];

        for (text, ty) in cases {
            let value = parse_literal(text, ty, &Facets::none(), span()).unwrap();
            assert_eq!(format_literal(&value), text, "canonical form for {}", ty);

            let reparsed =
                parse_literal(&format_literal(&value), ty, &Facets::none(), span()).unwrap();
            assert_eq!(reparsed, value, "value round trip for {}", ty);
        }
    }
}
