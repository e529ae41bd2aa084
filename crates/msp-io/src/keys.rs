//! Tuple-key parsing for the wire format's stringified-tuple indexed maps.
//!
//! JSON object keys are always strings, so multi-dimensional parameters are
//! encoded as the textual representation of a tuple, e.g.
//! `"('plastic', 'extrude', 'filament')"`. This module turns that text back
//! into structured components without ever panicking on malformed input —
//! every failure mode returns an `Err` describing the raw key so the caller
//! can attach it to a diagnostic.

/// One parsed component of a tuple key: either a quoted/bareword string or
/// a digit sequence coerced to an integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyComponent {
    Str(String),
    Int(i64),
}

impl KeyComponent {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            KeyComponent::Str(s) => Some(s),
            KeyComponent::Int(_) => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            KeyComponent::Int(n) => Some(*n),
            KeyComponent::Str(s) => s.parse::<i64>().ok(),
        }
    }
}

/// Parse a tuple-key string of the form `"(a, b[, c])"` into its components.
///
/// Each component is unquoted if quoted, otherwise coerced to an integer if
/// it is a (possibly negative) digit sequence, otherwise kept as a bareword
/// string. A trailing comma before the closing paren (as in Python's
/// single-element tuple repr `"('x',)"`) is tolerated.
pub fn parse_tuple_key(raw: &str) -> Result<Vec<KeyComponent>, String> {
    let trimmed = raw.trim();
    let inner = trimmed
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| format!("malformed tuple key (missing parens): {raw:?}"))?;

    let mut parts: Vec<&str> = inner.split(',').map(str::trim).collect();
    if parts.last().map(|s| s.is_empty()).unwrap_or(false) {
        parts.pop();
    }
    if parts.is_empty() {
        return Err(format!("malformed tuple key (empty): {raw:?}"));
    }

    parts.into_iter().map(parse_component).collect()
}

fn parse_component(part: &str) -> Result<KeyComponent, String> {
    if part.len() >= 2 {
        let bytes = part.as_bytes();
        let first = bytes[0] as char;
        let last = bytes[bytes.len() - 1] as char;
        if (first == '\'' && last == '\'') || (first == '"' && last == '"') {
            return Ok(KeyComponent::Str(part[1..part.len() - 1].to_string()));
        }
    }

    let digits = part.strip_prefix('-').unwrap_or(part);
    if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
        part.parse::<i64>()
            .map(KeyComponent::Int)
            .map_err(|e| format!("digit-looking key component {part:?} failed to parse: {e}"))
    } else {
        Ok(KeyComponent::Str(part.to_string()))
    }
}

/// Parse a scalar week key (`crew_available`/`energy_available`): a bare
/// digit string is coerced to an integer, anything else is rejected.
pub fn parse_scalar_week_key(raw: &str) -> Result<i64, String> {
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!("week key is not an integer: {raw:?}"));
    }
    raw.parse::<i64>()
        .map_err(|e| format!("week key {raw:?} failed to parse: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tuple_key_three_strings() {
        let parsed = parse_tuple_key("('plastic', 'extrude', 'filament')").unwrap();
        assert_eq!(
            parsed,
            vec![
                KeyComponent::Str("plastic".into()),
                KeyComponent::Str("extrude".into()),
                KeyComponent::Str("filament".into()),
            ]
        );
    }

    #[test]
    fn test_parse_tuple_key_string_and_int() {
        let parsed = parse_tuple_key("('spare_part', 2)").unwrap();
        assert_eq!(
            parsed,
            vec![KeyComponent::Str("spare_part".into()), KeyComponent::Int(2)]
        );
    }

    #[test]
    fn test_parse_tuple_key_trailing_comma() {
        let parsed = parse_tuple_key("('spare_part',)").unwrap();
        assert_eq!(parsed, vec![KeyComponent::Str("spare_part".into())]);
    }

    #[test]
    fn test_parse_tuple_key_double_quotes() {
        let parsed = parse_tuple_key("(\"extrude\", 1)").unwrap();
        assert_eq!(
            parsed,
            vec![KeyComponent::Str("extrude".into()), KeyComponent::Int(1)]
        );
    }

    #[test]
    fn test_parse_tuple_key_bareword() {
        let parsed = parse_tuple_key("(extrude, 1)").unwrap();
        assert_eq!(
            parsed,
            vec![KeyComponent::Str("extrude".into()), KeyComponent::Int(1)]
        );
    }

    #[test]
    fn test_parse_tuple_key_negative_int() {
        let parsed = parse_tuple_key("('spare_part', -1)").unwrap();
        assert_eq!(
            parsed,
            vec![KeyComponent::Str("spare_part".into()), KeyComponent::Int(-1)]
        );
    }

    #[test]
    fn test_parse_tuple_key_malformed_missing_parens() {
        assert!(parse_tuple_key("spare_part, 2").is_err());
    }

    #[test]
    fn test_parse_scalar_week_key() {
        assert_eq!(parse_scalar_week_key("3").unwrap(), 3);
        assert!(parse_scalar_week_key("week3").is_err());
    }
}
