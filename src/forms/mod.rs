pub mod brands;
pub mod categories;
pub mod coupons;
pub mod offers;
pub mod orders;
pub mod products;
pub mod reports;

/// Collapse whitespace runs and strip control characters from a single-line value.
pub(crate) fn sanitize_inline_text(input: &str) -> String {
    let mut sanitized = String::with_capacity(input.len());
    let mut previous_whitespace = false;

    for ch in input.trim().chars() {
        if ch.is_whitespace() {
            if !previous_whitespace {
                sanitized.push(' ');
                previous_whitespace = true;
            }
        } else if ch.is_control() {
            continue;
        } else {
            sanitized.push(ch);
            previous_whitespace = false;
        }
    }

    sanitized
}

/// Sanitize each line and squeeze consecutive blank lines.
pub(crate) fn sanitize_multiline_text(input: &str) -> String {
    let mut lines: Vec<String> = input.lines().map(sanitize_inline_text).collect();

    while matches!(lines.first(), Some(line) if line.is_empty()) {
        lines.remove(0);
    }

    while matches!(lines.last(), Some(line) if line.is_empty()) {
        lines.pop();
    }

    let mut result = Vec::with_capacity(lines.len());
    let mut previous_empty = false;
    for line in lines {
        if line.is_empty() {
            if previous_empty {
                continue;
            }
            previous_empty = true;
            result.push(String::new());
        } else {
            previous_empty = false;
            result.push(line);
        }
    }

    result.join("\n")
}

/// Sanitized optional description; blank input becomes `None`.
pub(crate) fn sanitize_description(input: Option<&str>) -> Option<String> {
    input
        .map(sanitize_multiline_text)
        .filter(|value| !value.is_empty())
}

/// Parse an optional positive identifier submitted as text.
pub(crate) fn parse_optional_id(value: Option<&str>) -> Result<Option<i32>, String> {
    match value.map(str::trim).filter(|raw| !raw.is_empty()) {
        None => Ok(None),
        Some(raw) => match raw.parse::<i32>() {
            Ok(parsed) if parsed > 0 => Ok(Some(parsed)),
            Ok(_) => Ok(None),
            Err(_) => Err(raw.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiline_text_squeezes_blank_lines() {
        assert_eq!(
            sanitize_multiline_text("\n  first  line \n\n\n second\n\n"),
            "first line\n\nsecond"
        );
    }

    #[test]
    fn optional_id_parsing() {
        assert_eq!(parse_optional_id(None), Ok(None));
        assert_eq!(parse_optional_id(Some("  ")), Ok(None));
        assert_eq!(parse_optional_id(Some(" 7 ")), Ok(Some(7)));
        assert_eq!(parse_optional_id(Some("0")), Ok(None));
        assert_eq!(parse_optional_id(Some("x1")), Err("x1".to_string()));
    }
}
