use super::{Finding, Rule};
use crate::source::Source;
use lesshint_stream::Severity;

const MESSAGE: &str = "Colon after property name should be followed by one space.";

/// `color: red` rather than `color:red` or `color:  red`.
pub struct SpaceAfterPropertyColon;

impl Rule for SpaceAfterPropertyColon {
    fn name(&self) -> &'static str {
        "spaceAfterPropertyColon"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, source: &Source<'_>) -> Vec<Finding> {
        let mut out = Vec::new();
        // Statements ending in `{` are selectors or at-rule preludes.
        for statement in source.statements().iter().filter(|s| s.terminator != Some(b'{')) {
            let text = source.text(statement);
            let Some(colon) = text.iter().position(|&b| b == b':') else {
                continue;
            };
            if !is_property_name(trim(&text[..colon])) {
                continue;
            }
            let value = &text[colon + 1..];
            if value.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            let single_space =
                value[0] == b' ' && value.get(1).is_some_and(|b| !b.is_ascii_whitespace());
            if !single_space {
                out.push(Finding::new(statement.start + colon, MESSAGE));
            }
        }
        out
    }
}

fn trim(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|b| !b.is_ascii_whitespace()).unwrap_or(bytes.len());
    let end = bytes.iter().rposition(|b| !b.is_ascii_whitespace()).map_or(start, |i| i + 1);
    &bytes[start..end]
}

/// Plain properties, variables (`@x`) and the `*zoom` hack.
fn is_property_name(name: &[u8]) -> bool {
    match name.first() {
        None => false,
        Some(first) if first.is_ascii_digit() => false,
        Some(_) => name
            .iter()
            .all(|&b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'@' | b'*' | b'$')),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::findings;

    #[test]
    fn test_missing_space_after_colon() {
        assert_eq!(findings(&SpaceAfterPropertyColon, ".foo {color:red;}"), vec![(1, 12)]);
        assert_eq!(findings(&SpaceAfterPropertyColon, ".foo {\n  color:  red\n}"), vec![(2, 8)]);
    }

    #[test]
    fn test_selectors_and_calls_are_not_declarations() {
        let raw = "a:hover, b:focus {\n  &:extend(.c all);\n  .mixin(@a:1);\n  color: red;\n}";
        assert!(findings(&SpaceAfterPropertyColon, raw).is_empty());
    }

    #[test]
    fn test_variables_are_declarations() {
        assert_eq!(findings(&SpaceAfterPropertyColon, "@color:red;"), vec![(1, 7)]);
    }

    #[test]
    fn test_colons_inside_strings_are_ignored() {
        assert!(findings(&SpaceAfterPropertyColon, ".a { content: \"a:b\"; }").is_empty());
    }
}
