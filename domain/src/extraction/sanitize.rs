//! Normalization of almost-JSON model output.
//!
//! A single pass over the bracketed region that repairs the defects models
//! most often produce:
//!
//! - whitespace and raw newlines collapsed to single spaces
//! - single-quoted strings rewritten as double-quoted strings
//! - bare identifier keys quoted (`{score: 5}` → `{"score": 5}`)
//! - trailing commas before `}` / `]` dropped
//! - `True` / `False` / `None` mapped to JSON literals
//!
//! The output is not guaranteed to be valid JSON; the caller still parses it.

/// Sanitize a bracketed region so it has a better chance to parse as JSON.
pub fn sanitize(region: &str) -> String {
    let chars: Vec<char> = region.chars().collect();
    let mut out = String::with_capacity(region.len() + 16);
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        match ch {
            '"' => i = copy_double_quoted(&chars, i, &mut out),
            '\'' => i = convert_single_quoted(&chars, i, &mut out),
            c if c.is_whitespace() => {
                push_collapsed_space(&mut out);
                i += 1;
            }
            ',' => {
                if !matches!(next_significant(&chars, i + 1), Some('}' | ']')) {
                    out.push(',');
                }
                i += 1;
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                let is_key = next_significant(&chars, i) == Some(':')
                    && matches!(last_significant(&out), Some('{' | ','));
                if is_key {
                    out.push('"');
                    out.push_str(&word);
                    out.push('"');
                } else {
                    out.push_str(match word.as_str() {
                        "True" => "true",
                        "False" => "false",
                        "None" => "null",
                        other => other,
                    });
                }
            }
            c => {
                out.push(c);
                i += 1;
            }
        }
    }

    out.trim().to_string()
}

/// Copy a double-quoted string verbatim, collapsing raw whitespace.
/// Returns the index just past the closing quote.
fn copy_double_quoted(chars: &[char], start: usize, out: &mut String) -> usize {
    out.push('"');
    let mut escape_next = false;
    let mut i = start + 1;

    while i < chars.len() {
        let ch = chars[i];
        i += 1;
        if escape_next {
            escape_next = false;
            out.push(ch);
        } else if ch == '\\' {
            escape_next = true;
            out.push(ch);
        } else if ch == '"' {
            out.push('"');
            return i;
        } else if ch.is_whitespace() {
            push_collapsed_space(out);
        } else {
            out.push(ch);
        }
    }

    i
}

/// Rewrite a single-quoted string as a double-quoted one.
///
/// A `'` only closes the string when followed by a structural character
/// (or the end), so apostrophes inside prose survive.
fn convert_single_quoted(chars: &[char], start: usize, out: &mut String) -> usize {
    out.push('"');
    let mut i = start + 1;

    while i < chars.len() {
        let ch = chars[i];
        match ch {
            '\\' if i + 1 < chars.len() => {
                let next = chars[i + 1];
                if next == '\'' {
                    out.push('\'');
                } else {
                    out.push('\\');
                    out.push(next);
                }
                i += 2;
                continue;
            }
            '"' => out.push_str("\\\""),
            '\'' if closes_string(chars, i + 1) => {
                out.push('"');
                return i + 1;
            }
            c if c.is_whitespace() => push_collapsed_space(out),
            c => out.push(c),
        }
        i += 1;
    }

    i
}

fn closes_string(chars: &[char], from: usize) -> bool {
    matches!(
        next_significant(chars, from),
        None | Some(',' | '}' | ']' | ':')
    )
}

fn push_collapsed_space(out: &mut String) {
    if !out.is_empty() && !out.ends_with(' ') {
        out.push(' ');
    }
}

fn next_significant(chars: &[char], from: usize) -> Option<char> {
    chars.iter().skip(from).copied().find(|c| !c.is_whitespace())
}

fn last_significant(out: &str) -> Option<char> {
    out.trim_end().chars().last()
}
