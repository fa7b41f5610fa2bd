//! Balanced-delimiter scanning.
//!
//! Finds the first complete `{...}` or `[...]` region in free text by
//! tracking nesting depth, so prose before and after (including stray
//! punctuation and markdown fences) does not confuse the match. Brackets
//! inside quoted strings are ignored.
//!
//! Single-quoted strings follow the same rules the sanitizer uses: a `'`
//! opens a string only where a value or key may start, and closes it only
//! before `,` `:` `}` `]` or the end of text, so apostrophes inside the
//! text (`'the learner's answer'`) do not unbalance the region.

/// Upper bound on candidate regions examined per text
pub const MAX_CANDIDATE_REGIONS: usize = 64;

/// Upper bound on openers tried per text; unclosed openers scan to the end
pub const MAX_CANDIDATE_OPENERS: usize = MAX_CANDIDATE_REGIONS * 4;

/// Locate the first balanced bracketed region in `text`.
///
/// Openers are tried left to right; an opener whose region never closes
/// (truncated output) or closes with the wrong delimiter is skipped.
pub fn find_bracketed_region(text: &str) -> Option<&str> {
    bracketed_regions(text).next()
}

/// Every balanced region in `text`, ordered by the position of its opener.
///
/// Regions may nest: the outer region is yielded before the regions inside it.
pub fn bracketed_regions(text: &str) -> impl Iterator<Item = &str> {
    text.char_indices()
        .filter(|(_, c)| matches!(c, '{' | '['))
        .take(MAX_CANDIDATE_OPENERS)
        .filter_map(|(start, _)| balanced_end(&text[start..]).map(|end| &text[start..start + end]))
        .take(MAX_CANDIDATE_REGIONS)
}

/// Byte length of the balanced region at the start of `text`.
fn balanced_end(text: &str) -> Option<usize> {
    let mut closers: Vec<char> = Vec::new();
    let mut quote: Option<char> = None;
    let mut escape_next = false;
    let mut last_significant: Option<char> = None;

    for (i, ch) in text.char_indices() {
        if let Some(q) = quote {
            if escape_next {
                escape_next = false;
            } else if ch == '\\' {
                escape_next = true;
            } else if ch == q && (q == '"' || closes_single_quoted(&text[i + 1..])) {
                quote = None;
                last_significant = Some(ch);
            }
            continue;
        }

        match ch {
            '"' => quote = Some(ch),
            '\'' if matches!(last_significant, Some('{' | '[' | ',' | ':')) => quote = Some(ch),
            '{' => closers.push('}'),
            '[' => closers.push(']'),
            '}' | ']' => {
                if closers.pop() != Some(ch) {
                    return None;
                }
                if closers.is_empty() {
                    return Some(i + ch.len_utf8());
                }
            }
            _ => {}
        }
        if !ch.is_whitespace() {
            last_significant = Some(ch);
        }
    }

    None
}

fn closes_single_quoted(rest: &str) -> bool {
    matches!(
        rest.chars().find(|c| !c.is_whitespace()),
        None | Some(',' | '}' | ']' | ':')
    )
}
