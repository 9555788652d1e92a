//! `:name` path template substitution.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use crate::ParameterSet;

/// Characters escaped inside a substituted path segment.
///
/// Unreserved characters (`A-Z a-z 0-9 - . _ ~`) and sub-delimiters pass
/// through.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'\\')
    .add(b'%');

const fn is_token_char(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

/// Replace every `:name` token of `template` with the matching parameter.
///
/// A token is `:` followed by the longest run of ASCII alphanumerics and
/// `_`, so `:id` never matches inside `:identifier`. Tokens without a
/// parameter, and a lone `:`, are kept verbatim.
///
/// ```ignore
/// let params: ParameterSet = [("uuid", "c68c5133")].into_iter().collect();
/// assert_eq!(substitute("/booking/detail/:uuid", &params), "/booking/detail/c68c5133");
/// ```
pub(crate) fn substitute(template: &str, params: &ParameterSet) -> String {
    if params.is_empty() {
        return template.to_string();
    }

    let bytes = template.as_bytes();
    let mut out = String::with_capacity(template.len());
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b':' {
            i += 1;
            continue;
        }

        let start = i + 1;
        let end = bytes[start..]
            .iter()
            .position(|&b| !is_token_char(b))
            .map_or(bytes.len(), |offset| start + offset);

        if let Some(value) = params.get(&template[start..end]).filter(|_| end > start) {
            out.push_str(&template[copied..i]);
            out.extend(utf8_percent_encode(value, PATH_SEGMENT));
            copied = end;
        }
        i = end.max(start);
    }

    out.push_str(&template[copied..]);
    out
}
