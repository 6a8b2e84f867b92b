use std::cmp::Ordering;

/// A problem code broken into its comparable parts.
///
/// Codes come in shapes like `9A`, `148B`, `CF-148A` or `ICPC-WF-2020`:
/// an optional judge prefix, a contest number, and a letter suffix for the
/// problem index. Sorting compares (prefix, number, suffix) so that `9A`
/// lands before `10A`, which plain string order gets wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemCode {
    pub prefix: String,
    pub number: u64,
    pub suffix: String,
    pub original: String,
}

impl ProblemCode {
    /// Parse a code into (prefix, number, suffix).
    ///
    /// The prefix is the longest leading run of letters and hyphens that is
    /// followed by a hyphen and a non-empty rest, so `ICPC-WF-2020` keeps
    /// `ICPC-WF` together. The rest must be digits followed by an optional
    /// letter suffix; anything else parses with number 0 so it still sorts
    /// deterministically by its prefix. Comparison is case-insensitive.
    pub fn parse(code: &str) -> Self {
        let trimmed = code.trim();

        let (prefix, rest) = match split_prefix(trimmed) {
            Some((prefix, rest)) => (prefix, rest),
            None => ("", trimmed),
        };

        let (number, suffix) = split_number_suffix(rest).unwrap_or((0, ""));

        Self {
            prefix: prefix.to_ascii_uppercase(),
            number,
            suffix: suffix.to_ascii_uppercase(),
            original: code.to_string(),
        }
    }

    fn sort_key(&self) -> (&str, u64, &str) {
        (&self.prefix, self.number, &self.suffix)
    }
}

impl Ord for ProblemCode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for ProblemCode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Split `PREFIX-REST` where PREFIX is letters/hyphens and REST is non-empty.
/// The split point is the last hyphen inside the leading letter/hyphen run,
/// which keeps multi-part prefixes such as `ICPC-WF` intact.
fn split_prefix(code: &str) -> Option<(&str, &str)> {
    let bytes = code.as_bytes();
    let run_len = bytes
        .iter()
        .take_while(|b| b.is_ascii_alphabetic() || **b == b'-')
        .count();

    let split_at = bytes[..run_len]
        .iter()
        .rposition(|b| *b == b'-')
        .filter(|i| *i >= 1 && i + 1 < code.len())?;

    Some((&code[..split_at], &code[split_at + 1..]))
}

/// Split `DIGITS` + optional all-letter suffix, e.g. "148A" -> (148, "A").
fn split_number_suffix(rest: &str) -> Option<(u64, &str)> {
    let digits_len = rest
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits_len == 0 {
        return None;
    }

    let (digits, suffix) = rest.split_at(digits_len);
    if !suffix.bytes().all(|b| b.is_ascii_alphabetic()) {
        return None;
    }

    let number = digits.parse().ok()?;
    Some((number, suffix))
}

/// Sort problem codes in display order: by prefix, then contest number,
/// then problem letter.
pub fn sort_problem_codes(mut codes: Vec<String>) -> Vec<String> {
    codes.sort_by_cached_key(|code| {
        let parsed = ProblemCode::parse(code);
        (parsed.prefix, parsed.number, parsed.suffix)
    });
    codes
}
