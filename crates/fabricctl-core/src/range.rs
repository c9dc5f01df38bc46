// ── Range notation ──
//
// Grammar: TOKEN (',' TOKEN)*, TOKEN = INT | INT '-' INT with low <= high.
// Used for trunk allowed-VLAN lists and, with a textual prefix, for vPC
// member interface lists such as `Ethernet1/1-5,Ethernet1/10`.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use indexmap::IndexSet;
use thiserror::Error;

/// A malformed range token. The offending token is echoed verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid range token '{token}': {reason}")]
pub struct RangeParseError {
    pub token: String,
    pub reason: String,
}

impl RangeParseError {
    fn new(token: &str, reason: impl Into<String>) -> Self {
        Self {
            token: token.to_owned(),
            reason: reason.into(),
        }
    }
}

/// A sorted, deduplicated set of integers parsed from range notation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeSet(BTreeSet<u16>);

impl RangeSet {
    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.0.iter().copied()
    }

    pub fn contains(&self, value: u16) -> bool {
        self.0.contains(&value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<u16> for RangeSet {
    fn from_iter<I: IntoIterator<Item = u16>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl FromStr for RangeSet {
    type Err = RangeParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if input.trim().is_empty() {
            return Ok(Self::default());
        }
        let mut values = BTreeSet::new();
        for raw in input.split(',') {
            let (low, high) = parse_token(raw.trim())?;
            values.extend(low..=high);
        }
        Ok(Self(values))
    }
}

/// Canonical form: ascending, runs of consecutive values collapsed to `a-b`.
impl fmt::Display for RangeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        let mut iter = self.0.iter().copied().peekable();
        while let Some(start) = iter.next() {
            let mut end = start;
            loop {
                match end.checked_add(1) {
                    Some(next) if iter.peek() == Some(&next) => {
                        end = next;
                        iter.next();
                    }
                    _ => break,
                }
            }
            if start == end {
                parts.push(start.to_string());
            } else {
                parts.push(format!("{start}-{end}"));
            }
        }
        f.write_str(&parts.join(","))
    }
}

/// Parse one `INT` or `INT-INT` token into an inclusive bound pair.
fn parse_token(token: &str) -> Result<(u16, u16), RangeParseError> {
    if token.is_empty() {
        return Err(RangeParseError::new(token, "empty token"));
    }
    let (low, high) = match token.split_once('-') {
        Some((low, high)) => (parse_bound(token, low)?, parse_bound(token, high)?),
        None => {
            let value = parse_bound(token, token)?;
            (value, value)
        }
    };
    if low > high {
        return Err(RangeParseError::new(
            token,
            format!("range start {low} is greater than end {high}"),
        ));
    }
    Ok((low, high))
}

fn parse_bound(token: &str, part: &str) -> Result<u16, RangeParseError> {
    let part = part.trim();
    if part.is_empty() {
        return Err(RangeParseError::new(token, "missing range bound"));
    }
    if !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RangeParseError::new(token, "not a non-negative integer"));
    }
    part.parse::<u16>()
        .map_err(|e| RangeParseError::new(token, e.to_string()))
}

/// Expand a prefixed interface list (`Ethernet1/1-3,Ethernet1/10`) into
/// individual interface names, keeping first-seen order.
pub fn expand_interfaces(input: &str) -> Result<Vec<String>, RangeParseError> {
    let mut names: IndexSet<String> = IndexSet::new();
    for raw in input.split(',') {
        let token = raw.trim();
        if token.is_empty() {
            if input.trim().is_empty() {
                break;
            }
            return Err(RangeParseError::new(token, "empty token"));
        }
        let split_at = token
            .char_indices()
            .rev()
            .take_while(|(_, c)| c.is_ascii_digit() || *c == '-')
            .last()
            .map_or(token.len(), |(i, _)| i);
        let (prefix, numeric) = token.split_at(split_at);
        if prefix.is_empty() {
            return Err(RangeParseError::new(token, "missing interface prefix"));
        }
        if numeric.is_empty() {
            return Err(RangeParseError::new(token, "missing interface number"));
        }
        let (low, high) = parse_token(numeric).map_err(|e| RangeParseError::new(token, e.reason))?;
        names.extend((low..=high).map(|n| format!("{prefix}{n}")));
    }
    Ok(names.into_iter().collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(s: &str) -> Result<RangeSet, RangeParseError> {
        s.parse()
    }

    #[test]
    fn parses_singles_lists_and_ranges() {
        let set = parse("100,200,300-305").unwrap();
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![100, 200, 300, 301, 302, 303, 304, 305]
        );
    }

    #[test]
    fn canonical_form_reparses_to_same_set() {
        let set = parse("305, 100,300-304,100 ,200").unwrap();
        let canonical = set.to_string();
        assert_eq!(canonical, "100,200,300-305");
        assert_eq!(parse(&canonical).unwrap(), set);
    }

    #[test]
    fn single_element_range_is_allowed() {
        assert_eq!(parse("7-7").unwrap().to_string(), "7");
    }

    #[test]
    fn empty_input_is_empty_set() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("   ").unwrap().is_empty());
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = parse("300-100").unwrap_err();
        assert_eq!(err.token, "300-100");
    }

    #[test]
    fn non_numeric_is_rejected() {
        assert_eq!(parse("abc").unwrap_err().token, "abc");
        assert_eq!(parse("100,1o1").unwrap_err().token, "1o1");
    }

    #[test]
    fn negative_and_dangling_bounds_are_rejected() {
        assert_eq!(parse("-5").unwrap_err().token, "-5");
        assert_eq!(parse("5-").unwrap_err().token, "5-");
        assert_eq!(parse("1-2-3").unwrap_err().token, "1-2-3");
    }

    #[test]
    fn out_of_range_value_is_rejected() {
        assert_eq!(parse("70000").unwrap_err().token, "70000");
    }

    #[test]
    fn empty_token_inside_list_is_rejected() {
        assert!(parse("100,,200").is_err());
    }

    #[test]
    fn expands_prefixed_interface_ranges() {
        let names = expand_interfaces("Ethernet1/1-3, Ethernet1/10").unwrap();
        assert_eq!(
            names,
            vec!["Ethernet1/1", "Ethernet1/2", "Ethernet1/3", "Ethernet1/10"]
        );
    }

    #[test]
    fn interface_range_validates_numeric_suffix() {
        let err = expand_interfaces("Ethernet1/5-1").unwrap_err();
        assert_eq!(err.token, "Ethernet1/5-1");
        assert!(expand_interfaces("1-5").is_err());
        assert!(expand_interfaces("Ethernet").is_err());
    }

    #[test]
    fn overlapping_interface_ranges_keep_first_seen_order() {
        let names = expand_interfaces("Ethernet1/3-4,Ethernet1/1-4,Ethernet1/3").unwrap();
        assert_eq!(
            names,
            vec!["Ethernet1/3", "Ethernet1/4", "Ethernet1/1", "Ethernet1/2"]
        );
    }

    #[test]
    fn wide_interface_range_expands_without_duplicates() {
        let names = expand_interfaces("Ethernet1/1-60000,Ethernet1/1-60000").unwrap();
        assert_eq!(names.len(), 60000);
        assert_eq!(names.last().map(String::as_str), Some("Ethernet1/60000"));
    }
}
