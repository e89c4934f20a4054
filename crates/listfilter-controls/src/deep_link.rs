//! Consumption side of deep-link state.
//!
//! Parsing the URL into parameters happens elsewhere; controls only look up
//! their value by id and decode it.

use std::collections::HashMap;

use percent_encoding::percent_decode_str;

/// One `key=value` pair restored from a deep link. `value` is still
/// percent-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeepLinkParam {
    pub key: String,
    pub value: String,
}

/// Deep-link parameters keyed by group, in link order.
pub type DeepLinkParams = HashMap<String, Vec<DeepLinkParam>>;

/// Finds the first parameter for `key` within `group` and returns its decoded
/// value. Invalid UTF-8 sequences are replaced rather than rejected.
#[must_use]
pub fn lookup(params: &DeepLinkParams, group: &str, key: &str) -> Option<String> {
    params
        .get(group)?
        .iter()
        .find(|param| param.key == key)
        .map(|param| percent_decode_str(&param.value).decode_utf8_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> DeepLinkParams {
        let mut params = DeepLinkParams::new();
        params.insert(
            "group1".to_string(),
            vec![
                DeepLinkParam {
                    key: "other".to_string(),
                    value: "x".to_string(),
                },
                DeepLinkParam {
                    key: "test-id".to_string(),
                    value: "New%20York%2C%20NY".to_string(),
                },
            ],
        );
        params
    }

    #[test]
    fn lookup_decodes_value() {
        assert_eq!(
            lookup(&params(), "group1", "test-id").as_deref(),
            Some("New York, NY")
        );
    }

    #[test]
    fn lookup_misses_unknown_group_or_key() {
        assert!(lookup(&params(), "group2", "test-id").is_none());
        assert!(lookup(&params(), "group1", "missing").is_none());
    }

    #[test]
    fn lookup_tolerates_invalid_utf8() {
        let mut params = DeepLinkParams::new();
        params.insert(
            "g".to_string(),
            vec![DeepLinkParam {
                key: "k".to_string(),
                value: "caf%FF".to_string(),
            }],
        );
        let decoded = lookup(&params, "g", "k").expect("present");
        assert!(decoded.starts_with("caf"));
    }
}
