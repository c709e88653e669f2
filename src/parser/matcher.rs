//! Label matcher: decodes parameters from column names.
//!
//! Example: the pattern `^verify_(\d+)_(\d+)_wall_avg$` turns the label
//! `verify_3_10_wall_avg` into the key `(3, 10)`.

use super::schema::{Key, KeyPart};
use crate::utils::error::ConfigError;
use log::debug;
use regex::Regex;

/// Compiled label pattern
#[derive(Debug, Clone)]
pub struct LabelMatcher {
    regex: Regex,
}

/// A header column that matched, with its decoded key
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedColumn {
    pub index: usize,
    pub label: String,
    pub key: Key,
}

impl LabelMatcher {
    /// Compile a pattern; it must carry at least one capture group
    ///
    /// `family` is only used to label errors.
    pub fn new(family: &str, pattern: &str) -> Result<Self, ConfigError> {
        let regex = Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
            family: family.to_string(),
            source,
        })?;

        // captures_len counts the implicit whole-match group
        if regex.captures_len() < 2 {
            return Err(ConfigError::NoCaptureGroups(family.to_string()));
        }

        Ok(Self { regex })
    }

    /// Number of capture groups (key width)
    pub fn groups(&self) -> usize {
        self.regex.captures_len() - 1
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Decode a label into a key, or `None` if it does not match
    ///
    /// Optional groups that did not participate decode as empty text.
    pub fn decode(&self, label: &str) -> Option<Key> {
        let caps = self.regex.captures(label)?;
        let parts = caps
            .iter()
            .skip(1)
            .map(|m| KeyPart::parse(m.map(|m| m.as_str()).unwrap_or("")))
            .collect();
        Some(Key::new(parts))
    }

    /// Every matching header in header order
    pub fn matching_columns(&self, headers: &[String]) -> Vec<MatchedColumn> {
        let matched: Vec<MatchedColumn> = headers
            .iter()
            .enumerate()
            .filter_map(|(index, label)| {
                self.decode(label).map(|key| MatchedColumn {
                    index,
                    label: label.clone(),
                    key,
                })
            })
            .collect();

        debug!(
            "Pattern '{}' matched {} of {} columns",
            self.regex.as_str(),
            matched.len(),
            headers.len()
        );

        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_decode_integers() {
        let m = LabelMatcher::new("verify", r"^verify_(\d+)_(\d+)_wall_avg$").unwrap();
        let key = m.decode("verify_3_10_wall_avg").unwrap();
        assert_eq!(key.parts(), &[KeyPart::Int(3), KeyPart::Int(10)]);
        assert!(m.decode("verify_local_3_10_wall_avg").is_none());
        assert_eq!(m.groups(), 2);
    }

    #[test]
    fn test_decode_text_part() {
        let m = LabelMatcher::new("phase", r"^lottery_([a-z]+)_wall_avg$").unwrap();
        let key = m.decode("lottery_exec_wall_avg").unwrap();
        assert_eq!(key.parts(), &[KeyPart::Text("exec".to_string())]);
    }

    #[test]
    fn test_unanchored_pattern_searches() {
        let m = LabelMatcher::new("p", r"p(\d+)_vote").unwrap();
        assert!(m.decode("run_p4_vote_wall_avg").is_some());
    }

    #[test]
    fn test_matching_columns_keeps_header_order() {
        let m = LabelMatcher::new("verify", r"^verify_(\d+)_(\d+)_wall_avg$").unwrap();
        let hs = headers(&["round", "verify_3_10_wall_avg", "other", "verify_3_2_wall_avg"]);
        let matched = m.matching_columns(&hs);
        assert_eq!(matched.len(), 2);
        assert_eq!(matched[0].index, 1);
        assert_eq!(matched[1].index, 3);
        assert_eq!(matched[1].label, "verify_3_2_wall_avg");
    }

    #[test]
    fn test_pattern_without_groups_rejected() {
        let result = LabelMatcher::new("flat", r"^verify_wall_avg$");
        assert!(matches!(result, Err(ConfigError::NoCaptureGroups(_))));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let result = LabelMatcher::new("broken", r"verify_(\d+");
        assert!(matches!(result, Err(ConfigError::InvalidPattern { .. })));
    }
}
