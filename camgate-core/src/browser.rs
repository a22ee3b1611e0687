//! Browser families that need a specific reload affordance
//!
//! Some browsers only re-prompt for the camera when the user clicks their own
//! site-permission button. The table maps a named family, recognised from the
//! platform's identifying string, to the [`ButtonKind`] to present. New quirks
//! are added as rules, not as code.

use crate::outcome::ButtonKind;
use serde::{Deserialize, Serialize};

/// One browser family recognised by user-agent tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserFamilyRule {
    /// Family name, e.g. `firefox_desktop`
    pub name: String,
    /// Tokens that must all appear (case-insensitive)
    pub required: Vec<String>,
    /// Tokens of which none may appear (case-insensitive)
    pub excluded: Vec<String>,
    /// Affordance this family needs
    pub button_kind: ButtonKind,
}

impl BrowserFamilyRule {
    /// Create a rule from token lists
    pub fn new(
        name: impl Into<String>,
        required: &[&str],
        excluded: &[&str],
        button_kind: ButtonKind,
    ) -> Self {
        Self {
            name: name.into(),
            required: required.iter().map(|t| t.to_lowercase()).collect(),
            excluded: excluded.iter().map(|t| t.to_lowercase()).collect(),
            button_kind,
        }
    }

    /// Desktop Firefox: re-prompting requires the browser's own button
    pub fn firefox_desktop() -> Self {
        Self::new(
            "firefox_desktop",
            &["firefox"],
            &["mobile", "tablet", "android"],
            ButtonKind::BrowserButton,
        )
    }

    /// Whether the user agent belongs to this family
    pub fn matches(&self, user_agent: &str) -> bool {
        let user_agent = user_agent.to_lowercase();
        self.required
            .iter()
            .all(|token| user_agent.contains(token.as_str()))
            && !self
                .excluded
                .iter()
                .any(|token| user_agent.contains(token.as_str()))
    }
}

/// Result of looking a user agent up in the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadButtonResolution {
    /// Matched family, `None` when no rule matched
    pub family: Option<String>,
    /// Affordance to present
    pub button_kind: ButtonKind,
}

/// Ordered table of browser family rules; first match wins
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserFamilyTable {
    rules: Vec<BrowserFamilyRule>,
}

impl Default for BrowserFamilyTable {
    fn default() -> Self {
        Self {
            rules: vec![BrowserFamilyRule::firefox_desktop()],
        }
    }
}

impl BrowserFamilyTable {
    /// Table without any rules; every browser resolves to [`ButtonKind::AnyButton`]
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule
    pub fn with_rule(mut self, rule: BrowserFamilyRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Configured rules in match order
    pub fn rules(&self) -> &[BrowserFamilyRule] {
        &self.rules
    }

    /// Resolve the reload affordance for a user agent
    pub fn resolve(&self, user_agent: &str) -> ReloadButtonResolution {
        match self.rules.iter().find(|rule| rule.matches(user_agent)) {
            Some(rule) => ReloadButtonResolution {
                family: Some(rule.name.clone()),
                button_kind: rule.button_kind,
            },
            None => ReloadButtonResolution {
                family: None,
                button_kind: ButtonKind::AnyButton,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIREFOX_DESKTOP: &str =
        "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";
    const FIREFOX_ANDROID: &str =
        "Mozilla/5.0 (Android 14; Mobile; rv:128.0) Gecko/128.0 Firefox/128.0";
    const CHROME_DESKTOP: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

    #[test]
    fn test_firefox_desktop_needs_browser_button() {
        let table = BrowserFamilyTable::default();
        let resolution = table.resolve(FIREFOX_DESKTOP);
        assert_eq!(resolution.family.as_deref(), Some("firefox_desktop"));
        assert_eq!(resolution.button_kind, ButtonKind::BrowserButton);
    }

    #[test]
    fn test_mobile_firefox_and_chrome_fall_back() {
        let table = BrowserFamilyTable::default();
        for ua in [FIREFOX_ANDROID, CHROME_DESKTOP, ""] {
            let resolution = table.resolve(ua);
            assert_eq!(resolution.family, None, "unexpected match for {ua:?}");
            assert_eq!(resolution.button_kind, ButtonKind::AnyButton);
        }
    }

    #[test]
    fn test_additional_rules_are_data() {
        let table = BrowserFamilyTable::empty().with_rule(BrowserFamilyRule::new(
            "safari_ios",
            &["iphone", "safari"],
            &["crios", "fxios"],
            ButtonKind::BrowserButton,
        ));
        let ua = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_5 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Mobile/15E148 Safari/604.1";
        assert_eq!(table.resolve(ua).button_kind, ButtonKind::BrowserButton);
        assert_eq!(
            table.resolve(FIREFOX_DESKTOP).button_kind,
            ButtonKind::AnyButton
        );
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let rule = BrowserFamilyRule::firefox_desktop();
        assert!(rule.matches("FIREFOX/128.0"));
        assert!(!rule.matches("Firefox/128.0 TABLET"));
    }
}
