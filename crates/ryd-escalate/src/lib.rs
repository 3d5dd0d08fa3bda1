//! ryd-escalate
//!
//! The escalation router: maps `(source component, issue)` signals to an
//! action via an ordered first-match rule list.  Delivery (chat, email) is
//! the notification collaborator's job; this crate only decides.
//!
//! An issue is never silently dropped — when no rule matches, the default
//! action is [`EscalationAction::NotifyAdmin`].

use chrono::{DateTime, Utc};
use serde::Serialize;

/// What the router tells the caller to do with an issue.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationAction {
    NotifyAdmin,
    AutoResolve,
    Block,
}

/// One routing rule: matched in order, first match wins.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EscalationRule {
    /// Source component the rule applies to (exact match).
    pub source: String,
    /// Case-insensitive substring the issue text must contain.
    pub condition: String,
    pub action: EscalationAction,
}

impl EscalationRule {
    pub fn new(
        source: impl Into<String>,
        condition: impl Into<String>,
        action: EscalationAction,
    ) -> Self {
        Self {
            source: source.into(),
            condition: condition.into(),
            action,
        }
    }
}

/// The routing outcome handed to the notification collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Escalation {
    pub action: EscalationAction,
    pub message: String,
}

/// One routed issue, kept in the append-only decision log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub ts_utc: DateTime<Utc>,
    pub source: String,
    pub issue: String,
    pub action: EscalationAction,
    /// `false` when no rule matched and the default applied.
    pub rule_matched: bool,
}

/// Ordered-rule escalation router with an append-only decision log.
#[derive(Clone, Debug, PartialEq)]
pub struct EscalationRouter {
    rules: Vec<EscalationRule>,
    decisions: Vec<Decision>,
}

impl Default for EscalationRouter {
    /// Router with the label's standing rules: calculation errors in the
    /// royalty engine notify the admin; split value mismatches from the
    /// consistency checker block.
    fn default() -> Self {
        Self::with_rules(vec![
            EscalationRule::new(
                "royalty-engine",
                "calculation",
                EscalationAction::NotifyAdmin,
            ),
            EscalationRule::new(
                "consistency-checker",
                "value_mismatch",
                EscalationAction::Block,
            ),
            EscalationRule::new(
                "consistency-checker",
                "missing_in_registry",
                EscalationAction::NotifyAdmin,
            ),
        ])
    }
}

impl EscalationRouter {
    pub fn with_rules(rules: Vec<EscalationRule>) -> Self {
        Self {
            rules,
            decisions: Vec::new(),
        }
    }

    /// Route one issue.  First rule whose source matches exactly and whose
    /// condition appears (case-insensitively) in the issue text wins;
    /// otherwise the default is [`EscalationAction::NotifyAdmin`].  Every
    /// call appends to the decision log — nothing is dropped.
    pub fn route(&mut self, source: &str, issue: &str) -> Escalation {
        let issue_lower = issue.to_lowercase();
        let matched = self
            .rules
            .iter()
            .find(|rule| rule.source == source && issue_lower.contains(&rule.condition));

        let (action, rule_matched) = match matched {
            Some(rule) => (rule.action, true),
            None => (EscalationAction::NotifyAdmin, false),
        };

        self.decisions.push(Decision {
            ts_utc: Utc::now(),
            source: source.to_string(),
            issue: truncate(issue, 120),
            action,
            rule_matched,
        });

        let message = if rule_matched {
            format!("Escalation from {source}: {issue}")
        } else {
            format!("Unmatched escalation from {source}: {issue}")
        };

        Escalation { action, message }
    }

    /// The append-only log of routed issues.
    pub fn decisions(&self) -> &[Decision] {
        &self.decisions
    }

    pub fn rules(&self) -> &[EscalationRule] {
        &self.rules
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rules_block_value_mismatch() {
        let mut router = EscalationRouter::default();
        let esc = router.route(
            "consistency-checker",
            "value_mismatch for Nova: engine 0.60 vs registry 0.65",
        );
        assert_eq!(esc.action, EscalationAction::Block);
    }

    #[test]
    fn default_rules_notify_on_calculation_error() {
        let mut router = EscalationRouter::default();
        let esc = router.route("royalty-engine", "calculation failed for 2026-Q2");
        assert_eq!(esc.action, EscalationAction::NotifyAdmin);
    }

    #[test]
    fn condition_match_is_case_insensitive() {
        let mut router = EscalationRouter::default();
        let esc = router.route("consistency-checker", "VALUE_MISMATCH for Juno");
        assert_eq!(esc.action, EscalationAction::Block);
    }

    #[test]
    fn unmatched_issue_defaults_to_notify_admin() {
        let mut router = EscalationRouter::default();
        let esc = router.route("some-other-component", "disk full");
        assert_eq!(esc.action, EscalationAction::NotifyAdmin);
        assert!(esc.message.starts_with("Unmatched escalation"));
    }

    #[test]
    fn source_must_match_exactly() {
        let mut router = EscalationRouter::default();
        // Right condition text, wrong source — falls through to default.
        let esc = router.route("royalty-engine", "value_mismatch noticed");
        assert_eq!(esc.action, EscalationAction::NotifyAdmin);
    }

    #[test]
    fn first_matching_rule_wins() {
        let mut router = EscalationRouter::with_rules(vec![
            EscalationRule::new("a", "x", EscalationAction::AutoResolve),
            EscalationRule::new("a", "x", EscalationAction::Block),
        ]);
        assert_eq!(router.route("a", "x happened").action, EscalationAction::AutoResolve);
    }

    #[test]
    fn every_route_is_logged() {
        let mut router = EscalationRouter::default();
        router.route("royalty-engine", "calculation failed");
        router.route("nobody", "unmatched thing");

        let log = router.decisions();
        assert_eq!(log.len(), 2);
        assert!(log[0].rule_matched);
        assert!(!log[1].rule_matched);
    }

    #[test]
    fn rules_and_decisions_serialize_for_reporting() {
        // Rules are built in code (Default or with_rules) and only ever
        // written out, alongside the decision log, for operator reports.
        let rule = EscalationRule::new("royalty-engine", "calculation", EscalationAction::Block);
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["source"], "royalty-engine");
        assert_eq!(json["action"], "block");

        let mut router = EscalationRouter::default();
        router.route("royalty-engine", "calculation failed");
        let log = serde_json::to_value(router.decisions()).unwrap();
        assert_eq!(log[0]["action"], "notify_admin");
    }

    #[test]
    fn long_issue_text_is_truncated_in_log_but_not_in_message() {
        let mut router = EscalationRouter::default();
        let issue = "x".repeat(500);
        let esc = router.route("nobody", &issue);
        assert_eq!(router.decisions()[0].issue.chars().count(), 120);
        assert!(esc.message.len() > 400);
    }
}
