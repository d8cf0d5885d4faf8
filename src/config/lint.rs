//! Non-fatal checks over a normalized rule list.

use super::errors::{ValidationWarning, WarningCode};
use super::rules::{Action, CanonicalRule, Validator};

/// Collect warnings for `rules`. Never blocks settings.
pub fn lint(rules: &[CanonicalRule]) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    for (index, rule) in rules.iter().enumerate() {
        if rule.triggers().next().is_none() {
            warnings.push(ValidationWarning::new(
                WarningCode::EmptyTrigger,
                format!("rule {} has an empty `when`", index),
            ));
        }

        for validator in &rule.validate {
            if let Validator::Other { kind, .. } = validator {
                warnings.push(ValidationWarning::new(
                    WarningCode::UnknownValidator,
                    format!("rule {}: unknown validator `{}`", index, kind),
                ));
            }

            let Some(check) = validator.pattern_check() else {
                continue;
            };
            for pattern in check.regexes() {
                if let Err(e) = pattern.compile() {
                    warnings.push(ValidationWarning::new(
                        WarningCode::InvalidRegex,
                        format!("rule {}: invalid regex '{}': {}", index, pattern.regex, e),
                    ));
                }
            }
        }

        let actions = rule.pass.iter().chain(&rule.fail).chain(&rule.error);
        for action in actions {
            if let Action::Other { kind, .. } = action {
                warnings.push(ValidationWarning::new(
                    WarningCode::UnknownAction,
                    format!("rule {}: unknown action `{}`", index, kind),
                ));
            }
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::rules::PatternCheck;

    #[test]
    fn test_clean_rules_have_no_warnings() {
        let mut rule = CanonicalRule::new("pull_request.*");
        rule.validate.push(Validator::Title(PatternCheck::excluding("wip|dnm")));
        rule.pass.push(Action::comment("ok"));

        assert!(lint(&[rule]).is_empty());
    }

    #[test]
    fn test_invalid_regex_is_flagged() {
        let mut rule = CanonicalRule::new("issues.*");
        rule.validate.push(Validator::Label(PatternCheck::excluding("(unclosed")));

        let warnings = lint(&[rule]);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, WarningCode::InvalidRegex);
        assert!(warnings[0].message.contains("(unclosed"));
    }

    #[test]
    fn test_blank_trigger_is_flagged() {
        let warnings = lint(&[CanonicalRule::new(" , ")]);
        assert_eq!(warnings[0].code, WarningCode::EmptyTrigger);
    }

    #[test]
    fn test_unknown_kinds_are_flagged() {
        let rules: Vec<CanonicalRule> = serde_yaml::from_str(
            "- when: issues.*\n  validate:\n  - do: size\n  fail:\n  - do: request_review\n",
        )
        .unwrap();

        let codes: Vec<WarningCode> = lint(&rules).iter().map(|w| w.code).collect();
        assert_eq!(
            codes,
            vec![WarningCode::UnknownValidator, WarningCode::UnknownAction]
        );
    }
}
