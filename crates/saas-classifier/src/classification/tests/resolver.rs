use super::common::*;
use crate::classification::resolver::{explain, resolve, EvaluationContext, Verdict, VerdictSource};
use crate::classification::rules::{ProductivityLevel, Rule, RuleSet};
use crate::classification::scope::ScopeKind;

use ProductivityLevel::{Neutral, NonProductive, Productive};

#[test]
fn empty_rule_set_is_unclassified() {
    let verdict = resolve(&RuleSet::empty(), &EvaluationContext::organization());
    assert_eq!(verdict, Verdict::Unclassified);
    assert_eq!(verdict.level(), None);
}

#[test]
fn matching_sector_rule_overrides_organization() {
    let context = EvaluationContext::organization().with_sector("Marketing");
    assert_eq!(
        resolve(&marketing_override(), &context),
        Verdict::Classified(Productive)
    );
}

#[test]
fn empty_context_falls_back_to_organization() {
    assert_eq!(
        resolve(&marketing_override(), &EvaluationContext::organization()),
        Verdict::Classified(NonProductive)
    );
}

#[test]
fn unmatched_sector_falls_back_to_organization() {
    let rules = rule_set(vec![Rule::organization(NonProductive)]);
    let context = EvaluationContext::organization().with_sector("Marketing");
    assert_eq!(resolve(&rules, &context), Verdict::Classified(NonProductive));

    let context = EvaluationContext::organization().with_sector("Sales");
    assert_eq!(
        resolve(&marketing_override(), &context),
        Verdict::Classified(NonProductive)
    );
}

#[test]
fn scoped_rules_without_match_and_no_organization_are_unclassified() {
    let rules = rule_set(vec![Rule::scoped(Productive, ScopeKind::Sector, "Sales")]);
    let context = EvaluationContext::organization().with_sector("Engineering");

    let resolution = explain(&rules, &context);
    assert_eq!(resolution.verdict, Verdict::Unclassified);
    assert_eq!(resolution.source, VerdictSource::NoApplicableRule);
    assert_eq!(resolution.rule_index, None);
}

#[test]
fn declared_neutral_is_not_unclassified() {
    let rules = rule_set(vec![Rule::organization(Neutral)]);
    let verdict = resolve(&rules, &EvaluationContext::organization());
    assert_eq!(verdict, Verdict::Classified(Neutral));
    assert_ne!(verdict, Verdict::Unclassified);
}

#[test]
fn last_matching_scoped_rule_wins() {
    let rules = rule_set(vec![
        Rule::scoped(Productive, ScopeKind::Sector, "Engineering"),
        Rule::organization(NonProductive),
        Rule::scoped(Neutral, ScopeKind::Department, "IT"),
        Rule::scoped(NonProductive, ScopeKind::CostCenter, "CC1"),
    ]);
    let context = EvaluationContext::organization()
        .with_sector("Engineering")
        .with_department("IT");

    let resolution = explain(&rules, &context);
    assert_eq!(resolution.verdict, Verdict::Classified(Neutral));
    assert_eq!(resolution.source, VerdictSource::ScopedRule);
    assert_eq!(resolution.rule_index, Some(2));

    let context = context.with_cost_center("CC1");
    assert_eq!(
        resolve(&rules, &context),
        Verdict::Classified(NonProductive)
    );
}

#[test]
fn later_rule_for_same_unit_overrides_earlier_one() {
    let rules = rule_set(vec![
        Rule::scoped(Productive, ScopeKind::Sector, "Marketing"),
        Rule::scoped(Neutral, ScopeKind::Sector, "Marketing"),
    ]);
    let context = EvaluationContext::organization().with_sector("Marketing");
    assert_eq!(resolve(&rules, &context), Verdict::Classified(Neutral));
}

#[test]
fn organization_rule_position_does_not_matter() {
    let rules = rule_set(vec![
        Rule::scoped(Productive, ScopeKind::Sector, "Marketing"),
        Rule::organization(NonProductive),
    ]);
    let context = EvaluationContext::organization().with_sector("Marketing");

    let resolution = explain(&rules, &context);
    assert_eq!(resolution.verdict, Verdict::Classified(Productive));
    assert_eq!(resolution.rule_index, Some(0));

    let fallback = explain(&rules, &EvaluationContext::organization());
    assert_eq!(fallback.source, VerdictSource::OrganizationFallback);
    assert_eq!(fallback.rule_index, Some(1));
}

#[test]
fn context_value_only_matches_its_own_scope() {
    // "IT" as a cost center must not satisfy a department rule
    let rules = rule_set(vec![Rule::scoped(Productive, ScopeKind::Department, "IT")]);
    let context = EvaluationContext {
        cost_center: Some("IT".into()),
        ..EvaluationContext::default()
    };
    assert_eq!(resolve(&rules, &context), Verdict::Unclassified);
}

#[test]
fn badges_show_all_rules_regardless_of_resolution() {
    let rules = marketing_override();
    let context = EvaluationContext::organization().with_sector("Marketing");

    assert_eq!(resolve(&rules, &context), Verdict::Classified(Productive));
    let badges = rules.badges();
    assert_eq!(badges.len(), 2);
    assert_eq!(badges[0].level, NonProductive);
    assert_eq!(badges[1].level, Productive);
}

#[test]
fn verdict_labels_distinguish_unclassified() {
    assert_eq!(Verdict::Unclassified.label(), "Unclassified");
    assert_eq!(Verdict::Classified(NonProductive).label(), "Non-Productive");
}
