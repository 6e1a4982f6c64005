use form_validation_engine::config::EngineConfig;
use form_validation_engine::form::{Form, FormFile};
use form_validation_engine::presentation::{ClassPresenter, NullPresenter};
use form_validation_engine::validation::{FormEngine, Outcome};

fn engine_from_toml(toml_src: &str) -> FormEngine {
    let file: FormFile = toml::from_str(toml_src).expect("parse definition");
    let form = Form::from_file(file).expect("build form");
    FormEngine::new(form, EngineConfig::default())
}

#[test]
fn test_value_dependency_scenario() {
    // Field A has rule not-empty; field B depends on A == "yes".
    let mut engine = engine_from_toml(
        r#"
        [form]
        name = "scenario"

        [[fields]]
        id = "a"
        rules = ["not-empty"]

        [[fields]]
        id = "b"
        rules = ["not-empty"]
        depends_on = { field = "a", equals = "yes" }
    "#,
    );

    // A="", B="": cascade from A yields A invalid, B not applicable.
    let results = engine.cascade_validate("a", &mut NullPresenter);
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].key, "a");
    assert_eq!(results[0].outcome, Outcome::Invalid);
    assert_eq!(results[1].key, "b");
    assert_eq!(results[1].outcome, Outcome::NotApplicable);

    // A="yes", B="": A valid, then B is enqueued and found invalid.
    engine.form.get_mut("a").unwrap().value = "yes".to_string();
    let results = engine.cascade_validate("a", &mut NullPresenter);
    assert_eq!(results[0].outcome, Outcome::Valid);
    assert_eq!(results[1].outcome, Outcome::Invalid);
}

#[test]
fn test_checked_dependency_controls_validation() {
    let mut engine = engine_from_toml(
        r#"
        [form]
        name = "newsletter"

        [[fields]]
        id = "subscribe"
        type = "checkbox"

        [[fields]]
        id = "email"
        rules = ["not-empty", "email"]
        depends_on = { field = "subscribe", checked = true }
    "#,
    );

    let results = engine.cascade_validate("subscribe", &mut NullPresenter);
    // The checkbox itself has no rules, only its dependent validates.
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].key, "email");
    assert_eq!(results[0].outcome, Outcome::NotApplicable);

    engine.form.get_mut("subscribe").unwrap().checked = true;
    let results = engine.cascade_validate("subscribe", &mut NullPresenter);
    assert_eq!(results[0].outcome, Outcome::Invalid);

    engine.form.get_mut("email").unwrap().value = "a@b.co".to_string();
    let results = engine.cascade_validate("subscribe", &mut NullPresenter);
    assert_eq!(results[0].outcome, Outcome::Valid);
}

#[test]
fn test_cyclic_dependencies_terminate() {
    let mut engine = engine_from_toml(
        r#"
        [form]
        name = "cycle"

        [[fields]]
        id = "a"
        rules = ["text"]
        depends_on = { field = "b" }

        [[fields]]
        id = "b"
        rules = ["text"]
        depends_on = { field = "a" }
    "#,
    );

    let results = engine.cascade_validate("a", &mut NullPresenter);
    let keys: Vec<_> = results.iter().map(|r| r.key.as_str()).collect();
    assert_eq!(keys, vec!["a", "b"]);
}

#[test]
fn test_chain_revalidates_transitively() {
    // country -> state -> county, all value-gated
    let mut engine = engine_from_toml(
        r#"
        [form]
        name = "address"

        [[fields]]
        id = "country"
        value = "US"
        rules = ["not-empty"]

        [[fields]]
        id = "state"
        value = "OR"
        rules = ["not-empty"]
        depends_on = { field = "country", equals = "US" }

        [[fields]]
        id = "county"
        rules = ["not-empty"]
        depends_on = { field = "state", equals = "OR" }
    "#,
    );

    let results = engine.cascade_validate("country", &mut NullPresenter);
    let keys: Vec<_> = results.iter().map(|r| r.key.as_str()).collect();
    assert_eq!(keys, vec!["country", "state", "county"]);
    assert_eq!(results[2].outcome, Outcome::Invalid);

    // Switching country away from US excludes state; county still sees
    // state's current value matching, so it stays validated.
    engine.form.get_mut("country").unwrap().value = "CA".to_string();
    let results = engine.cascade_validate("country", &mut NullPresenter);
    assert_eq!(results[1].outcome, Outcome::NotApplicable);
    assert_eq!(results[2].outcome, Outcome::Invalid);
}

#[test]
fn test_unresolved_rule_is_vacuous_pass() {
    let mut engine = engine_from_toml(
        r#"
        [form]
        name = "typo"

        [[fields]]
        id = "a"
        value = "anything"
        rules = ["foo"]
    "#,
    );

    let results = engine.cascade_validate("a", &mut NullPresenter);
    assert_eq!(results[0].outcome, Outcome::Valid);
}

#[test]
fn test_presentation_markers_follow_outcomes() {
    let mut engine = engine_from_toml(
        r#"
        [form]
        name = "markers"

        [[fields]]
        id = "a"
        rules = ["not-empty"]

        [[fields]]
        id = "b"
        rules = ["not-empty"]
        depends_on = { field = "a", equals = "yes" }
    "#,
    );
    let mut presenter = ClassPresenter::from_config(&engine.config);

    engine.cascade_validate("a", &mut presenter);
    assert_eq!(engine.form.get("a").unwrap().classes, vec!["invalid"]);
    // Not-applicable maps to neutral: no marker asserted either way.
    assert!(engine.form.get("b").unwrap().classes.is_empty());

    engine.form.get_mut("a").unwrap().value = "yes".to_string();
    engine.cascade_validate("a", &mut presenter);
    assert!(engine.form.get("a").unwrap().classes.is_empty());
    assert_eq!(engine.form.get("b").unwrap().classes, vec!["invalid"]);
}

#[test]
fn test_validate_all_aggregates_flat() {
    let mut engine = engine_from_toml(
        r#"
        [form]
        name = "flat"

        [[fields]]
        id = "a"
        value = "x"
        rules = ["not-empty"]

        [[fields]]
        id = "b"
        rules = ["not-empty"]
        depends_on = { field = "a", equals = "yes" }

        [[fields]]
        id = "c"
        value = "5"
        rules = ["number"]
    "#,
    );

    let report = engine.validate_all(&mut NullPresenter);
    assert!(report.overall_valid);
    assert_eq!(report.outcome_for("a"), Some(Outcome::Valid));
    assert_eq!(report.outcome_for("b"), Some(Outcome::NotApplicable));
    assert_eq!(report.outcome_for("c"), Some(Outcome::Valid));
}

#[test]
fn test_missing_controller_excluded_not_fatal() {
    let mut engine = engine_from_toml(
        r#"
        [form]
        name = "dangling"

        [[fields]]
        id = "orphan"
        rules = ["not-empty"]
        depends_on = { field = "nowhere" }
    "#,
    );

    // Cascade skips the field entirely rather than crashing.
    let results = engine.cascade_validate("orphan", &mut NullPresenter);
    assert!(results.is_empty());

    // Full-form pass maps it to not-applicable.
    let report = engine.validate_all(&mut NullPresenter);
    assert!(report.overall_valid);
    assert_eq!(report.outcome_for("orphan"), Some(Outcome::NotApplicable));
}
