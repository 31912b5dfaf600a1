use sim_core::SymbolTable;
use sim_needs::{
    HappinessCurve, NeedCatalog, NeedCategory, NeedDef, Needs, NeedsError, RollingAverage,
};

fn catalog(defs: Vec<NeedDef>) -> (NeedCatalog, SymbolTable) {
    let mut symbols = SymbolTable::new();
    let catalog = NeedCatalog::from_defs(defs, &mut symbols).expect("valid catalog");
    (catalog, symbols)
}

#[test]
fn need_at_floor_with_negative_drift_stays_at_floor() {
    let (catalog, symbols) = catalog(vec![
        NeedDef::new("Energy", NeedCategory::Body).with_idle_delta(-1)
    ]);
    let energy = catalog.id_by_name(&symbols, "Energy").expect("defined");
    let mut needs = Needs::new(&catalog, 100.0, 4);

    needs.tick(&catalog);
    assert_eq!(needs.value(energy), 0);
}

#[test]
fn idle_drift_accumulates_and_clamps_at_max() {
    let (catalog, symbols) = catalog(vec![NeedDef::new("Toilet", NeedCategory::Body)
        .with_idle_delta(30)
        .with_initial(50)]);
    let toilet = catalog.id_by_name(&symbols, "Toilet").expect("defined");
    let mut needs = Needs::new(&catalog, 100.0, 4);

    needs.tick(&catalog);
    assert_eq!(needs.value(toilet), 80);
    needs.tick(&catalog);
    assert_eq!(needs.value(toilet), 100);
}

#[test]
fn curves_are_evaluated_on_the_normalised_value() {
    let linear = HappinessCurve::Linear { scale: 2.0 };
    assert_eq!(linear.penalty(50, 0, 100), 1.0);
    assert_eq!(linear.penalty(-10, -10, 10), 0.0);

    let power = HappinessCurve::Power {
        scale: 4.0,
        exponent: 2.0,
    };
    assert_eq!(power.penalty(50, 0, 100), 1.0);
    assert_eq!(power.penalty(100, 0, 100), 4.0);

    let flat = HappinessCurve::Flat { penalty: 0.5 };
    assert_eq!(flat.penalty(0, 0, 100), 0.5);
    assert_eq!(flat.penalty(100, 0, 100), 0.5);
}

#[test]
fn happiness_falls_by_the_penalty_and_never_goes_negative() {
    let (catalog, _) = catalog(vec![NeedDef::new("Toilet", NeedCategory::Body)
        .with_initial(100)
        .with_curve(HappinessCurve::Linear { scale: 3.0 })]);
    let mut needs = Needs::new(&catalog, 10.0, 2);

    assert_eq!(needs.tick(&catalog), 3.0);
    assert_eq!(needs.happiness(), 7.0);
    for _ in 0..5 {
        needs.tick(&catalog);
    }
    assert_eq!(needs.happiness(), 0.0);
    assert_eq!(needs.neediness(), 3.0);
}

#[test]
fn urgency_rises_linearly_above_threshold() {
    let (catalog, symbols) = catalog(vec![NeedDef::new("Toilet", NeedCategory::Body)
        .with_threshold(50)
        .with_initial(80)]);
    let toilet = catalog.id_by_name(&symbols, "Toilet").expect("defined");
    let mut needs = Needs::new(&catalog, 100.0, 4);

    assert!((needs.urgency(&catalog, toilet) - 0.6).abs() < 1e-6);
    needs.set(&catalog, toilet, 50);
    assert_eq!(needs.urgency(&catalog, toilet), 0.0);
    assert!(!needs.is_urgent(&catalog, toilet));
}

#[test]
fn apply_delta_clamps() {
    let (catalog, symbols) = catalog(vec![
        NeedDef::new("Cardio", NeedCategory::Fitness).with_initial(10)
    ]);
    let cardio = catalog.id_by_name(&symbols, "Cardio").expect("defined");
    let mut needs = Needs::new(&catalog, 100.0, 4);

    assert_eq!(needs.apply_delta(&catalog, cardio, -25), 0);
    assert_eq!(needs.apply_delta(&catalog, cardio, 250), 100);
}

#[test]
fn rolling_average_keeps_only_the_window() {
    let mut avg = RollingAverage::new(3);
    assert_eq!(avg.average(), 0.0);
    for sample in [1.0, 2.0, 3.0, 10.0] {
        avg.push(sample);
    }
    assert_eq!(avg.len(), 3);
    assert_eq!(avg.average(), 5.0);
}

#[test]
fn catalog_loads_from_yaml_and_interns_names() {
    let yaml = r#"
needs:
  - name: Toilet
    idle_delta: 1
    initial: 20
    curve: { kind: power, scale: 0.5, exponent: 2.0 }
  - name: Cardio
    category: fitness
    urgency_threshold: 30
"#;
    let mut symbols = SymbolTable::new();
    let catalog = NeedCatalog::from_yaml_str(yaml, &mut symbols).expect("valid yaml");

    assert_eq!(catalog.len(), 2);
    let cardio = catalog.id_by_name(&symbols, "Cardio").expect("defined");
    assert_eq!(catalog.def(cardio).category, NeedCategory::Fitness);
    assert_eq!(catalog.def(cardio).max, 100);
    assert_eq!(symbols.resolve(catalog.symbol(cardio)), "Cardio");

    let toilet = catalog.id_by_name(&symbols, "Toilet").expect("defined");
    assert_eq!(
        catalog.def(toilet).curve,
        HappinessCurve::Power {
            scale: 0.5,
            exponent: 2.0
        }
    );
}

#[test]
fn catalog_rejects_bad_definitions() {
    let mut symbols = SymbolTable::new();
    let dup = NeedCatalog::from_defs(
        vec![
            NeedDef::new("Thirst", NeedCategory::Body),
            NeedDef::new("Thirst", NeedCategory::Body),
        ],
        &mut symbols,
    );
    assert!(matches!(dup, Err(NeedsError::DuplicateNeed(name)) if name == "Thirst"));

    let empty = NeedCatalog::from_defs(
        vec![NeedDef::new("Energy", NeedCategory::Body).with_range(5, 5)],
        &mut symbols,
    );
    assert!(matches!(empty, Err(NeedsError::InvalidRange { .. })));

    let outside = NeedCatalog::from_defs(
        vec![NeedDef::new("Energy", NeedCategory::Body).with_initial(101)],
        &mut symbols,
    );
    assert!(matches!(outside, Err(NeedsError::InitialOutOfRange { .. })));

    assert!(matches!(
        NeedCatalog::from_yaml_str("needs: 3", &mut symbols),
        Err(NeedsError::Yaml(_))
    ));
    assert!(matches!(
        NeedCatalog::default().id_by_name(&symbols, "Nope"),
        Err(NeedsError::UnknownNeed(_))
    ));
}

#[test]
#[should_panic(expected = "unknown need id")]
fn unknown_need_id_panics() {
    let (small, _) = catalog(vec![NeedDef::new("A", NeedCategory::Body)]);
    let (big, symbols) = catalog(vec![
        NeedDef::new("A", NeedCategory::Body),
        NeedDef::new("B", NeedCategory::Body),
    ]);
    let b = big.id_by_name(&symbols, "B").expect("defined");
    let needs = Needs::new(&small, 100.0, 1);
    needs.value(b);
}

#[test]
fn need_defs_read_and_write_json() {
    let def = NeedDef::new("Cardio", NeedCategory::Fitness)
        .with_idle_delta(1)
        .with_threshold(30)
        .with_curve(HappinessCurve::Power {
            scale: 0.5,
            exponent: 2.0,
        });
    let json = serde_json::to_value(&def).expect("serialize");
    assert_eq!(json["category"], "fitness");
    assert_eq!(json["curve"]["kind"], "power");
    let back: NeedDef = serde_json::from_value(json).expect("deserialize");
    assert_eq!(back, def);

    let sparse = r#"{"name": "Thirst", "curve": {"kind": "flat", "penalty": 0.25}}"#;
    let sparse: NeedDef = serde_json::from_str(sparse).expect("defaults fill the rest");
    let expected = NeedDef::new("Thirst", NeedCategory::Body)
        .with_curve(HappinessCurve::Flat { penalty: 0.25 });
    assert_eq!(sparse, expected);
}
