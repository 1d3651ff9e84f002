use std::collections::BTreeSet;

use interface_core::predicate::{Constraints, Predicates, QualifiedBy, Qualifier};
use interface_core::{ConfigurationError, InterfaceId, QueryError, Resolver};

trait Base {}

#[derive(Debug)]
struct Name(&'static str);

#[derive(Debug)]
struct SubName(&'static str);

struct Fixture {
    resolver: Resolver<&'static str>,
    itf: InterfaceId,
    qa: Qualifier,
    qb: Qualifier,
    sqc: Qualifier,
    qd: Qualifier,
}

fn fixture() -> Fixture {
    let resolver: Resolver<&'static str> = Resolver::new();
    let itf = resolver.declare_interface(InterfaceId::of::<dyn Base>());
    let qa = Qualifier::new(Name("qA"));
    let qb = Qualifier::new(Name("qB"));
    let sqc = Qualifier::new(SubName("qC"));
    let qd = Qualifier::new(Name("qD"));

    let declare = |name, qualifiers: Vec<Qualifier>| {
        let predicates = if qualifiers.is_empty() {
            Predicates::new()
        } else {
            Predicates::new().qualified_by(qualifiers).unwrap()
        };
        resolver.declare_implementation(itf, name, predicates).unwrap();
    };
    declare("A", vec![qa.clone()]);
    declare("B", vec![qb.clone()]);
    declare("C", vec![sqc.clone()]);
    declare("CD", vec![sqc.clone(), qd.clone()]);
    declare("Void", vec![]);

    Fixture {
        resolver,
        itf,
        qa,
        qb,
        sqc,
        qd,
    }
}

fn set(names: Vec<&'static str>) -> BTreeSet<&'static str> {
    names.into_iter().collect()
}

#[test]
fn qualified_by_selects_implementations_carrying_every_qualifier() {
    let f = fixture();
    let (resolver, itf) = (&f.resolver, &f.itf);

    assert!(resolver.query_single(itf, &Constraints::new()).unwrap_err().is_ambiguous());
    assert_eq!(
        set(resolver.query_all(itf, &Constraints::new()).unwrap()),
        set(vec!["A", "B", "C", "CD", "Void"])
    );

    let only_a = Constraints::new().qualified_by([f.qa.clone()]).unwrap();
    assert_eq!(resolver.query_single(itf, &only_a).unwrap(), "A");
    assert_eq!(resolver.query_all(itf, &only_a).unwrap(), vec!["A"]);

    let impossible = Constraints::new()
        .qualified_by([f.qa.clone(), f.qb.clone()])
        .unwrap();
    assert!(matches!(
        resolver.query_single(itf, &impossible),
        Err(QueryError::NoMatch { .. })
    ));
    assert!(resolver.query_all(itf, &impossible).unwrap().is_empty());

    let c_and_d = Constraints::new()
        .qualified_by([f.sqc.clone(), f.qd.clone()])
        .unwrap();
    assert_eq!(resolver.query_single(itf, &c_and_d).unwrap(), "CD");
    assert_eq!(resolver.query_all(itf, &c_and_d).unwrap(), vec!["CD"]);
}

#[test]
fn qualified_by_one_of_needs_a_single_shared_qualifier() {
    let f = fixture();
    let (resolver, itf) = (&f.resolver, &f.itf);

    let d = Constraints::new().qualified_by_one_of([f.qd.clone()]).unwrap();
    assert_eq!(resolver.query_single(itf, &d).unwrap(), "CD");

    let c = Constraints::new().qualified_by_one_of([f.sqc.clone()]).unwrap();
    assert!(resolver.query_single(itf, &c).unwrap_err().is_ambiguous());
    assert_eq!(set(resolver.query_all(itf, &c).unwrap()), set(vec!["C", "CD"]));

    let a_or_b = Constraints::new()
        .qualified_by_one_of([f.qa.clone(), f.qb.clone()])
        .unwrap();
    assert!(resolver.query_single(itf, &a_or_b).unwrap_err().is_ambiguous());
    assert_eq!(set(resolver.query_all(itf, &a_or_b).unwrap()), set(vec!["A", "B"]));
}

#[test]
fn qualified_by_instance_of_matches_on_qualifier_value_type() {
    let f = fixture();
    let (resolver, itf) = (&f.resolver, &f.itf);

    let sub = Constraints::new().qualified_by_instance_of::<SubName>();
    assert!(resolver.query_single(itf, &sub).unwrap_err().is_ambiguous());
    assert_eq!(set(resolver.query_all(itf, &sub).unwrap()), set(vec!["C", "CD"]));

    let named = Constraints::new().qualified_by_instance_of::<Name>();
    assert_eq!(
        set(resolver.query_all(itf, &named).unwrap()),
        set(vec!["A", "B", "CD"])
    );
}

#[test]
fn mixed_constraints_must_all_hold() {
    let f = fixture();
    let (resolver, itf) = (&f.resolver, &f.itf);

    let mixed = Constraints::new()
        .qualified_by_one_of([f.qd.clone()])
        .unwrap()
        .qualified_by_instance_of::<SubName>();
    assert_eq!(resolver.query_single(itf, &mixed).unwrap(), "CD");
    assert_eq!(resolver.query_all(itf, &mixed).unwrap(), vec!["CD"]);

    let two_one_ofs = Constraints::new()
        .qualified_by_one_of([f.qd.clone()])
        .unwrap()
        .qualified_by_one_of([f.sqc.clone()])
        .unwrap();
    assert_eq!(resolver.query_single(itf, &two_one_ofs).unwrap(), "CD");
}

#[test]
fn qualifiers_compare_by_identity() {
    let first = Qualifier::new(Name("same"));
    let second = Qualifier::new(Name("same"));
    assert_ne!(first, second);
    assert_eq!(first, first.clone());

    let qualified = QualifiedBy::new([first.clone(), first.clone(), second.clone()]).unwrap();
    assert_eq!(qualified.qualifiers().len(), 2);
    assert!(qualified.contains(&first));
    assert!(qualified.qualifiers().iter().all(Qualifier::is::<Name>));
    assert_eq!(
        first.value().downcast_ref::<Name>().map(|name| name.0),
        Some("same")
    );
    assert!(first.value().downcast_ref::<SubName>().is_none());
}

#[test]
fn empty_qualifier_lists_are_rejected() {
    assert_eq!(
        QualifiedBy::new(Vec::new()).unwrap_err(),
        ConfigurationError::EmptyQualifiers
    );
    assert!(Constraints::new().qualified_by_one_of(Vec::new()).is_err());
    assert!(Predicates::<interface_core::predicate::NeutralWeight>::new()
        .qualified_by(Vec::new())
        .is_err());
}

#[test]
fn qualified_by_merge_is_a_union() {
    let x = Qualifier::named("x");
    let y = Qualifier::named("y");
    let a = QualifiedBy::new([x.clone()]).unwrap();
    let b = QualifiedBy::new([y.clone(), x.clone()]).unwrap();

    let merged = QualifiedBy::merge(&a, &b);
    assert_eq!(merged.qualifiers().len(), 2);
    assert!(merged.contains(&x) && merged.contains(&y));
}
