//! Property tests for direction classification, naming and conversion

use modelgraph::core::naming::{diagram_alias, singularize, upper_snake_case};
use modelgraph::plugins::graph::{convert, relationship_type_name};
use modelgraph::plugins::layout::{classify, resolve_directions};
use modelgraph::prelude::*;
use proptest::prelude::*;

fn point() -> impl Strategy<Value = (f64, f64)> {
    (-1000.0f64..1000.0, -1000.0f64..1000.0)
}

#[test]
fn test_axis_examples() {
    let origin = LayoutPoint::new(0.0, 0.0);
    assert_eq!(classify(origin, LayoutPoint::new(100.0, 0.0)), DirectionSymbol::Right);
    assert_eq!(classify(origin, LayoutPoint::new(0.0, 100.0)), DirectionSymbol::Down);
    assert_eq!(classify(origin, LayoutPoint::new(-100.0, 0.0)), DirectionSymbol::Left);
    assert_eq!(classify(origin, LayoutPoint::new(0.0, -100.0)), DirectionSymbol::Up);

    let mut positions = PositionMap::new();
    positions.insert("A".to_string(), origin);
    let key = RelationshipKey::new("A", "A", "HAS_A");
    let resolution = resolve_directions(&positions, std::slice::from_ref(&key));
    assert_eq!(resolution.directions[&key], DirectionSymbol::SelfLoop);
}

proptest! {
    #[test]
    fn prop_dominant_axis_wins((fx, fy) in point(), (tx, ty) in point()) {
        let symbol = classify(LayoutPoint::new(fx, fy), LayoutPoint::new(tx, ty));
        let (dx, dy) = (tx - fx, ty - fy);
        match symbol {
            DirectionSymbol::Right => prop_assert!(dx.abs() >= dy.abs() && dx >= 0.0),
            DirectionSymbol::Left => prop_assert!(dx.abs() >= dy.abs() && dx < 0.0),
            DirectionSymbol::Down => prop_assert!(dy.abs() > dx.abs() && dy > 0.0),
            DirectionSymbol::Up => prop_assert!(dy.abs() > dx.abs() && dy < 0.0),
            DirectionSymbol::SelfLoop => prop_assert!(false, "distinct nodes never self-loop"),
        }
    }

    #[test]
    fn prop_reversing_flips_direction((fx, fy) in point(), (tx, ty) in point()) {
        let from = LayoutPoint::new(fx, fy);
        let to = LayoutPoint::new(tx, ty);
        prop_assume!((tx - fx).abs() != (ty - fy).abs());
        let forward = classify(from, to);
        let backward = classify(to, from);
        let expected = match forward {
            DirectionSymbol::Right => DirectionSymbol::Left,
            DirectionSymbol::Left => DirectionSymbol::Right,
            DirectionSymbol::Down => DirectionSymbol::Up,
            DirectionSymbol::Up => DirectionSymbol::Down,
            DirectionSymbol::SelfLoop => DirectionSymbol::SelfLoop,
        };
        prop_assert_eq!(backward, expected);
    }

    #[test]
    fn prop_missing_endpoint_is_unresolved((x, y) in point(), present in "[A-Z][a-z]{1,8}", absent in "[A-Z][a-z]{1,8}") {
        prop_assume!(present != absent);
        let mut positions = PositionMap::new();
        positions.insert(present.clone(), LayoutPoint::new(x, y));
        let key = RelationshipKey::new(present, absent, "HAS_X");
        let resolution = resolve_directions(&positions, std::slice::from_ref(&key));
        prop_assert!(resolution.directions.is_empty());
        prop_assert_eq!(resolution.unresolved, vec![key]);
    }

    #[test]
    fn prop_relationship_name_shape(role in "[a-z]{1,6}([A-Z][a-z]{1,6}){0,2}") {
        let association = AssociationDef::new("A", "a", "B", role.clone());
        let name = relationship_type_name(&association);
        prop_assert!(name.starts_with("HAS_"));
        prop_assert_eq!(&name[4..], upper_snake_case(singularize(&role)));
        prop_assert!(!name.contains(char::is_lowercase));

        let composition = association.composition();
        prop_assert_eq!(relationship_type_name(&composition), "CONTAINS");
    }

    #[test]
    fn prop_alias_is_identifier(name in "[A-Za-z0-9 _&.-]{1,20}") {
        let alias = diagram_alias(&name);
        prop_assert!(!alias.is_empty());
        prop_assert!(alias.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
        prop_assert_eq!(diagram_alias(&alias), alias.clone());
    }

    #[test]
    fn prop_conversion_is_idempotent(children in 1usize..4, abstract_target in any::<bool>()) {
        let mut builder = DomainModel::builder("Generated")
            .class(ClassEntity::new("Owner"))
            .class(if abstract_target {
                ClassEntity::abstract_class("Base")
            } else {
                ClassEntity::new("Base")
            });
        for index in 0..children {
            let child = format!("Child{}", index);
            builder = builder
                .class(ClassEntity::new(&child))
                .generalization("Base", child);
        }
        let model = builder
            .association(AssociationDef::new("Owner", "owner", "Base", "items"))
            .build()
            .unwrap();

        let first = convert(&model);
        prop_assert_eq!(&first, &convert(&model));

        let expected = children + usize::from(!abstract_target);
        prop_assert_eq!(first.schema.relationship_count(), expected);
        prop_assert!(first.schema.relationships.iter().all(|r| r.type_name == "HAS_ITEM"));
    }
}
