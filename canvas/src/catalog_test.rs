#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn catalog_lists_every_kind_in_order() {
    let kinds: Vec<ComponentKind> = catalog().iter().map(|t| t.kind).collect();
    assert_eq!(kinds, ComponentKind::ALL.to_vec());
}

#[test]
fn templates_have_positive_size_and_label() {
    for t in catalog() {
        assert!(t.width > 0.0 && t.height > 0.0, "{:?}", t.kind);
        assert!(!t.label.is_empty());
        assert!(!t.material.is_empty());
    }
}

#[test]
fn instantiate_centers_and_copies_template() {
    let t = template(ComponentKind::Grill);
    let entity = t.instantiate(Point::new(100.0, 100.0));
    assert_eq!(entity.bounds(), Rect::new(65.0, 75.0, 70.0, 50.0));
    assert_eq!(entity.style.fill, Some(t.color));
    match &entity.shape {
        Shape::Component { component, material, label, .. } => {
            assert_eq!(*component, ComponentKind::Grill);
            assert_eq!(material, "stainless steel");
            assert_eq!(label, "Grill");
        }
        other => panic!("expected component, got {other:?}"),
    }
}

#[test]
fn instances_are_independent() {
    let t = template(ComponentKind::Chair);
    let a = t.instantiate(Point::new(0.0, 0.0));
    let b = t.instantiate(Point::new(0.0, 0.0));
    assert_ne!(a.id, b.id);
}

#[test]
fn kind_serde_snake_case() {
    assert_eq!(serde_json::to_string(&ComponentKind::Planter).unwrap(), "\"planter\"");
    let kind: ComponentKind = serde_json::from_str("\"footing\"").unwrap();
    assert_eq!(kind, ComponentKind::Footing);
}
