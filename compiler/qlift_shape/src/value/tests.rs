use super::*;
use pretty_assertions::assert_eq;

#[test]
fn runtime_types_of_primitives() {
    assert_eq!(Value::Null.runtime_type(), Idx::NONE);
    assert_eq!(Value::Bool(true).runtime_type(), Idx::BOOL);
    assert_eq!(Value::Int(3).runtime_type(), Idx::INT);
    assert_eq!(Value::Float(0.5).runtime_type(), Idx::FLOAT);
    assert_eq!(Value::str("a").runtime_type(), Idx::STR);
}

#[test]
fn instances_follow_class_hierarchy() {
    let pool = Pool::new();
    let animal = pool.class("Animal", Idx::OBJECT);
    let dog = pool.class("Dog", animal);
    let cat = pool.class("Cat", animal);

    let rex = Value::object(dog, Vec::new());
    assert!(rex.is_instance(&pool, dog));
    assert!(rex.is_instance(&pool, animal));
    assert!(rex.is_instance(&pool, Idx::OBJECT));
    assert!(!rex.is_instance(&pool, cat));
    assert!(Value::Int(1).is_instance(&pool, Idx::OBJECT));
}

#[test]
fn null_is_instance_of_reference_types_only() {
    let pool = Pool::new();
    let animal = pool.class("Animal", Idx::OBJECT);
    assert!(Value::Null.is_instance(&pool, animal));
    assert!(Value::Null.is_instance(&pool, Idx::STR));
    assert!(!Value::Null.is_instance(&pool, Idx::INT));
}

#[test]
fn object_fields() {
    let pool = Pool::new();
    let point = pool.class("Point", Idx::OBJECT);
    let x = pool.intern_name("x");
    let y = pool.intern_name("y");
    let value = Value::object(point, vec![(x, Value::Int(1))]);

    assert_eq!(value.field(x), Some(&Value::Int(1)));
    assert_eq!(value.field(y), None);
    assert_eq!(Value::Int(1).field(x), None);
}
