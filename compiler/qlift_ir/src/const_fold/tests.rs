use super::*;
use crate::Idx;
use proptest::prelude::*;

fn bool_const(arena: &mut ExprArena, value: bool) -> ExprId {
    arena.constant(ConstValue::Bool(value), Idx::BOOL)
}

#[test]
fn literal_bool_folds() {
    let mut arena = ExprArena::new();
    let t = bool_const(&mut arena, true);
    assert_eq!(fold_bool(&arena, t), Some(true));
}

#[test]
fn negation_folds() {
    let mut arena = ExprArena::new();
    let f = bool_const(&mut arena, false);
    let not = arena.unary(UnaryOp::Not, f, Idx::BOOL);
    assert_eq!(fold_bool(&arena, not), Some(true));
}

#[test]
fn comparison_of_literals_folds() {
    let mut arena = ExprArena::new();
    let one = arena.constant(ConstValue::Int(1), Idx::INT);
    let two = arena.constant(ConstValue::Int(2), Idx::INT);
    let lt = arena.binary(BinaryOp::Lt, one, two, Idx::BOOL);
    let eq = arena.binary(BinaryOp::Eq, one, two, Idx::BOOL);
    assert_eq!(fold_bool(&arena, lt), Some(true));
    assert_eq!(fold_bool(&arena, eq), Some(false));
}

#[test]
fn parameter_is_runtime() {
    let mut arena = ExprArena::new();
    let p = arena.declare_param(crate::Name::EMPTY, Idx::BOOL);
    let p_ref = arena.param_ref(p);
    assert_eq!(fold_bool(&arena, p_ref), None);
}

#[test]
fn short_circuit_with_unknown_operand() {
    let mut arena = ExprArena::new();
    let p = arena.declare_param(crate::Name::EMPTY, Idx::BOOL);
    let unknown = arena.param_ref(p);
    let f = bool_const(&mut arena, false);
    let t = bool_const(&mut arena, true);

    let and = arena.binary(BinaryOp::And, f, unknown, Idx::BOOL);
    let or = arena.binary(BinaryOp::Or, t, unknown, Idx::BOOL);
    let undecided = arena.binary(BinaryOp::And, t, unknown, Idx::BOOL);

    assert_eq!(fold_bool(&arena, and), Some(false));
    assert_eq!(fold_bool(&arena, or), Some(true));
    assert_eq!(fold_bool(&arena, undecided), None);
}

#[test]
fn integer_overflow_is_not_folded() {
    let mut arena = ExprArena::new();
    let max = arena.constant(ConstValue::Int(i64::MAX), Idx::INT);
    let one = arena.constant(ConstValue::Int(1), Idx::INT);
    let sum = arena.binary(BinaryOp::Add, max, one, Idx::INT);
    assert_eq!(fold_const(&arena, sum), None);
}

#[test]
fn nan_orders_false() {
    let mut arena = ExprArena::new();
    let nan = arena.constant(ConstValue::float(f64::NAN), Idx::FLOAT);
    let one = arena.constant(ConstValue::float(1.0), Idx::FLOAT);
    let lt = arena.binary(BinaryOp::Lt, nan, one, Idx::BOOL);
    let eq = arena.binary(BinaryOp::Eq, nan, nan, Idx::BOOL);
    assert_eq!(fold_bool(&arena, lt), Some(false));
    assert_eq!(fold_bool(&arena, eq), Some(false));
}

#[test]
fn null_against_literal() {
    let mut arena = ExprArena::new();
    let null = arena.constant(ConstValue::Null, Idx::STR);
    let s = arena.constant(ConstValue::Str(crate::Name::EMPTY), Idx::STR);
    let ne = arena.binary(BinaryOp::NotEq, null, s, Idx::BOOL);
    let both = arena.binary(BinaryOp::Eq, null, null, Idx::BOOL);
    assert_eq!(fold_bool(&arena, ne), Some(true));
    assert_eq!(fold_bool(&arena, both), Some(true));
}

#[test]
fn conditional_with_constant_test_folds_live_branch() {
    let mut arena = ExprArena::new();
    let t = bool_const(&mut arena, true);
    let one = arena.constant(ConstValue::Int(1), Idx::INT);
    let two = arena.constant(ConstValue::Int(2), Idx::INT);
    let cond = arena.conditional(t, one, two);
    assert_eq!(fold_const(&arena, cond), Some(ConstValue::Int(1)));
}

#[test]
fn non_identity_convert_is_runtime() {
    let mut arena = ExprArena::new();
    let one = arena.constant(ConstValue::Int(1), Idx::INT);
    let widened = arena.unary(UnaryOp::Convert, one, Idx::FLOAT);
    let same = arena.unary(UnaryOp::Convert, one, Idx::INT);
    assert_eq!(fold_const(&arena, widened), None);
    assert_eq!(fold_const(&arena, same), Some(ConstValue::Int(1)));
}

#[test]
fn deep_negation_chain_folds() {
    let mut arena = ExprArena::new();
    let mut id = bool_const(&mut arena, true);
    for _ in 0..50_000 {
        id = arena.unary(UnaryOp::Not, id, Idx::BOOL);
    }
    assert_eq!(fold_bool(&arena, id), Some(true));
}

proptest! {
    #[test]
    fn negation_chain_parity(value in any::<bool>(), depth in 0usize..64) {
        let mut arena = ExprArena::new();
        let mut id = bool_const(&mut arena, value);
        for _ in 0..depth {
            id = arena.unary(UnaryOp::Not, id, Idx::BOOL);
        }
        prop_assert_eq!(fold_bool(&arena, id), Some(value ^ (depth % 2 == 1)));
    }

    #[test]
    fn int_comparisons_match_rust(a in any::<i64>(), b in any::<i64>()) {
        let mut arena = ExprArena::new();
        let l = arena.constant(ConstValue::Int(a), Idx::INT);
        let r = arena.constant(ConstValue::Int(b), Idx::INT);
        let lt = arena.binary(BinaryOp::Lt, l, r, Idx::BOOL);
        let ge = arena.binary(BinaryOp::GtEq, l, r, Idx::BOOL);
        prop_assert_eq!(fold_bool(&arena, lt), Some(a < b));
        prop_assert_eq!(fold_bool(&arena, ge), Some(a >= b));
    }
}
