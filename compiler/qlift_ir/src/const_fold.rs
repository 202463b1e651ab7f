//! Constant folding over computation trees.
//!
//! Used to decide conditional tests ahead of execution: a test that folds to
//! `true` or `false` makes one branch dead. Folding never allocates nodes; it
//! only reads the arena.
//!
//! # Scope
//!
//! - Literal values and pure arithmetic (`Add`/`Sub`/`Mul`, `Neg`)
//! - Boolean logic, including short-circuit with one unknown operand
//!   (`false && x` is `false`, `true || x` is `true`)
//! - Comparisons between constants of the same kind
//! - Conditionals whose test folds
//!
//! Calls, constructions and parameters are never constant.

use crate::expr::{BinaryOp, ConstValue, ExprId, ExprKind, UnaryOp};
use crate::stack::ensure_sufficient_stack;
use crate::ExprArena;

/// Fold `id` to a constant, or `None` if it depends on runtime values.
///
/// Integer overflow folds to `None` (deferred to runtime).
pub fn fold_const(arena: &ExprArena, id: ExprId) -> Option<ConstValue> {
    if !id.is_valid() {
        return None;
    }
    ensure_sufficient_stack(|| match *arena.kind(id) {
        ExprKind::Constant(value) => Some(value),

        ExprKind::Unary {
            op: UnaryOp::Convert,
            operand,
        } => {
            // Only identity conversions keep the literal's meaning.
            if arena.ty(operand) == arena.ty(id) {
                fold_const(arena, operand)
            } else {
                None
            }
        }
        ExprKind::Unary { op, operand } => fold_unary(op, fold_const(arena, operand)?),

        ExprKind::Binary {
            op: BinaryOp::And,
            left,
            right,
        } => {
            if fold_bool(arena, left)? {
                fold_bool(arena, right).map(ConstValue::Bool)
            } else {
                Some(ConstValue::Bool(false))
            }
        }
        ExprKind::Binary {
            op: BinaryOp::Or,
            left,
            right,
        } => {
            if fold_bool(arena, left)? {
                Some(ConstValue::Bool(true))
            } else {
                fold_bool(arena, right).map(ConstValue::Bool)
            }
        }
        ExprKind::Binary { op, left, right } => {
            let lval = fold_const(arena, left)?;
            let rval = fold_const(arena, right)?;
            fold_binary(op, lval, rval)
        }

        // Dead branch elimination: `true ? A : B` → A.
        ExprKind::Conditional {
            test,
            if_true,
            if_false,
        } => {
            if fold_bool(arena, test)? {
                fold_const(arena, if_true)
            } else {
                fold_const(arena, if_false)
            }
        }

        ExprKind::Param(_)
        | ExprKind::Lambda { .. }
        | ExprKind::Call { .. }
        | ExprKind::New { .. }
        | ExprKind::Quote(_) => None,
    })
}

/// Fold `id` to a boolean constant.
pub fn fold_bool(arena: &ExprArena, id: ExprId) -> Option<bool> {
    match fold_const(arena, id)? {
        ConstValue::Bool(value) => Some(value),
        _ => None,
    }
}

fn fold_unary(op: UnaryOp, value: ConstValue) -> Option<ConstValue> {
    match (op, value) {
        (UnaryOp::Not, ConstValue::Bool(b)) => Some(ConstValue::Bool(!b)),
        (UnaryOp::Neg, ConstValue::Int(i)) => i.checked_neg().map(ConstValue::Int),
        (UnaryOp::Neg, ConstValue::Float(bits)) => Some(ConstValue::float(-f64::from_bits(bits))),
        _ => None,
    }
}

fn fold_binary(op: BinaryOp, left: ConstValue, right: ConstValue) -> Option<ConstValue> {
    use ConstValue::{Bool, Float, Int, Null};

    match (op, left, right) {
        // Integer arithmetic (with overflow detection).
        (BinaryOp::Add, Int(a), Int(b)) => a.checked_add(b).map(Int),
        (BinaryOp::Sub, Int(a), Int(b)) => a.checked_sub(b).map(Int),
        (BinaryOp::Mul, Int(a), Int(b)) => a.checked_mul(b).map(Int),

        // Float arithmetic.
        (BinaryOp::Add, Float(a), Float(b)) => Some(ConstValue::float(f64::from_bits(a) + f64::from_bits(b))),
        (BinaryOp::Sub, Float(a), Float(b)) => Some(ConstValue::float(f64::from_bits(a) - f64::from_bits(b))),
        (BinaryOp::Mul, Float(a), Float(b)) => Some(ConstValue::float(f64::from_bits(a) * f64::from_bits(b))),

        // Equality within one kind. Floats compare by value, not bits.
        (BinaryOp::Eq | BinaryOp::NotEq, Float(a), Float(b)) => {
            let equal = f64::from_bits(a) == f64::from_bits(b);
            Some(Bool(equal == (op == BinaryOp::Eq)))
        }
        (BinaryOp::Eq | BinaryOp::NotEq, a, b) if same_kind(a, b) => {
            Some(Bool((a == b) == (op == BinaryOp::Eq)))
        }
        (BinaryOp::Eq | BinaryOp::NotEq, Null, _) | (BinaryOp::Eq | BinaryOp::NotEq, _, Null) => {
            // Null against a non-null literal.
            Some(Bool(op == BinaryOp::NotEq))
        }

        // Ordering.
        (BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq, Int(a), Int(b)) => {
            Some(Bool(compare(op, a.cmp(&b))))
        }
        (BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq, Float(a), Float(b)) => {
            let ordering = f64::from_bits(a).partial_cmp(&f64::from_bits(b));
            // NaN compares false under every ordering operator.
            Some(Bool(ordering.is_some_and(|o| compare(op, o))))
        }

        _ => None,
    }
}

fn same_kind(a: ConstValue, b: ConstValue) -> bool {
    std::mem::discriminant(&a) == std::mem::discriminant(&b)
}

fn compare(op: BinaryOp, ordering: std::cmp::Ordering) -> bool {
    match op {
        BinaryOp::Lt => ordering.is_lt(),
        BinaryOp::LtEq => ordering.is_le(),
        BinaryOp::Gt => ordering.is_gt(),
        BinaryOp::GtEq => ordering.is_ge(),
        _ => false,
    }
}

#[cfg(test)]
mod tests;
