//! Expression arena for computation trees.
//!
//! [`ExprArena`] uses struct-of-arrays layout (parallel `kinds` and `types`
//! arrays indexed by [`ExprId`]). Side tables hold what does not fit in a
//! `Copy` node: flattened child lists, declared parameters, and method
//! references.
//!
//! An arena is append-only. Passes that transform a tree read one arena by
//! shared reference and build another, so a tree can be transformed
//! repeatedly, or read from several threads at once, without copying.

use crate::expr::{
    BinaryOp, ConstValue, Expr, ExprId, ExprKind, ExprRange, MethodId, MethodRef, Param, ParamId,
    ParamRange, UnaryOp,
};
use crate::stack::ensure_sufficient_stack;
use crate::{Idx, Name, Pool};

#[inline]
fn to_u32(len: usize, what: &str) -> u32 {
    u32::try_from(len).unwrap_or_else(|_| panic!("too many {what}: {len} exceeds u32::MAX"))
}

#[inline]
fn to_u16(len: usize, what: &str) -> u16 {
    u16::try_from(len).unwrap_or_else(|_| panic!("{what} too long: {len} exceeds u16::MAX"))
}

/// Arena for computation tree nodes.
///
/// # Index Spaces
///
/// - `kinds`/`types`: parallel arrays indexed by [`ExprId`]
/// - `expr_lists`: flat `Vec<ExprId>` indexed by [`ExprRange`]
/// - `params`: declared parameters indexed by [`ParamId`]
/// - `param_lists`: flat `Vec<ParamId>` indexed by [`ParamRange`]
/// - `methods`: method references indexed by [`MethodId`]
#[derive(Clone, Debug, Default)]
pub struct ExprArena {
    kinds: Vec<ExprKind>,
    types: Vec<Idx>,
    expr_lists: Vec<ExprId>,
    params: Vec<Param>,
    param_lists: Vec<ParamId>,
    methods: Vec<MethodRef>,
}

impl ExprArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a node, returning its ID.
    pub fn push(&mut self, expr: Expr) -> ExprId {
        let id = ExprId::new(to_u32(self.kinds.len(), "expressions"));
        self.kinds.push(expr.kind);
        self.types.push(expr.ty);
        id
    }

    /// Get the kind of a node.
    #[inline]
    pub fn kind(&self, id: ExprId) -> &ExprKind {
        &self.kinds[id.index()]
    }

    /// Get the static type of a node.
    #[inline]
    pub fn ty(&self, id: ExprId) -> Idx {
        self.types[id.index()]
    }

    /// Reconstruct a full `Expr` from the parallel arrays.
    pub fn get(&self, id: ExprId) -> Expr {
        Expr::new(self.kinds[id.index()], self.types[id.index()])
    }

    /// Number of allocated nodes.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Returns `true` if no nodes have been allocated.
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    // === Side tables ===

    /// Allocate a contiguous range of expression IDs.
    pub fn push_expr_list(&mut self, ids: &[ExprId]) -> ExprRange {
        if ids.is_empty() {
            return ExprRange::EMPTY;
        }
        let start = to_u32(self.expr_lists.len(), "expression lists");
        self.expr_lists.extend_from_slice(ids);
        ExprRange::new(start, to_u16(ids.len(), "expression list"))
    }

    /// Get expression IDs from a range.
    pub fn get_expr_list(&self, range: ExprRange) -> &[ExprId] {
        if range.is_empty() {
            return &[];
        }
        let start = range.start as usize;
        &self.expr_lists[start..start + range.len()]
    }

    /// Declare a parameter. It becomes visible to `param_ref` and `lambda`.
    pub fn declare_param(&mut self, name: Name, ty: Idx) -> ParamId {
        let id = ParamId::new(to_u32(self.params.len(), "parameters"));
        self.params.push(Param { name, ty });
        id
    }

    /// Get a declared parameter.
    #[inline]
    pub fn param(&self, id: ParamId) -> Param {
        self.params[id.index()]
    }

    /// Allocate a contiguous range of parameter IDs.
    pub fn push_param_list(&mut self, ids: &[ParamId]) -> ParamRange {
        if ids.is_empty() {
            return ParamRange::EMPTY;
        }
        let start = to_u32(self.param_lists.len(), "parameter lists");
        self.param_lists.extend_from_slice(ids);
        ParamRange::new(start, to_u16(ids.len(), "parameter list"))
    }

    /// Get parameter IDs from a range.
    pub fn get_param_list(&self, range: ParamRange) -> &[ParamId] {
        if range.is_empty() {
            return &[];
        }
        let start = range.start as usize;
        &self.param_lists[start..start + range.len()]
    }

    /// Register a method reference.
    pub fn push_method(&mut self, method: MethodRef) -> MethodId {
        let id = MethodId::new(to_u32(self.methods.len(), "methods"));
        self.methods.push(method);
        id
    }

    /// Get a method reference.
    #[inline]
    pub fn method(&self, id: MethodId) -> &MethodRef {
        &self.methods[id.index()]
    }

    // === Typed builders ===

    /// `Constant(value)` of type `ty`.
    pub fn constant(&mut self, value: ConstValue, ty: Idx) -> ExprId {
        self.push(Expr::new(ExprKind::Constant(value), ty))
    }

    /// Reference to a declared parameter, typed by its declaration.
    pub fn param_ref(&mut self, param: ParamId) -> ExprId {
        let ty = self.param(param).ty;
        self.push(Expr::new(ExprKind::Param(param), ty))
    }

    /// Lambda over `params` returning `body`, typed `Fn<params.., body type>`.
    pub fn lambda(&mut self, pool: &Pool, params: &[ParamId], body: ExprId) -> ExprId {
        let param_types: Vec<Idx> = params.iter().map(|p| self.param(*p).ty).collect();
        let ty = pool.function(&param_types, self.ty(body));
        let params = self.push_param_list(params);
        self.push(Expr::new(ExprKind::Lambda { params, body }, ty))
    }

    /// Method call. Pass `ExprId::INVALID` as `receiver` for a static method.
    pub fn call(&mut self, receiver: ExprId, method: MethodRef, args: &[ExprId], ty: Idx) -> ExprId {
        let method = self.push_method(method);
        let args = self.push_expr_list(args);
        self.push(Expr::new(
            ExprKind::Call {
                receiver,
                method,
                args,
            },
            ty,
        ))
    }

    /// Construct an object of type `ty`.
    pub fn new_object(&mut self, ty: Idx, args: &[ExprId]) -> ExprId {
        let args = self.push_expr_list(args);
        self.push(Expr::new(ExprKind::New { args }, ty))
    }

    /// `test ? if_true : if_false`, typed by its branches.
    pub fn conditional(&mut self, test: ExprId, if_true: ExprId, if_false: ExprId) -> ExprId {
        let ty = self.ty(if_true);
        debug_assert_eq!(ty, self.ty(if_false), "conditional branches differ in type");
        self.push(Expr::new(
            ExprKind::Conditional {
                test,
                if_true,
                if_false,
            },
            ty,
        ))
    }

    pub fn unary(&mut self, op: UnaryOp, operand: ExprId, ty: Idx) -> ExprId {
        self.push(Expr::new(ExprKind::Unary { op, operand }, ty))
    }

    pub fn binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId, ty: Idx) -> ExprId {
        self.push(Expr::new(ExprKind::Binary { op, left, right }, ty))
    }

    /// Quote a lambda, typed `Quote<lambda type>`.
    pub fn quote(&mut self, pool: &Pool, lambda: ExprId) -> ExprId {
        let ty = pool.quote(self.ty(lambda));
        self.push(Expr::new(ExprKind::Quote(lambda), ty))
    }

    // === Queries ===

    /// Parameters and body of a lambda node.
    pub fn as_lambda(&self, id: ExprId) -> Option<(&[ParamId], ExprId)> {
        match *self.kind(id) {
            ExprKind::Lambda { params, body } => Some((self.get_param_list(params), body)),
            _ => None,
        }
    }

    /// Structural equality of `id` in `self` and `other_id` in `other`.
    ///
    /// Parameters compare by declared name and type, not by `ParamId`, so
    /// trees in different arenas can be compared. Method references compare
    /// by value.
    pub fn same_shape(&self, id: ExprId, other: &ExprArena, other_id: ExprId) -> bool {
        ensure_sufficient_stack(|| self.same_shape_inner(id, other, other_id))
    }

    fn same_shape_inner(&self, id: ExprId, other: &ExprArena, other_id: ExprId) -> bool {
        if id.is_valid() != other_id.is_valid() {
            return false;
        }
        if !id.is_valid() {
            return true;
        }
        if self.ty(id) != other.ty(other_id) {
            return false;
        }

        match (*self.kind(id), *other.kind(other_id)) {
            (ExprKind::Constant(a), ExprKind::Constant(b)) => a == b,
            (ExprKind::Param(a), ExprKind::Param(b)) => self.param(a) == other.param(b),
            (
                ExprKind::Lambda { params, body },
                ExprKind::Lambda {
                    params: other_params,
                    body: other_body,
                },
            ) => {
                let ours = self.get_param_list(params);
                let theirs = other.get_param_list(other_params);
                ours.len() == theirs.len()
                    && ours
                        .iter()
                        .zip(theirs)
                        .all(|(a, b)| self.param(*a) == other.param(*b))
                    && self.same_shape(body, other, other_body)
            }
            (
                ExprKind::Call {
                    receiver,
                    method,
                    args,
                },
                ExprKind::Call {
                    receiver: other_receiver,
                    method: other_method,
                    args: other_args,
                },
            ) => {
                self.method(method) == other.method(other_method)
                    && self.same_shape(receiver, other, other_receiver)
                    && self.same_list(args, other, other_args)
            }
            (ExprKind::New { args }, ExprKind::New { args: other_args }) => {
                self.same_list(args, other, other_args)
            }
            (
                ExprKind::Conditional {
                    test,
                    if_true,
                    if_false,
                },
                ExprKind::Conditional {
                    test: t,
                    if_true: a,
                    if_false: b,
                },
            ) => {
                self.same_shape(test, other, t)
                    && self.same_shape(if_true, other, a)
                    && self.same_shape(if_false, other, b)
            }
            (
                ExprKind::Unary { op, operand },
                ExprKind::Unary {
                    op: other_op,
                    operand: other_operand,
                },
            ) => op == other_op && self.same_shape(operand, other, other_operand),
            (
                ExprKind::Binary { op, left, right },
                ExprKind::Binary {
                    op: other_op,
                    left: l,
                    right: r,
                },
            ) => op == other_op && self.same_shape(left, other, l) && self.same_shape(right, other, r),
            (ExprKind::Quote(inner), ExprKind::Quote(other_inner)) => {
                self.same_shape(inner, other, other_inner)
            }
            _ => false,
        }
    }

    fn same_list(&self, range: ExprRange, other: &ExprArena, other_range: ExprRange) -> bool {
        let ours = self.get_expr_list(range);
        let theirs = other.get_expr_list(other_range);
        ours.len() == theirs.len()
            && ours
                .iter()
                .zip(theirs)
                .all(|(a, b)| self.same_shape(*a, other, *b))
    }
}

#[cfg(test)]
mod tests;
