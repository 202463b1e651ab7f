//! The selector rewriter.
//!
//! # Rewriting Permission
//!
//! Each visit carries two flags:
//! - `local`: rewriting is permitted at this exact node
//! - `path`: every ancestor was itself effective
//!
//! A node is *effective* when both hold. Children start with `local = false`
//! and `path = parent effective`. The root lambda body, the branches of a
//! conditional, and the operand of a quote re-enable `local` for their
//! child, so wrappers are only ever stripped in result positions.

use qlift_ir::const_fold::fold_bool;
use qlift_ir::stack::ensure_sufficient_stack;
use qlift_ir::{ExprArena, ExprId, ExprKind, ExprRange, Idx, MethodId, ParamId, Pool};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::{NotTranslatable, SelectorSignature};

/// A synchronous selector: `lambda` in its own arena.
#[derive(Debug)]
pub struct Normalized {
    pub arena: ExprArena,
    /// Lambda over the source parameters only; its body has the result type.
    pub lambda: ExprId,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct Flags {
    local: bool,
    path: bool,
}

impl Flags {
    /// Flags of the root lambda body.
    const ROOT: Flags = Flags {
        local: true,
        path: true,
    };

    #[inline]
    fn effective(self) -> bool {
        self.local && self.path
    }

    /// Flags for an ordinary child.
    #[inline]
    fn child(self) -> Flags {
        Flags {
            local: false,
            path: self.effective(),
        }
    }

    /// Flags for a child in a result position.
    #[inline]
    fn reenable(self) -> Flags {
        Flags {
            local: true,
            path: self.effective(),
        }
    }
}

/// Rewrite the async selector at `root` to its synchronous form.
///
/// `root` must be a lambda, possibly under any number of quotes. Its
/// parameters must match `signature` (sources, then cancellation if
/// `signature.cancellable`). On success the returned lambda takes only the
/// source parameters and its body has type `signature.result`.
#[tracing::instrument(level = "debug", skip_all, fields(
    sources = signature.sources.len(),
    cancellable = signature.cancellable,
))]
pub fn normalize(
    pool: &Pool,
    arena: &ExprArena,
    root: ExprId,
    signature: &SelectorSignature,
) -> Result<Normalized, NotTranslatable> {
    let result = Rewriter::new(pool, arena, signature.result).run(root, signature);
    match &result {
        Ok(normalized) => debug!(
            nodes = normalized.arena.len(),
            result = %pool.display(signature.result),
            "selector normalized"
        ),
        Err(reason) => debug!(%reason, "selector not translatable"),
    }
    result
}

struct Rewriter<'a> {
    pool: &'a Pool,
    src: &'a ExprArena,
    out: ExprArena,
    target: Idx,
    /// Source parameter → output parameter.
    params: FxHashMap<ParamId, ParamId>,
    /// The dropped cancellation parameter, if any.
    cancellation: Option<ParamId>,
}

impl<'a> Rewriter<'a> {
    fn new(pool: &'a Pool, src: &'a ExprArena, target: Idx) -> Self {
        Self {
            pool,
            src,
            out: ExprArena::new(),
            target,
            params: FxHashMap::default(),
            cancellation: None,
        }
    }

    fn run(
        mut self,
        root: ExprId,
        signature: &SelectorSignature,
    ) -> Result<Normalized, NotTranslatable> {
        let src = self.src;
        if !root.is_valid() {
            return Err(NotTranslatable::NotALambda);
        }

        let mut lambda = root;
        while let ExprKind::Quote(inner) = *src.kind(lambda) {
            lambda = inner;
        }
        let Some((params, body)) = src.as_lambda(lambda) else {
            return Err(NotTranslatable::NotALambda);
        };

        if params.len() != signature.parameter_count() {
            return Err(NotTranslatable::ParameterCount {
                expected: signature.parameter_count(),
                found: params.len(),
            });
        }

        let (sources, rest) = params.split_at(signature.sources.len());
        if let Some(&cancellation) = rest.first() {
            let found = src.param(cancellation).ty;
            if found != Idx::CANCELLATION {
                return Err(NotTranslatable::CancellationType { found });
            }
            self.cancellation = Some(cancellation);
        }

        let mut new_params: SmallVec<[ParamId; 2]> = SmallVec::new();
        for (position, (&param, expected)) in
            sources.iter().zip(signature.sources.types()).enumerate()
        {
            let found = src.param(param).ty;
            if found != expected {
                return Err(NotTranslatable::SourceType {
                    position,
                    expected,
                    found,
                });
            }
            new_params.push(self.map_param(param));
        }

        let new_body = self.visit(body, Flags::ROOT)?;
        let found = self.out.ty(new_body);
        if found != self.target {
            return Err(NotTranslatable::ResultType {
                expected: self.target,
                found,
            });
        }

        let lambda = self.out.lambda(self.pool, &new_params, new_body);
        Ok(Normalized {
            arena: self.out,
            lambda,
        })
    }

    /// Output parameter for `param`, declared on first use.
    fn map_param(&mut self, param: ParamId) -> ParamId {
        if let Some(&mapped) = self.params.get(&param) {
            return mapped;
        }
        let decl = self.src.param(param);
        let mapped = self.out.declare_param(decl.name, decl.ty);
        self.params.insert(param, mapped);
        mapped
    }

    fn visit(&mut self, id: ExprId, flags: Flags) -> Result<ExprId, NotTranslatable> {
        if !id.is_valid() {
            return Ok(ExprId::INVALID);
        }
        ensure_sufficient_stack(|| self.visit_inner(id, flags))
    }

    fn visit_inner(&mut self, id: ExprId, flags: Flags) -> Result<ExprId, NotTranslatable> {
        let src = self.src;
        let ty = src.ty(id);

        match *src.kind(id) {
            ExprKind::Constant(value) => Ok(self.out.constant(value, ty)),

            ExprKind::Param(param) => {
                if self.cancellation == Some(param) {
                    return Err(NotTranslatable::CancellationUsed);
                }
                let mapped = self.map_param(param);
                Ok(self.out.param_ref(mapped))
            }

            ExprKind::Lambda { params, body } => {
                let new_params: SmallVec<[ParamId; 4]> = src
                    .get_param_list(params)
                    .iter()
                    .map(|p| self.map_param(*p))
                    .collect();
                let body_flags = if flags.effective() {
                    flags.reenable()
                } else {
                    flags.child()
                };
                let new_body = self.visit(body, body_flags)?;
                Ok(self.out.lambda(self.pool, &new_params, new_body))
            }

            ExprKind::Quote(inner) => {
                let new_inner = self.visit(inner, flags.reenable())?;
                Ok(self.out.quote(self.pool, new_inner))
            }

            ExprKind::Conditional {
                test,
                if_true,
                if_false,
            } => {
                if flags.effective() {
                    self.visit_conditional(test, if_true, if_false, flags)
                } else {
                    let child = flags.child();
                    let test = self.visit(test, child)?;
                    let if_true = self.visit(if_true, child)?;
                    let if_false = self.visit(if_false, child)?;
                    Ok(self.out.conditional(test, if_true, if_false))
                }
            }

            ExprKind::New { args } => {
                if flags.effective() {
                    if let Some(payload) = self.completed_payload(ty, args) {
                        trace!(node = id.raw(), "stripped deferred constructor");
                        return self.visit(payload, flags.child());
                    }
                }
                let args = self.visit_list(args, flags.child())?;
                Ok(self.out.new_object(ty, &args))
            }

            ExprKind::Call {
                receiver,
                method,
                args,
            } => {
                if flags.effective() && !receiver.is_valid() && self.is_factory(method) {
                    if let Some(payload) = self.completed_payload(ty, args) {
                        trace!(node = id.raw(), "stripped deferred factory call");
                        return self.visit(payload, flags.child());
                    }
                }
                let child = flags.child();
                let receiver = self.visit(receiver, child)?;
                let args = self.visit_list(args, child)?;
                let method = src.method(method).clone();
                Ok(self.out.call(receiver, method, &args, ty))
            }

            ExprKind::Unary { op, operand } => {
                let operand = self.visit(operand, flags.child())?;
                Ok(self.out.unary(op, operand, ty))
            }

            ExprKind::Binary { op, left, right } => {
                let child = flags.child();
                let left = self.visit(left, child)?;
                let right = self.visit(right, child)?;
                Ok(self.out.binary(op, left, right, ty))
            }
        }
    }

    /// An effective conditional: tree-shake on a constant test, otherwise
    /// rewrite both branches, which must agree on their rewritten type.
    fn visit_conditional(
        &mut self,
        test: ExprId,
        if_true: ExprId,
        if_false: ExprId,
        flags: Flags,
    ) -> Result<ExprId, NotTranslatable> {
        let branch = flags.reenable();
        if let Some(value) = fold_bool(self.src, test) {
            trace!(test = value, "dropped dead conditional branch");
            let live = if value { if_true } else { if_false };
            return self.visit(live, branch);
        }

        let test = self.visit(test, flags.child())?;
        let if_true = self.visit(if_true, branch)?;
        let if_false = self.visit(if_false, branch)?;

        let true_ty = self.out.ty(if_true);
        let false_ty = self.out.ty(if_false);
        if true_ty != false_ty {
            let found = if true_ty == self.target {
                false_ty
            } else {
                true_ty
            };
            return Err(NotTranslatable::ResultType {
                expected: self.target,
                found,
            });
        }
        Ok(self.out.conditional(test, if_true, if_false))
    }

    /// Payload of a completed `Deferred<target>` construction with `args`,
    /// if `ty` and `args` have that shape.
    fn completed_payload(&self, ty: Idx, args: ExprRange) -> Option<ExprId> {
        if self.pool.deferred_result(ty) != Some(self.target) {
            return None;
        }
        match *self.src.get_expr_list(args) {
            [payload] if self.src.ty(payload) == self.target => Some(payload),
            _ => None,
        }
    }

    /// Whether `method` is `Deferred::from_result<target>`.
    fn is_factory(&self, method: MethodId) -> bool {
        let method = self.src.method(method);
        method.owner == Idx::DEFERRED_FACTORY
            && method.name == self.pool.well_known().from_result
            && method.type_args.as_slice() == [self.target]
    }

    fn visit_list(
        &mut self,
        range: ExprRange,
        flags: Flags,
    ) -> Result<SmallVec<[ExprId; 4]>, NotTranslatable> {
        let src = self.src;
        src.get_expr_list(range)
            .iter()
            .map(|arg| self.visit(*arg, flags))
            .collect()
    }
}
