use super::*;
use pretty_assertions::assert_eq;

/// `x => x + 1` over `int`, in a fresh arena.
fn increment_lambda(pool: &Pool) -> (ExprArena, ExprId) {
    let mut arena = ExprArena::new();
    let x = arena.declare_param(pool.intern_name("x"), Idx::INT);
    let x_ref = arena.param_ref(x);
    let one = arena.constant(ConstValue::Int(1), Idx::INT);
    let sum = arena.binary(BinaryOp::Add, x_ref, one, Idx::INT);
    let lambda = arena.lambda(pool, &[x], sum);
    (arena, lambda)
}

#[test]
fn push_and_read_back() {
    let mut arena = ExprArena::new();
    let id = arena.constant(ConstValue::Bool(true), Idx::BOOL);
    assert_eq!(*arena.kind(id), ExprKind::Constant(ConstValue::Bool(true)));
    assert_eq!(arena.ty(id), Idx::BOOL);
    assert_eq!(arena.get(id), Expr::new(ExprKind::Constant(ConstValue::Bool(true)), Idx::BOOL));
    assert_eq!(arena.len(), 1);
}

#[test]
fn empty_lists_use_empty_ranges() {
    let mut arena = ExprArena::new();
    assert_eq!(arena.push_expr_list(&[]), ExprRange::EMPTY);
    assert_eq!(arena.push_param_list(&[]), ParamRange::EMPTY);
    assert!(arena.get_expr_list(ExprRange::EMPTY).is_empty());
}

#[test]
fn lambda_is_typed_as_function_shape() {
    let pool = Pool::new();
    let (arena, lambda) = increment_lambda(&pool);
    assert_eq!(arena.ty(lambda), pool.function(&[Idx::INT], Idx::INT));

    let (params, body) = arena.as_lambda(lambda).unwrap_or_else(|| panic!("not a lambda"));
    assert_eq!(params.len(), 1);
    assert_eq!(arena.param(params[0]).ty, Idx::INT);
    assert_eq!(arena.ty(body), Idx::INT);
}

#[test]
fn quote_wraps_lambda_type() {
    let pool = Pool::new();
    let (mut arena, lambda) = increment_lambda(&pool);
    let quoted = arena.quote(&pool, lambda);
    assert_eq!(pool.quoted_function(arena.ty(quoted)), Some(arena.ty(lambda)));
    assert_eq!(*arena.kind(quoted), ExprKind::Quote(lambda));
}

#[test]
fn call_records_method_and_args() {
    let pool = Pool::new();
    let mut arena = ExprArena::new();
    let s = arena.constant(ConstValue::Str(pool.intern_name("abc")), Idx::STR);
    let method = MethodRef::new(Idx::STR, pool.intern_name("len"));
    let call = arena.call(s, method.clone(), &[], Idx::INT);

    let ExprKind::Call { receiver, method: id, args } = *arena.kind(call) else {
        panic!("expected a call");
    };
    assert_eq!(receiver, s);
    assert_eq!(arena.method(id), &method);
    assert!(args.is_empty());
}

#[test]
fn same_shape_across_arenas() {
    let pool = Pool::new();
    let (a, la) = increment_lambda(&pool);
    let (b, lb) = increment_lambda(&pool);
    assert!(a.same_shape(la, &b, lb));

    let mut c = ExprArena::new();
    let x = c.declare_param(pool.intern_name("x"), Idx::INT);
    let x_ref = c.param_ref(x);
    let two = c.constant(ConstValue::Int(2), Idx::INT);
    let sum = c.binary(BinaryOp::Add, x_ref, two, Idx::INT);
    let lc = c.lambda(&pool, &[x], sum);
    assert!(!a.same_shape(la, &c, lc));
}

#[test]
fn same_shape_distinguishes_parameter_names() {
    let pool = Pool::new();
    let mut a = ExprArena::new();
    let x = a.declare_param(pool.intern_name("x"), Idx::INT);
    let xa = a.param_ref(x);

    let mut b = ExprArena::new();
    let y = b.declare_param(pool.intern_name("y"), Idx::INT);
    let yb = b.param_ref(y);

    assert!(!a.same_shape(xa, &b, yb));
}
