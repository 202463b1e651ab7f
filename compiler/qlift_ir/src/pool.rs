//! Runtime type pool.
//!
//! The pool is the runtime type system of qlift: every type a computation
//! tree or the shape cache talks about is interned here exactly once and
//! referenced by [`Idx`].
//!
//! # Layout
//!
//! - `types`: `TypeData` indexed by `Idx`; pre-interned types occupy
//!   `0..Idx::FIRST_DYNAMIC`
//! - `classes`: nominal class lookup by name
//! - `generics`: one intern table per [`Family`], keyed by the type-argument
//!   slice so a caller can probe with a borrowed `&[Idx]` (no allocation on
//!   the hit path)
//!
//! # Thread Safety
//! One `RwLock` guards the tables. Reads take the shared lock; interning a
//! new type re-checks under the write lock, so racing callers interning the
//! same shape agree on one `Idx`.

mod construct;
mod format;

use std::ops::Deref;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::{Idx, Name, StringInterner};

/// Generic type families the pool can instantiate.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum Family {
    /// `Deferred<R>`: the deferred-result wrapper. A value type.
    Deferred = 0,
    /// `AsyncSeq<T>`: the strongly-typed asynchronous sequence contract.
    AsyncSeq = 1,
    /// `Quote<F>`: a quoted lambda of function type `F`.
    Quote = 2,
    /// `Fn<P1..Pn, R>`: function shape; the last argument is the result.
    Function = 3,
    /// `Cast<S, T>`: element-cast adapter, implements `AsyncSeq<T>`.
    Cast = 4,
}

impl Family {
    /// Number of families (size of the per-family intern table array).
    pub const COUNT: usize = 5;

    /// Required number of type arguments, or `None` for variadic families.
    pub const fn fixed_arity(self) -> Option<usize> {
        match self {
            Family::Deferred | Family::AsyncSeq | Family::Quote => Some(1),
            Family::Cast => Some(2),
            Family::Function => None,
        }
    }

    /// Display name of the family.
    pub const fn name(self) -> &'static str {
        match self {
            Family::Deferred => "Deferred",
            Family::AsyncSeq => "AsyncSeq",
            Family::Quote => "Quote",
            Family::Function => "Fn",
            Family::Cast => "Cast",
        }
    }

    #[inline]
    const fn slot(self) -> usize {
        self as usize
    }
}

/// Interned type data.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum TypeData {
    Object,
    Bool,
    Int,
    Float,
    Str,
    Unit,
    Cancellation,
    UntypedSeq,
    DeferredFactory,
    /// Nominal reference type with a single base class.
    Class { name: Name, base: Idx },
    /// Instantiation of a generic family.
    Generic { family: Family, args: Arc<[Idx]> },
}

/// Names the rewriter and tree builders agree on.
#[derive(Copy, Clone, Debug)]
pub struct WellKnownNames {
    /// `Deferred::from_result`, the completed-result factory.
    pub from_result: Name,
}

struct PoolTable {
    types: Vec<TypeData>,
    classes: FxHashMap<Name, Idx>,
    generics: [FxHashMap<Arc<[Idx]>, Idx>; Family::COUNT],
}

impl PoolTable {
    fn with_primitives() -> Self {
        // Order must match the `Idx` constants.
        let types = vec![
            TypeData::Object,          // 0 = Idx::OBJECT
            TypeData::Bool,            // 1 = Idx::BOOL
            TypeData::Int,             // 2 = Idx::INT
            TypeData::Float,           // 3 = Idx::FLOAT
            TypeData::Str,             // 4 = Idx::STR
            TypeData::Unit,            // 5 = Idx::UNIT
            TypeData::Cancellation,    // 6 = Idx::CANCELLATION
            TypeData::UntypedSeq,      // 7 = Idx::UNTYPED_SEQ
            TypeData::DeferredFactory, // 8 = Idx::DEFERRED_FACTORY
        ];
        debug_assert_eq!(types.len(), Idx::FIRST_DYNAMIC as usize);

        Self {
            types,
            classes: FxHashMap::default(),
            generics: std::array::from_fn(|_| FxHashMap::default()),
        }
    }

    fn push(&mut self, data: TypeData) -> Idx {
        let raw = u32::try_from(self.types.len())
            .unwrap_or_else(|_| panic!("type pool exceeded u32::MAX types"));
        self.types.push(data);
        Idx::from_raw(raw)
    }

    #[inline]
    fn get(&self, idx: Idx) -> Option<&TypeData> {
        self.types.get(idx.index())
    }

    fn is_reference(&self, idx: Idx) -> bool {
        match self.get(idx) {
            Some(
                TypeData::Object
                | TypeData::Str
                | TypeData::UntypedSeq
                | TypeData::DeferredFactory
                | TypeData::Class { .. },
            ) => true,
            Some(TypeData::Generic { family, .. }) => *family != Family::Deferred,
            _ => false,
        }
    }

    fn is_assignable(&self, from: Idx, to: Idx) -> bool {
        if from == to || to == Idx::OBJECT {
            return self.get(from).is_some();
        }
        match self.get(from) {
            Some(TypeData::Class { base, .. }) => self.is_assignable(*base, to),
            Some(TypeData::Generic {
                family: Family::AsyncSeq,
                args,
            }) => self.is_sequence_of(args[0], to),
            Some(TypeData::Generic {
                family: Family::Cast,
                args,
            }) => self.is_sequence_of(args[1], to),
            _ => false,
        }
    }

    /// Whether a sequence producing `elem` can be used as `to`.
    fn is_sequence_of(&self, elem: Idx, to: Idx) -> bool {
        match self.get(to) {
            Some(TypeData::UntypedSeq) => true,
            Some(TypeData::Generic {
                family: Family::AsyncSeq,
                args,
            }) => elem == args[0] || (self.is_reference(elem) && self.is_assignable(elem, args[0])),
            _ => false,
        }
    }
}

/// Thread-safe interning pool of runtime types.
pub struct Pool {
    table: RwLock<PoolTable>,
    names: StringInterner,
    well_known: WellKnownNames,
}

impl Pool {
    /// Create a pool holding the pre-interned types.
    pub fn new() -> Self {
        let names = StringInterner::new();
        let well_known = WellKnownNames {
            from_result: names.intern("from_result"),
        };
        Self {
            table: RwLock::new(PoolTable::with_primitives()),
            names,
            well_known,
        }
    }

    /// The interner used for class, parameter and method names.
    #[inline]
    pub fn names(&self) -> &StringInterner {
        &self.names
    }

    /// Intern a name.
    #[inline]
    pub fn intern_name(&self, s: &str) -> Name {
        self.names.intern(s)
    }

    /// Names with a fixed meaning.
    #[inline]
    pub fn well_known(&self) -> &WellKnownNames {
        &self.well_known
    }

    /// Number of interned types.
    pub fn len(&self) -> usize {
        self.table.read().types.len()
    }

    /// Always `false`: the pre-interned types are present from creation.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether `idx` was produced by this pool.
    pub fn contains(&self, idx: Idx) -> bool {
        !idx.is_none() && idx.index() < self.len()
    }

    /// Type data for `idx`, or `None` for a handle this pool never produced.
    pub fn try_data(&self, idx: Idx) -> Option<TypeData> {
        self.table.read().get(idx).cloned()
    }

    /// Type data for `idx`.
    ///
    /// # Panics
    /// Panics if `idx` was not produced by this pool.
    pub fn data(&self, idx: Idx) -> TypeData {
        self.try_data(idx)
            .unwrap_or_else(|| panic!("{idx:?} is not a type of this pool"))
    }

    /// Declare (or look up) a class named `name` deriving from `base`.
    ///
    /// # Panics
    /// Panics if `base` is not `object` or a class, or if the class was
    /// already declared with a different base.
    pub fn class(&self, name: &str, base: Idx) -> Idx {
        let name = self.names.intern(name);

        {
            let guard = self.table.read();
            if let Some(&idx) = guard.classes.get(&name) {
                check_class_base(&guard, idx, base);
                return idx;
            }
        }

        let mut guard = self.table.write();
        if let Some(&idx) = guard.classes.get(&name) {
            check_class_base(&guard, idx, base);
            return idx;
        }
        assert!(
            matches!(
                guard.get(base),
                Some(TypeData::Object | TypeData::Class { .. })
            ),
            "class base must be `object` or a class, got {base:?}"
        );
        let idx = guard.push(TypeData::Class { name, base });
        guard.classes.insert(name, idx);
        idx
    }

    /// Base class of a class type.
    pub fn base_of(&self, idx: Idx) -> Option<Idx> {
        match self.table.read().get(idx) {
            Some(TypeData::Class { base, .. }) => Some(*base),
            _ => None,
        }
    }

    /// Look up an instantiation without interning it.
    pub fn lookup_generic(&self, family: Family, args: &[Idx]) -> Option<Idx> {
        self.table.read().generics[family.slot()].get(args).copied()
    }

    /// Intern the instantiation of `family` with `args`.
    ///
    /// # Panics
    /// Panics if the argument count does not fit the family, or if an
    /// argument was not produced by this pool.
    pub fn generic(&self, family: Family, args: &[Idx]) -> Idx {
        match family.fixed_arity() {
            Some(arity) => assert_eq!(
                args.len(),
                arity,
                "{} takes {arity} type argument(s)",
                family.name()
            ),
            None => assert!(!args.is_empty(), "function shape needs a result type"),
        }

        if let Some(idx) = self.lookup_generic(family, args) {
            return idx;
        }

        let mut guard = self.table.write();
        if let Some(&idx) = guard.generics[family.slot()].get(args) {
            return idx;
        }
        assert!(
            args.iter().all(|arg| guard.get(*arg).is_some()),
            "type arguments {args:?} are not all types of this pool"
        );
        let shared: Arc<[Idx]> = Arc::from(args);
        let idx = guard.push(TypeData::Generic {
            family,
            args: Arc::clone(&shared),
        });
        guard.generics[family.slot()].insert(shared, idx);
        idx
    }

    /// Type arguments of `idx` if it instantiates `family`.
    pub fn generic_args(&self, idx: Idx, family: Family) -> Option<Arc<[Idx]>> {
        match self.table.read().get(idx) {
            Some(TypeData::Generic { family: f, args }) if *f == family => Some(Arc::clone(args)),
            _ => None,
        }
    }

    /// Whether values of `idx` are references (nullable, covariant in sequences).
    pub fn is_reference_type(&self, idx: Idx) -> bool {
        self.table.read().is_reference(idx)
    }

    /// Whether a value of type `from` can be used where `to` is expected
    /// without conversion.
    pub fn is_assignable(&self, from: Idx, to: Idx) -> bool {
        if from.is_none() || to.is_none() {
            return false;
        }
        self.table.read().is_assignable(from, to)
    }
}

impl Default for Pool {
    fn default() -> Self {
        Self::new()
    }
}

fn check_class_base(table: &PoolTable, idx: Idx, base: Idx) {
    if let Some(TypeData::Class { base: existing, .. }) = table.get(idx) {
        assert_eq!(
            *existing, base,
            "class {idx:?} redeclared with a different base"
        );
    }
}

/// Shared pool handle for callers that outlive a single borrow.
///
/// The shape cache and the sequences it builds hold one of these so lazily
/// enumerated streams can still check element types.
#[derive(Clone)]
pub struct SharedPool(Arc<Pool>);

impl SharedPool {
    /// Create a new shared pool.
    pub fn new() -> Self {
        SharedPool(Arc::new(Pool::new()))
    }

    /// Whether both handles refer to the same pool.
    pub fn ptr_eq(&self, other: &SharedPool) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for SharedPool {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for SharedPool {
    type Target = Pool;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
