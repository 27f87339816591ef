//! Table-wide guarding: compose a guarded method table from a plain one.
//!
//! The table is the crate's stand-in for "every function defined directly
//! on a class": named function members with one shared signature, plus
//! nested tables. Guarding is a pure composition step: it builds a new
//! [`GuardedTable`] whose function members route through one shared
//! [`Guard`], instead of mutating anything in place. Nested tables are
//! carried over unguarded; guard them explicitly if that is wanted.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::Error;
use crate::guard::{CallError, Guard, Outcome};
use crate::mode::Mode;
use crate::raised::Raised;

/// A shared function member: one argument bundle in, one value out.
pub type MemberFn<A, T, E> = Arc<dyn Fn(A) -> Result<T, Raised<E>> + Send + Sync>;

/// One entry in a method table's namespace.
pub enum Member<A, T, E> {
    /// A plain function; the guard wraps these.
    Function(MemberFn<A, T, E>),
    /// A nested table; the guard leaves these untouched.
    Table(MethodTable<A, T, E>),
}

impl<A, T, E> Clone for Member<A, T, E> {
    fn clone(&self) -> Self {
        match self {
            Member::Function(f) => Member::Function(Arc::clone(f)),
            Member::Table(t) => Member::Table(t.clone()),
        }
    }
}

impl<A, T, E> core::fmt::Debug for Member<A, T, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Member::Function(_) => f.write_str("Member::Function"),
            Member::Table(t) => write!(f, "Member::Table({:?})", t.name()),
        }
    }
}

// ============================================================================
// MethodTable - the unguarded namespace
// ============================================================================

/// A named namespace of function members and nested tables.
///
/// ## Example
///
/// ```rust
/// use faultline::{raise, MethodTable, Raised};
///
/// #[derive(Debug)]
/// struct MathError;
///
/// impl std::fmt::Display for MathError {
///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
///         write!(f, "math error")
///     }
/// }
///
/// let table: MethodTable<i64, i64, MathError> = MethodTable::new("calc")
///     .function("double", |n| Ok(n * 2))
///     .function("recip", |n| {
///         if n == 0 { Err(raise(MathError)) } else { Ok(1 / n) }
///     });
/// assert_eq!(table.len(), 2);
/// ```
pub struct MethodTable<A, T, E> {
    name: String,
    members: BTreeMap<String, Member<A, T, E>>,
}

impl<A, T, E> MethodTable<A, T, E> {
    /// An empty table.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: BTreeMap::new(),
        }
    }

    /// Add a function member.
    pub fn function<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(A) -> Result<T, Raised<E>> + Send + Sync + 'static,
    {
        self.members
            .insert(name.into(), Member::Function(Arc::new(f)));
        self
    }

    /// Add a nested table member.
    pub fn nested(mut self, name: impl Into<String>, table: MethodTable<A, T, E>) -> Self {
        self.members.insert(name.into(), Member::Table(table));
        self
    }

    /// The table's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of members of any kind.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the table has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Look up a member by name.
    pub fn get(&self, name: &str) -> Option<&Member<A, T, E>> {
        self.members.get(name)
    }

    /// Iterate members in name order.
    pub fn members(&self) -> impl Iterator<Item = (&str, &Member<A, T, E>)> {
        self.members.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<A, T, E> Clone for MethodTable<A, T, E> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            members: self.members.clone(),
        }
    }
}

impl<A, T, E> core::fmt::Debug for MethodTable<A, T, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MethodTable")
            .field("name", &self.name)
            .field("members", &self.members.keys().collect::<Vec<_>>())
            .finish()
    }
}

// ============================================================================
// GuardedTable - the composed result
// ============================================================================

/// A method table whose function members all route through one shared guard.
///
/// Produced by [`guard_table`]; never mutated after composition. Nested
/// tables from the source table are reachable via
/// [`nested`](Self::nested) but remain unguarded.
pub struct GuardedTable<A, T, E> {
    guard: Arc<Guard>,
    name: String,
    functions: BTreeMap<String, MemberFn<A, T, E>>,
    nested: BTreeMap<String, MethodTable<A, T, E>>,
}

impl<A, T, E> GuardedTable<A, T, E> {
    /// The source table's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The shared guard's mode.
    pub fn mode(&self) -> Mode {
        self.guard.mode()
    }

    /// Names of the guarded function members, in name order.
    pub fn functions(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    /// Whether `name` is a guarded function member.
    pub fn is_guarded(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// A nested table carried over from the source, unguarded.
    pub fn nested(&self, name: &str) -> Option<&MethodTable<A, T, E>> {
        self.nested.get(name)
    }
}

impl<A, T, E: core::fmt::Display> GuardedTable<A, T, E> {
    /// Invoke a guarded function member by name.
    ///
    /// The failure behavior is the shared guard's mode, and the emitted
    /// report names the invoked member.
    pub fn invoke(&self, method: &str, args: A) -> Result<Outcome<T>, CallError<E>> {
        let Some(f) = self.functions.get(method) else {
            return Err(CallError::Fault(Error::NoSuchMethod {
                table: self.name.clone(),
                method: method.to_string(),
            }));
        };
        self.guard.call(method, || f(args))
    }
}

impl<A, T, E> core::fmt::Debug for GuardedTable<A, T, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GuardedTable")
            .field("name", &self.name)
            .field("mode", &self.guard.mode())
            .field("functions", &self.functions.keys().collect::<Vec<_>>())
            .field("nested", &self.nested.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Compose a guarded table: every function member of `table` is wrapped
/// with the shared `guard`; nested table members are carried over as-is.
pub fn guard_table<A, T, E>(table: MethodTable<A, T, E>, guard: Arc<Guard>) -> GuardedTable<A, T, E> {
    let mut functions = BTreeMap::new();
    let mut nested = BTreeMap::new();
    for (name, member) in table.members {
        match member {
            Member::Function(f) => {
                functions.insert(name, f);
            }
            Member::Table(t) => {
                nested.insert(name, t);
            }
        }
    }
    log::debug!(
        "guarded table \"{}\": {} functions wrapped, {} nested left as-is",
        table.name,
        functions.len(),
        nested.len()
    );
    GuardedTable {
        guard,
        name: table.name,
        functions,
        nested,
    }
}

/// Like [`guard_table`], but validates the member kind first: handing it a
/// bare function member is a wrap-target error.
pub fn guard_member<A, T, E>(
    member: Member<A, T, E>,
    guard: Arc<Guard>,
) -> Result<GuardedTable<A, T, E>, Error> {
    match member {
        Member::Table(table) => Ok(guard_table(table, guard)),
        Member::Function(_) => Err(Error::NotATable),
    }
}
