//! Host binding: how the evaluator reaches into host objects.
//!
//! The evaluator never inspects host values itself. Member access, indexers and
//! method calls all go through a [`HostBinding`]; [`ObjectBinding`] is the
//! default one, which resolves against [`HostObject`] implementations and the
//! built-in members of strings, numbers, sequences, date-times and durations.

use std::any::Any;
use std::cmp::Ordering;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use tracing::trace;

use crate::error::EvalError;
use crate::value::Value;

pub mod intrinsics;
pub mod record;

pub use record::Record;

/// Resolves member, index and method access on behalf of the evaluator.
///
/// Arguments arrive fully evaluated. Implementations are expected to be
/// stateless or internally synchronised so one binding can serve concurrent
/// evaluations.
pub trait HostBinding {
    /// Property or field `name` of `instance`.
    fn get_member(&self, instance: &Value, name: &str) -> Result<Value, EvalError>;

    /// Indexer access `instance[args...]`.
    fn get_index(&self, instance: &Value, args: &[Value]) -> Result<Value, EvalError>;

    /// Method call `instance.name(args...)`, resolved by name and argument count.
    fn invoke(&self, instance: &Value, name: &str, args: &[Value]) -> Result<Value, EvalError>;
}

/// A host type exposed to expressions.
///
/// Every hook has a default that declines, so an implementation only writes
/// the capabilities it has. `None` from a hook means "not found here" and lets
/// the binding fall back or report the miss.
pub trait HostObject: Any + fmt::Debug + Send + Sync {
    fn type_name(&self) -> &str;

    /// Direct key lookup for mapping-shaped objects. Tried before [`member`](Self::member).
    fn entry(&self, _key: &str) -> Option<Value> {
        None
    }

    /// Whether indexing goes through [`entry`](Self::entry) with the key's text.
    fn is_mapping(&self) -> bool {
        false
    }

    /// Property or field by name.
    fn member(&self, _name: &str) -> Option<Value> {
        None
    }

    fn index(&self, _args: &[Value]) -> Option<Result<Value, EvalError>> {
        None
    }

    /// Method call. See [`dispatch`] for table-driven resolution.
    fn invoke(&self, _name: &str, _args: &[Value]) -> Option<Result<Value, EvalError>> {
        None
    }

    /// Natural ordering against another value, if the types are compatible.
    fn natural_cmp(&self, _other: &Value) -> Option<Ordering> {
        None
    }

    fn structural_eq(&self, _other: &dyn HostObject) -> bool {
        false
    }

    fn to_text(&self) -> String {
        self.type_name().to_string()
    }
}

/// Shared handle to a host object.
///
/// Clones share the object; identity is pointer identity.
#[derive(Clone)]
pub struct HostRef(Arc<dyn HostObject>);

impl HostRef {
    pub fn new<T: HostObject>(object: T) -> Self {
        HostRef(Arc::new(object))
    }

    pub fn from_arc(object: Arc<dyn HostObject>) -> Self {
        HostRef(object)
    }

    pub fn ptr_eq(&self, other: &HostRef) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }

    pub fn downcast_ref<T: HostObject>(&self) -> Option<&T> {
        let any: &dyn Any = self.0.as_ref();
        any.downcast_ref::<T>()
    }
}

impl Deref for HostRef {
    type Target = dyn HostObject;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl fmt::Debug for HostRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl PartialEq for HostRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.0.structural_eq(other.0.as_ref())
    }
}

/// One entry of a method table.
pub struct Method<T: ?Sized> {
    pub name: &'static str,
    pub arity: usize,
    pub call: fn(&T, &[Value]) -> Result<Value, EvalError>,
}

/// Calls the first method in `table` whose name and arity match.
///
/// Argument types play no part in the choice: two overloads with the same
/// arity cannot be told apart, and the earlier one always wins.
pub fn dispatch<T: ?Sized>(
    target: &T,
    table: &[Method<T>],
    name: &str,
    args: &[Value],
) -> Option<Result<Value, EvalError>> {
    table
        .iter()
        .find(|method| method.name == name && method.arity == args.len())
        .map(|method| (method.call)(target, args))
}

/// Default binding over [`HostObject`]s and built-in values.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectBinding;

impl ObjectBinding {
    pub fn new() -> Self {
        ObjectBinding
    }
}

fn null_reference(access: String) -> EvalError {
    EvalError::NullReference { access }
}

/// Position argument of a sequence or string indexer. Text that is not a
/// number is rejected rather than read as 0.
fn index_arg(index: &Value) -> Result<i32, EvalError> {
    if index.to_number().is_nan() {
        return Err(EvalError::InvalidArgument(format!(
            "index {} is not a number",
            index.to_literal().unwrap_or_else(|| index.type_name().to_string())
        )));
    }
    Ok(index.to_i32())
}

impl HostBinding for ObjectBinding {
    fn get_member(&self, instance: &Value, name: &str) -> Result<Value, EvalError> {
        trace!(target_type = instance.type_name(), member = name, "get_member");

        let found = match instance {
            Value::Null => return Err(null_reference(format!("get property {}", name))),
            Value::Opaque(host) => host.entry(name).or_else(|| host.member(name)),
            other => intrinsics::member(other, name),
        };

        found.ok_or_else(|| EvalError::UnknownMember {
            type_name: instance.type_name().to_string(),
            name: name.to_string(),
        })
    }

    fn get_index(&self, instance: &Value, args: &[Value]) -> Result<Value, EvalError> {
        trace!(target_type = instance.type_name(), arity = args.len(), "get_index");

        let no_indexer = || EvalError::NoIndexer {
            type_name: instance.type_name().to_string(),
        };

        match (instance, args) {
            (Value::Null, _) => Err(null_reference("get index value".to_string())),
            (Value::Sequence(items), [index]) => {
                let i = index_arg(index)?;
                usize::try_from(i)
                    .ok()
                    .and_then(|i| items.get(i))
                    .cloned()
                    .ok_or(EvalError::IndexOutOfRange {
                        index: i as i64,
                        len: items.len(),
                    })
            }
            (Value::String(s), [index]) => {
                let i = index_arg(index)?;
                usize::try_from(i)
                    .ok()
                    .and_then(|i| s.chars().nth(i))
                    .map(|c| Value::String(c.to_string()))
                    .ok_or(EvalError::IndexOutOfRange {
                        index: i as i64,
                        len: s.chars().count(),
                    })
            }
            (Value::Opaque(host), [key]) if host.is_mapping() => {
                let key = key.to_text();
                host.entry(&key).ok_or(EvalError::KeyNotFound { key })
            }
            (Value::Opaque(host), args) => host.index(args).unwrap_or_else(|| Err(no_indexer())),
            _ => Err(no_indexer()),
        }
    }

    fn invoke(&self, instance: &Value, name: &str, args: &[Value]) -> Result<Value, EvalError> {
        trace!(target_type = instance.type_name(), method = name, arity = args.len(), "invoke");

        let found = match instance {
            Value::Null => return Err(null_reference(format!("invoke method {}", name))),
            Value::Opaque(host) => host
                .invoke(name, args)
                .or_else(|| intrinsics::invoke(instance, name, args)),
            other => intrinsics::invoke(other, name, args),
        };

        found.unwrap_or_else(|| {
            Err(EvalError::UnknownMethod {
                type_name: instance.type_name().to_string(),
                name: name.to_string(),
                arity: args.len(),
            })
        })
    }
}

/// A binding borrowed by several evaluators.
impl<B: HostBinding + ?Sized> HostBinding for &B {
    fn get_member(&self, instance: &Value, name: &str) -> Result<Value, EvalError> {
        (**self).get_member(instance, name)
    }

    fn get_index(&self, instance: &Value, args: &[Value]) -> Result<Value, EvalError> {
        (**self).get_index(instance, args)
    }

    fn invoke(&self, instance: &Value, name: &str, args: &[Value]) -> Result<Value, EvalError> {
        (**self).invoke(instance, name, args)
    }
}
