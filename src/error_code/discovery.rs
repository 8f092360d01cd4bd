//! Discovery of error-code types.
//!
//! The registry never enumerates types itself. It asks a [`TypeDiscovery`]
//! for the candidate types under each discovery root and inspects them
//! through the [`CandidateType`] interface. [`StaticDiscovery`] is the
//! in-process implementation: services register their error-code enums once
//! and roots select them by module path.

use crate::error_code::ErrorCode;
use std::sync::Arc;
use thiserror::Error;

/// Failure to read the values of a candidate type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscoveryError {
    #[error("Type '{type_name}' exposes no enumerated values")]
    NoEnumeration { type_name: String },

    #[error("Could not enumerate values of '{type_name}': {reason}")]
    EnumerationFailed { type_name: String, reason: String },
}

/// A type found under a discovery root.
pub trait CandidateType: Send + Sync {
    /// Fully qualified type name, e.g. `orders::errors::OrderErrorCode`.
    fn type_name(&self) -> &str;

    /// Whether the type implements the error-code capability.
    fn implements_error_code(&self) -> bool;

    /// Every value the type declares.
    fn values(&self) -> Result<Vec<&'static dyn ErrorCode>, DiscoveryError>;
}

/// Finds candidate types under a discovery root.
pub trait TypeDiscovery {
    fn discover(&self, root: &str) -> Vec<Arc<dyn CandidateType>>;
}

/// An enum of error codes with a fixed set of values.
///
/// Implemented by [`error_codes!`](crate::error_codes).
pub trait ErrorCodeEnum: ErrorCode + Sized {
    /// Every variant, in declaration order.
    const VALUES: &'static [Self];

    /// Fully qualified type name.
    const TYPE_NAME: &'static str;

    /// Discovery handle for this enum.
    fn type_handle() -> TypeHandle {
        TypeHandle {
            type_name: Self::TYPE_NAME.to_string(),
            kind: HandleKind::ErrorCode(Some(values_of::<Self> as ValuesFn)),
        }
    }
}

fn values_of<E: ErrorCodeEnum>() -> Vec<&'static dyn ErrorCode> {
    E::VALUES.iter().map(|v| v as &'static dyn ErrorCode).collect()
}

type ValuesFn = fn() -> Vec<&'static dyn ErrorCode>;

#[derive(Debug, Clone)]
enum HandleKind {
    Other,
    ErrorCode(Option<ValuesFn>),
}

/// A [`CandidateType`] backed by a plain function pointer.
#[derive(Debug, Clone)]
pub struct TypeHandle {
    type_name: String,
    kind: HandleKind,
}

impl TypeHandle {
    /// Handle for an error-code enum.
    pub fn of<E: ErrorCodeEnum>() -> Self {
        E::type_handle()
    }

    /// Handle for a type that does not implement the error-code capability.
    pub fn other(type_name: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            kind: HandleKind::Other,
        }
    }

    /// Handle for a type that implements the capability but has no
    /// enumerable values (e.g. a struct carrying a runtime code).
    pub fn without_values(type_name: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            kind: HandleKind::ErrorCode(None),
        }
    }
}

impl CandidateType for TypeHandle {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn implements_error_code(&self) -> bool {
        matches!(self.kind, HandleKind::ErrorCode(_))
    }

    fn values(&self) -> Result<Vec<&'static dyn ErrorCode>, DiscoveryError> {
        match self.kind {
            HandleKind::ErrorCode(Some(values)) => Ok(values()),
            HandleKind::ErrorCode(None) | HandleKind::Other => Err(DiscoveryError::NoEnumeration {
                type_name: self.type_name.clone(),
            }),
        }
    }
}

/// Discovery over an explicitly registered set of types.
///
/// A root selects every type whose module path equals it or lies beneath it.
/// Roots may use `::` or `.` as separator; an empty root selects everything.
#[derive(Clone, Default)]
pub struct StaticDiscovery {
    types: Vec<Arc<dyn CandidateType>>,
}

impl StaticDiscovery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an error-code enum.
    pub fn register<E: ErrorCodeEnum>(self) -> Self {
        self.with_candidate(TypeHandle::of::<E>())
    }

    pub fn with_candidate(mut self, candidate: impl CandidateType + 'static) -> Self {
        self.types.push(Arc::new(candidate));
        self
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeDiscovery for StaticDiscovery {
    fn discover(&self, root: &str) -> Vec<Arc<dyn CandidateType>> {
        let root = root.trim().replace('.', "::");
        let nested = format!("{}::", root);
        self.types
            .iter()
            .filter(|t| {
                let name = t.type_name();
                root.is_empty() || name == root || name.starts_with(&nested)
            })
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::error_codes! {
        enum ProbeCode {
            E0000900001 => ("probe one"),
            E0000900002 => ("probe two"),
        }
    }

    fn names(found: &[Arc<dyn CandidateType>]) -> Vec<String> {
        found.iter().map(|t| t.type_name().to_string()).collect()
    }

    // ==================== TypeHandle Tests ====================

    #[test]
    fn test_handle_of_enum() {
        let handle = TypeHandle::of::<ProbeCode>();
        assert!(handle.implements_error_code());
        assert!(handle.type_name().ends_with("::ProbeCode"));

        let values = handle.values().unwrap();
        let names: Vec<_> = values.iter().map(|v| v.name()).collect();
        assert_eq!(names, vec!["E0000900001", "E0000900002"]);
    }

    #[test]
    fn test_handle_other() {
        let handle = TypeHandle::other("app::model::User");
        assert!(!handle.implements_error_code());
    }

    #[test]
    fn test_handle_without_values() {
        let handle = TypeHandle::without_values("app::errors::Dynamic");
        assert!(handle.implements_error_code());
        assert_eq!(
            handle.values().unwrap_err(),
            DiscoveryError::NoEnumeration {
                type_name: "app::errors::Dynamic".to_string()
            }
        );
    }

    // ==================== StaticDiscovery Tests ====================

    #[test]
    fn test_discover_by_module_root() {
        let discovery = StaticDiscovery::new()
            .with_candidate(TypeHandle::other("orders::errors::OrderErrorCode"))
            .with_candidate(TypeHandle::other("orders_v2::errors::Other"))
            .with_candidate(TypeHandle::other("billing::Errors"));

        assert_eq!(
            names(&discovery.discover("orders")),
            vec!["orders::errors::OrderErrorCode"]
        );
        assert_eq!(
            names(&discovery.discover("orders.errors")),
            vec!["orders::errors::OrderErrorCode"]
        );
        assert_eq!(names(&discovery.discover("billing::Errors")), vec!["billing::Errors"]);
        assert!(discovery.discover("shipping").is_empty());
    }

    #[test]
    fn test_discover_empty_root_matches_all() {
        let discovery = StaticDiscovery::new()
            .register::<ProbeCode>()
            .with_candidate(TypeHandle::other("x::Y"));
        assert_eq!(discovery.discover("").len(), 2);
        assert_eq!(discovery.len(), 2);
    }
}
