//! Error-code registry: every discovered code, indexed by numeric value.
//!
//! The registry is built by a single scan over the discovery roots and is
//! immutable afterwards. Services hold it through [`SharedRegistry`], which
//! swaps in a freshly built registry as one pointer update, so readers always
//! see a complete table.

use crate::error_code::discovery::TypeDiscovery;
use crate::error_code::{namespace_prefix, ErrorCode, MalformedName};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Fatal scan failure.
#[derive(Debug, Error)]
pub enum ScanError {
    /// An error-code name without a parseable numeric part. Code identity is
    /// part of every service's API contract, so startup must not continue.
    #[error("Error code type '{type_name}' declares a malformed code: {source}")]
    MalformedErrorCodeName {
        type_name: String,
        #[source]
        source: MalformedName,
    },
}

/// Recoverable problem found during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanDiagnostic {
    /// Two declarations share a numeric code; the first one was kept.
    DuplicateErrorCode {
        code: u64,
        first_type: String,
        duplicate_type: String,
    },

    /// Two types declare codes in the same six-digit namespace.
    PrefixNamespaceCollision {
        prefix: String,
        type_name: String,
        claimed_by: String,
    },

    /// A type implements the capability but its values could not be read.
    EnumerationAccessFailure { type_name: String, reason: String },
}

impl fmt::Display for ScanDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanDiagnostic::DuplicateErrorCode {
                code,
                first_type,
                duplicate_type,
            } => write!(
                f,
                "Duplicate error code [{}] in {} and {}",
                code, first_type, duplicate_type
            ),
            ScanDiagnostic::PrefixNamespaceCollision {
                prefix,
                type_name,
                claimed_by,
            } => write!(
                f,
                "Error code prefix [E{}] used by both {} and {}",
                prefix, type_name, claimed_by
            ),
            ScanDiagnostic::EnumerationAccessFailure { type_name, reason } => {
                write!(f, "Skipped error code type {}: {}", type_name, reason)
            }
        }
    }
}

/// One code in the registry together with its declaring type.
#[derive(Debug, Clone)]
pub struct RegisteredCode {
    pub code: u64,
    pub type_name: String,
    pub error_code: &'static dyn ErrorCode,
}

impl RegisteredCode {
    pub fn name(&self) -> &'static str {
        self.error_code.name()
    }

    pub fn local_message(&self) -> &'static str {
        self.error_code.local_message()
    }

    pub fn default_message(&self) -> &'static str {
        self.error_code.default_message()
    }
}

/// Immutable table of every discovered error code.
#[derive(Debug, Clone, Default)]
pub struct ErrorCodeRegistry {
    codes: BTreeMap<u64, RegisteredCode>,
    diagnostics: Vec<ScanDiagnostic>,
}

impl ErrorCodeRegistry {
    /// Scan every root and build a registry.
    ///
    /// A type reachable from several roots is scanned once. Duplicate codes,
    /// namespace collisions and unreadable types are logged and recorded as
    /// [`ScanDiagnostic`]s; only a malformed code name fails the scan.
    pub fn scan<D, S>(roots: &[S], discovery: &D) -> Result<Self, ScanError>
    where
        D: TypeDiscovery + ?Sized,
        S: AsRef<str>,
    {
        let mut codes: BTreeMap<u64, RegisteredCode> = BTreeMap::new();
        let mut diagnostics = Vec::new();
        let mut prefix_owners: HashMap<String, String> = HashMap::new();
        let mut scanned_types: HashSet<String> = HashSet::new();

        for root in roots {
            let root = root.as_ref();
            let candidates = discovery.discover(root);
            debug!(root, candidates = candidates.len(), "Scanning for error codes");

            for candidate in candidates {
                if !candidate.implements_error_code() {
                    continue;
                }

                let type_name = candidate.type_name().to_string();
                if !scanned_types.insert(type_name.clone()) {
                    continue;
                }
                info!(type_name = %type_name, "Found error code type");

                let values = match candidate.values() {
                    Ok(values) => values,
                    Err(e) => {
                        warn!(type_name = %type_name, "Skipping error code type: {}", e);
                        diagnostics.push(ScanDiagnostic::EnumerationAccessFailure {
                            type_name,
                            reason: e.to_string(),
                        });
                        continue;
                    }
                };

                let mut prefixes = BTreeSet::new();
                for value in values {
                    let code = value
                        .try_code()
                        .map_err(|source| ScanError::MalformedErrorCodeName {
                            type_name: type_name.clone(),
                            source,
                        })?;
                    prefixes.insert(namespace_prefix(code));
                    debug!(code, message = value.local_message(), "Found error code");

                    match codes.entry(code) {
                        Entry::Occupied(existing) => {
                            let first_type = existing.get().type_name.clone();
                            error!(
                                code,
                                "Duplicate error code [{}] in {} and {}",
                                code,
                                first_type,
                                type_name
                            );
                            diagnostics.push(ScanDiagnostic::DuplicateErrorCode {
                                code,
                                first_type,
                                duplicate_type: type_name.clone(),
                            });
                        }
                        Entry::Vacant(slot) => {
                            slot.insert(RegisteredCode {
                                code,
                                type_name: type_name.clone(),
                                error_code: value,
                            });
                        }
                    }
                }

                for prefix in prefixes {
                    match prefix_owners.get(&prefix) {
                        Some(owner) if *owner != type_name => {
                            warn!(
                                prefix = %prefix,
                                "Error code prefix [E{}] used by both {} and {}",
                                prefix,
                                type_name,
                                owner
                            );
                            diagnostics.push(ScanDiagnostic::PrefixNamespaceCollision {
                                prefix,
                                type_name: type_name.clone(),
                                claimed_by: owner.clone(),
                            });
                        }
                        Some(_) => {}
                        None => {
                            prefix_owners.insert(prefix, type_name.clone());
                        }
                    }
                }
            }
        }

        info!(
            codes = codes.len(),
            types = scanned_types.len(),
            diagnostics = diagnostics.len(),
            "Error code scan complete"
        );

        Ok(Self { codes, diagnostics })
    }

    pub fn get(&self, code: u64) -> Option<&RegisteredCode> {
        self.codes.get(&code)
    }

    pub fn contains(&self, code: u64) -> bool {
        self.codes.contains_key(&code)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// All codes, ascending.
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredCode> {
        self.codes.values()
    }

    /// All numeric codes, ascending.
    pub fn codes(&self) -> impl Iterator<Item = u64> + '_ {
        self.codes.keys().copied()
    }

    /// Codes grouped by declaring type; each group is sorted by code.
    pub fn by_type(&self) -> BTreeMap<&str, Vec<&RegisteredCode>> {
        let mut groups: BTreeMap<&str, Vec<&RegisteredCode>> = BTreeMap::new();
        for entry in self.codes.values() {
            groups.entry(entry.type_name.as_str()).or_default().push(entry);
        }
        groups
    }

    /// Problems recorded during the scan, in discovery order.
    pub fn diagnostics(&self) -> &[ScanDiagnostic] {
        &self.diagnostics
    }
}

/// Shared handle to the current registry.
///
/// Readers take a snapshot with [`load`](SharedRegistry::load) and keep using
/// it even if a new registry is published meanwhile.
#[derive(Debug, Default)]
pub struct SharedRegistry {
    current: RwLock<Arc<ErrorCodeRegistry>>,
}

impl SharedRegistry {
    pub fn new(registry: ErrorCodeRegistry) -> Self {
        Self {
            current: RwLock::new(Arc::new(registry)),
        }
    }

    /// Current snapshot.
    pub fn load(&self) -> Arc<ErrorCodeRegistry> {
        // The lock only guards a pointer swap, so a poisoned lock still holds a valid registry.
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Replace the current registry.
    pub fn publish(&self, registry: ErrorCodeRegistry) -> Arc<ErrorCodeRegistry> {
        let registry = Arc::new(registry);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::clone(&registry);
        registry
    }

    /// Build a new registry and publish it. On failure the current registry stays.
    pub fn rescan<D, S>(&self, roots: &[S], discovery: &D) -> Result<Arc<ErrorCodeRegistry>, ScanError>
    where
        D: TypeDiscovery + ?Sized,
        S: AsRef<str>,
    {
        let registry = ErrorCodeRegistry::scan(roots, discovery)?;
        Ok(self.publish(registry))
    }
}
