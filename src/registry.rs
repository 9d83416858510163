//! # Specification Registry
//!
//! Holds the loaded contract documents behind an atomically-swapped
//! immutable snapshot. Readers (`resolve`) never take a lock: a reload
//! builds a complete new [`RegistrySnapshot`] off to the side and swaps it
//! in with one atomic store, so in-flight requests observe either wholly
//! the old state or wholly the new, never a partial mix.

use crate::error::RegistryError;
use crate::router::RouteTable;
use crate::spec::{load_document, SpecificationDocument};
use arc_swap::ArcSwap;
use http::Method;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// One contract that failed to load; recorded, never fatal for the others.
#[derive(Debug, Clone)]
pub struct LoadFailure {
    pub path: String,
    pub error: String,
}

/// A loaded contract plus its compiled route table.
#[derive(Debug)]
pub struct LoadedSpec {
    pub document: Arc<SpecificationDocument>,
    pub routes: RouteTable,
}

impl LoadedSpec {
    #[must_use]
    pub fn new(document: SpecificationDocument) -> Self {
        let routes = RouteTable::new(&document);
        LoadedSpec {
            document: Arc::new(document),
            routes,
        }
    }
}

/// Immutable view of every loaded contract at one point in time.
#[derive(Debug, Default)]
pub struct RegistrySnapshot {
    specs: HashMap<String, Arc<LoadedSpec>>,
    default_name: Option<String>,
    failures: Vec<LoadFailure>,
}

impl RegistrySnapshot {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<LoadedSpec>> {
        self.specs.get(name)
    }

    #[must_use]
    pub fn default_name(&self) -> Option<&str> {
        self.default_name.as_deref()
    }

    /// Documents that failed to parse during the load that produced this
    /// snapshot.
    #[must_use]
    pub fn failures(&self) -> &[LoadFailure] {
        &self.failures
    }

    /// Loaded spec names, sorted for stable listings.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.specs.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

/// The registry: a single atomically-updated snapshot reference.
#[derive(Debug, Default)]
pub struct SpecRegistry {
    snapshot: ArcSwap<RegistrySnapshot>,
}

impl SpecRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan `dir` for contract documents (`*.yaml`, `*.yml`, `*.json`),
    /// build a fresh snapshot, and swap it in atomically.
    ///
    /// Malformed documents are recorded in the snapshot's failure list and
    /// skipped; they never abort loading of the others. The default is the
    /// explicitly configured name when given (falling back with a warning
    /// if that name did not load), otherwise the first document in sorted
    /// file order.
    pub fn load_dir(
        &self,
        dir: impl AsRef<Path>,
        default: Option<&str>,
    ) -> Result<(), RegistryError> {
        let dir = dir.as_ref();
        let entries =
            std::fs::read_dir(dir).map_err(|source| RegistryError::SourceUnreadable {
                path: dir.display().to_string(),
                source,
            })?;

        let mut files: Vec<_> = entries
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| {
                matches!(
                    p.extension().and_then(|e| e.to_str()),
                    Some("yaml") | Some("yml") | Some("json")
                )
            })
            .collect();
        files.sort();

        let mut specs: HashMap<String, Arc<LoadedSpec>> = HashMap::new();
        let mut first_loaded: Option<String> = None;
        let mut failures = Vec::new();

        for path in &files {
            match load_document(path) {
                Ok(document) => {
                    let name = document.slug.clone();
                    if specs.contains_key(&name) {
                        warn!(spec = %name, path = %path.display(), "duplicate spec name, keeping first");
                        continue;
                    }
                    info!(
                        spec = %name,
                        path = %path.display(),
                        operations = document.operation_count(),
                        "specification loaded"
                    );
                    first_loaded.get_or_insert_with(|| name.clone());
                    specs.insert(name, Arc::new(LoadedSpec::new(document)));
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "specification failed to load");
                    failures.push(LoadFailure {
                        path: path.display().to_string(),
                        error: err.to_string(),
                    });
                }
            }
        }

        let default_name = match default {
            Some(name) if specs.contains_key(name) => Some(name.to_string()),
            Some(name) => {
                warn!(spec = %name, "configured default spec not loaded, using first");
                first_loaded
            }
            None => first_loaded,
        };

        info!(
            specs = specs.len(),
            failures = failures.len(),
            default = default_name.as_deref().unwrap_or("<none>"),
            "registry snapshot swapped"
        );

        self.snapshot.store(Arc::new(RegistrySnapshot {
            specs,
            default_name,
            failures,
        }));
        Ok(())
    }

    /// Install a snapshot built from in-memory documents; used by tests and
    /// embedding hosts that load contracts themselves.
    pub fn install(&self, documents: Vec<SpecificationDocument>, default: Option<&str>) {
        let mut specs = HashMap::new();
        let mut first = None;
        for document in documents {
            let name = document.slug.clone();
            first.get_or_insert_with(|| name.clone());
            specs.insert(name, Arc::new(LoadedSpec::new(document)));
        }
        let default_name = default
            .filter(|name| specs.contains_key(*name))
            .map(str::to_string)
            .or(first);
        self.snapshot.store(Arc::new(RegistrySnapshot {
            specs,
            default_name,
            failures: Vec::new(),
        }));
    }

    /// Resolve the requested spec, or the default when no name is given.
    pub fn resolve(&self, name: Option<&str>) -> Result<Arc<LoadedSpec>, RegistryError> {
        let snapshot = self.snapshot.load();
        match name {
            Some(name) => snapshot
                .specs
                .get(name)
                .map(Arc::clone)
                .ok_or_else(|| RegistryError::UnknownSpecification(name.to_string())),
            None => {
                let default = snapshot
                    .default_name
                    .as_deref()
                    .ok_or(RegistryError::NoSpecificationLoaded)?;
                snapshot
                    .specs
                    .get(default)
                    .map(Arc::clone)
                    .ok_or(RegistryError::NoSpecificationLoaded)
            }
        }
    }

    /// Current snapshot, for the management surface (listing specs and
    /// their endpoint inventories).
    #[must_use]
    pub fn snapshot(&self) -> Arc<RegistrySnapshot> {
        self.snapshot.load_full()
    }

    /// (spec, method, template) inventory across every loaded contract.
    #[must_use]
    pub fn endpoints(&self) -> Vec<(String, Method, String)> {
        let snapshot = self.snapshot.load();
        let mut out = Vec::new();
        let mut names: Vec<&String> = snapshot.specs.keys().collect();
        names.sort();
        for name in names {
            if let Some(spec) = snapshot.specs.get(name) {
                for (method, pattern) in spec.routes.endpoints() {
                    out.push((name.clone(), method, pattern));
                }
            }
        }
        out
    }
}
