//! Resolution from a project id to the backend that serves its documentation.
//!
//! Binding names are derived, not configured: a project `muxa` is always
//! served by the binding `MUXA_DOCS`. The full set of handles is built once
//! at start-up by walking the registry against the binding table, so a
//! missing binding surfaces immediately in the logs instead of as a runtime
//! probe on every request.

use crate::registry::ProjectRegistry;
use std::{collections::HashMap, sync::Arc};
use tracing::{error, warn};
use url::Url;

/// Suffix appended to the uppercased project id to form its binding name.
pub const BINDING_SUFFIX: &str = "_DOCS";

/// Derive the backend binding name for a project id, e.g. `muxa` into
/// `MUXA_DOCS`.
pub fn binding_name(project_id: &str) -> String {
    format!("{}{BINDING_SUFFIX}", project_id.to_ascii_uppercase())
}

/// A resolved capability to invoke one project's documentation backend.
#[derive(Debug, Clone)]
pub struct BackendHandle {
    project_id: String,
    binding_name: String,
    origin: Url,
}

impl BackendHandle {
    /// The project this handle serves.
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// The derived binding name the handle was resolved under.
    pub fn binding_name(&self) -> &str {
        &self.binding_name
    }

    /// The backend origin requests are sent to.
    pub fn origin(&self) -> &Url {
        &self.origin
    }
}

/// Maps project ids to [`BackendHandle`]s.
///
/// Resolution is two-stage: the registry decides whether an id is routable
/// at all, and the handle table decides whether a backend was wired up for
/// it. Both failures look identical to the caller (`None`) but produce
/// distinct log signals, since the second is a deployment misconfiguration.
#[derive(Debug)]
pub struct ServiceResolver {
    registry: Arc<ProjectRegistry>,
    handles: HashMap<String, BackendHandle>,
}

impl ServiceResolver {
    /// Build the handle table by deriving each registered project's binding
    /// name and looking it up in the binding table.
    pub fn new(registry: Arc<ProjectRegistry>, bindings: &HashMap<String, Url>) -> Self {
        let mut handles = HashMap::with_capacity(registry.len());
        for project in registry.projects() {
            let name = binding_name(&project.id);
            match bindings.get(&name) {
                Some(origin) => {
                    handles.insert(
                        project.id.clone(),
                        BackendHandle {
                            project_id: project.id.clone(),
                            binding_name: name,
                            origin: origin.clone(),
                        },
                    );
                }
                None => warn!(
                    project = %project.id,
                    binding = %name,
                    "project is registered but has no backend binding"
                ),
            }
        }
        Self { registry, handles }
    }

    /// Resolve a project id to its backend handle.
    ///
    /// Unknown ids return `None` immediately. Known ids with no wired
    /// backend also return `None` after logging the misconfiguration.
    pub fn resolve(&self, id: &str) -> Option<&BackendHandle> {
        self.registry.lookup(id)?;
        let handle = self.handles.get(id);
        if handle.is_none() {
            error!(
                project = %id,
                binding = %binding_name(id),
                "no backend binding exists for registered project"
            );
        }
        handle
    }

    /// The registry this resolver validates ids against.
    pub fn registry(&self) -> &ProjectRegistry {
        &self.registry
    }
}
