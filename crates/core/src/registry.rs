//! The static table of documentation projects routable by the server.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A documentation unit routable under `/{id}/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Unique lowercase URL-safe identifier, also the leading path segment
    /// requests are matched against.
    pub id: String,
    /// Human-readable name shown on the landing page.
    pub name: String,
    /// Short description shown on the landing page.
    pub description: String,
}

/// Read-only mapping from project id to [`Project`], preserving the order
/// projects were declared in.
///
/// Built once at start-up and never mutated afterwards, so it can be shared
/// across concurrent requests without synchronization.
#[derive(Debug)]
pub struct ProjectRegistry {
    projects: Vec<Project>,
    index: HashMap<String, usize>,
}

impl ProjectRegistry {
    /// Create a registry from a list of projects, validating that every id
    /// is non-empty, lowercase URL-safe and unique.
    pub fn new(projects: Vec<Project>) -> Result<Self> {
        let mut index = HashMap::with_capacity(projects.len());
        for (position, project) in projects.iter().enumerate() {
            if project.id.is_empty() {
                bail!("project at position {position} has an empty id");
            }
            if !project.id.chars().all(is_id_char) {
                bail!(
                    "project id '{}' contains characters outside of [a-z0-9._~-]",
                    project.id
                );
            }
            if index.insert(project.id.clone(), position).is_some() {
                bail!("duplicate project id '{}'", project.id);
            }
        }
        Ok(Self { projects, index })
    }

    /// Look up a project by exact, case-sensitive id.
    pub fn lookup(&self, id: &str) -> Option<&Project> {
        self.index.get(id).map(|&position| &self.projects[position])
    }

    /// All projects in declaration order.
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// Number of registered projects.
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    /// Whether the registry contains no projects.
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

fn is_id_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_' | '.' | '~')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(id: &str) -> Project {
        Project {
            id: id.to_owned(),
            name: id.to_uppercase(),
            description: format!("Docs for {id}"),
        }
    }

    #[test]
    fn lookup_is_exact_and_case_sensitive() {
        let registry = ProjectRegistry::new(vec![project("muxa")]).unwrap();
        assert_eq!(registry.lookup("muxa").unwrap().id, "muxa");
        assert!(registry.lookup("MUXA").is_none());
        assert!(registry.lookup("mux").is_none());
        assert!(registry.lookup("muxa2").is_none());
    }

    #[test]
    fn declaration_order_is_preserved() {
        let registry =
            ProjectRegistry::new(vec![project("zeta"), project("alpha"), project("mid")]).unwrap();
        let ids: Vec<&str> = registry.projects().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        assert!(ProjectRegistry::new(vec![project("muxa"), project("muxa")]).is_err());
    }

    #[test]
    fn invalid_ids_are_rejected() {
        assert!(ProjectRegistry::new(vec![project("")]).is_err());
        assert!(ProjectRegistry::new(vec![project("Muxa")]).is_err());
        assert!(ProjectRegistry::new(vec![project("mu/xa")]).is_err());
        assert!(ProjectRegistry::new(vec![project("mu xa")]).is_err());
        assert!(ProjectRegistry::new(vec![project("mu-xa_0.9~")]).is_ok());
    }
}
