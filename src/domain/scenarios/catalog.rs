//! Scenario catalog and starter menu.
//!
//! Built-in scenarios are embedded in the binary via `include_str!` and
//! parsed once per process. Every scenario is validated before the catalog is
//! handed out, so a defective script fails at startup, never mid-conversation.

use std::collections::BTreeMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use thiserror::Error;

use super::document::{ScenarioDocument, StarterDocument};
use crate::domain::conversation::{Scenario, ScriptError};
use crate::domain::foundation::{DomainError, ErrorCode, ScenarioId};

/// Built-in scenario sources as `(file name, yaml)`.
pub const BUILTIN_SCENARIOS: &[(&str, &str)] = &[
    (
        "vpn-connection.yaml",
        include_str!("../../../scenarios/vpn-connection.yaml"),
    ),
    (
        "calendar-sync.yaml",
        include_str!("../../../scenarios/calendar-sync.yaml"),
    ),
    (
        "ticket-status.yaml",
        include_str!("../../../scenarios/ticket-status.yaml"),
    ),
    (
        "ticket-resolution.yaml",
        include_str!("../../../scenarios/ticket-resolution.yaml"),
    ),
    (
        "ticket-summary.yaml",
        include_str!("../../../scenarios/ticket-summary.yaml"),
    ),
    (
        "phishing-report.yaml",
        include_str!("../../../scenarios/phishing-report.yaml"),
    ),
    (
        "kb-article.yaml",
        include_str!("../../../scenarios/kb-article.yaml"),
    ),
];

/// Built-in starter menu.
pub const BUILTIN_STARTERS: &str = include_str!("../../../scenarios/starters.yaml");

static BUILTIN: Lazy<Result<Arc<ScenarioCatalog>, CatalogError>> = Lazy::new(|| {
    ScenarioCatalog::from_sources(BUILTIN_SCENARIOS, BUILTIN_STARTERS).map(Arc::new)
});

/// Errors raised while loading a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("failed to parse {source_name}: {message}")]
    Parse {
        source_name: String,
        message: String,
    },

    #[error("scenario '{scenario}' is invalid: {source}")]
    Invalid {
        scenario: ScenarioId,
        #[source]
        source: ScriptError,
    },

    #[error("scenario '{0}' is defined more than once")]
    DuplicateScenario(ScenarioId),

    #[error("starter '{0}' is defined more than once")]
    DuplicateStarter(String),

    #[error("starter '{starter}' must name exactly one of a scenario or a link")]
    InvalidStarter { starter: String },

    #[error("starter '{starter}' points at unknown scenario '{scenario}'")]
    UnknownScenario {
        starter: String,
        scenario: ScenarioId,
    },
}

impl From<CatalogError> for DomainError {
    fn from(err: CatalogError) -> Self {
        let code = match &err {
            CatalogError::UnknownScenario { .. } => ErrorCode::ScenarioNotFound,
            _ => ErrorCode::InvalidScript,
        };
        DomainError::new(code, err.to_string())
    }
}

/// Where a starter leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StarterTarget {
    /// Opens a scripted conversation.
    Scenario(ScenarioId),
    /// Hands off to an external page; no session is created.
    ExternalLink(String),
}

/// Entry in the landing-page starter menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Starter {
    pub id: String,
    pub title: String,
    pub description: String,
    pub target: StarterTarget,
}

/// All scenarios available to the application, plus the starter menu.
#[derive(Debug)]
pub struct ScenarioCatalog {
    scenarios: BTreeMap<ScenarioId, Arc<Scenario>>,
    starters: Vec<Starter>,
}

impl ScenarioCatalog {
    /// Returns the built-in catalog, parsing it on first use.
    ///
    /// # Errors
    ///
    /// Any `CatalogError` raised by the embedded scripts.
    pub fn builtin() -> Result<Arc<Self>, CatalogError> {
        (*BUILTIN).clone()
    }

    /// Parses and validates a catalog from YAML sources.
    ///
    /// # Errors
    ///
    /// - `Parse` if a source is not valid YAML for its document type
    /// - `Invalid` if a scenario's rule table fails validation
    /// - `DuplicateScenario` / `DuplicateStarter` for repeated ids
    /// - `InvalidStarter` if a starter names both or neither target
    /// - `UnknownScenario` if a starter names a scenario not in `scenarios`
    pub fn from_sources(scenarios: &[(&str, &str)], starters: &str) -> Result<Self, CatalogError> {
        let mut loaded = BTreeMap::new();
        for (name, source) in scenarios {
            let scenario = load_scenario(name, source)?;
            let id = scenario.id().clone();
            if loaded.insert(id.clone(), Arc::new(scenario)).is_some() {
                return Err(CatalogError::DuplicateScenario(id));
            }
        }

        let documents: Vec<StarterDocument> =
            serde_yaml::from_str(starters).map_err(|e| CatalogError::Parse {
                source_name: "starters.yaml".to_string(),
                message: e.to_string(),
            })?;

        let mut menu: Vec<Starter> = Vec::with_capacity(documents.len());
        for doc in documents {
            if menu.iter().any(|s| s.id == doc.id) {
                return Err(CatalogError::DuplicateStarter(doc.id));
            }
            let target = match (doc.scenario, doc.link) {
                (Some(scenario), None) => {
                    if !loaded.contains_key(&scenario) {
                        return Err(CatalogError::UnknownScenario {
                            starter: doc.id,
                            scenario,
                        });
                    }
                    StarterTarget::Scenario(scenario)
                }
                (None, Some(link)) => StarterTarget::ExternalLink(link),
                _ => return Err(CatalogError::InvalidStarter { starter: doc.id }),
            };
            menu.push(Starter {
                id: doc.id,
                title: doc.title,
                description: doc.description,
                target,
            });
        }

        tracing::debug!(
            scenarios = loaded.len(),
            starters = menu.len(),
            "scenario catalog loaded"
        );

        Ok(Self {
            scenarios: loaded,
            starters: menu,
        })
    }

    /// Looks up a scenario by id.
    pub fn scenario(&self, id: &ScenarioId) -> Option<&Arc<Scenario>> {
        self.scenarios.get(id)
    }

    /// All scenarios in id order.
    pub fn scenarios(&self) -> impl Iterator<Item = &Arc<Scenario>> {
        self.scenarios.values()
    }

    /// Starter menu in authored order.
    pub fn starters(&self) -> &[Starter] {
        &self.starters
    }

    /// Looks up a starter by id.
    pub fn starter(&self, id: &str) -> Option<&Starter> {
        self.starters.iter().find(|s| s.id == id)
    }
}

fn load_scenario(name: &str, source: &str) -> Result<Scenario, CatalogError> {
    let document = ScenarioDocument::from_yaml(source).map_err(|e| CatalogError::Parse {
        source_name: name.to_string(),
        message: e.to_string(),
    })?;
    let id = document.id.clone();
    document
        .into_parts()
        .and_then(Scenario::new)
        .map_err(|source| CatalogError::Invalid {
            scenario: id,
            source,
        })
}
