// src/models/catalog.rs

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;
use validator::Validate;

use crate::engine::EngineError;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid catalog entry for domain '{domain}': {reason}")]
    Invalid { domain: String, reason: String },

    #[error("duplicate domain '{0}' in catalog")]
    DuplicateDomain(String),
}

/// A single multiple-choice question, including its answer key.
/// Never serialized to clients; see `PublicQuestion` for the outward shape.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QuestionDefinition {
    /// Prompt text.
    #[validate(length(min = 1, max = 1000))]
    pub q: String,

    /// Answer choices, in display order.
    #[validate(length(min = 2, message = "A question needs at least two choices"))]
    pub a: Vec<String>,

    /// Index into `a` of the correct choice.
    pub correct: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QuizDefinition {
    #[validate(nested)]
    pub questions: Vec<QuestionDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StepDefinition {
    /// 1-based position of the step inside its domain.
    pub index: u32,

    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(max = 5000))]
    #[serde(default)]
    pub description: String,

    /// Reference video links.
    #[validate(custom(function = validate_video_urls))]
    #[serde(default)]
    pub videos: Vec<String>,

    #[validate(nested)]
    pub quiz: QuizDefinition,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DomainDefinition {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(nested)]
    #[serde(default)]
    pub steps: Vec<StepDefinition>,
}

/// On-disk layout of the catalog file.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    domains: Vec<DomainDefinition>,
}

/// Validates each video link is an absolute URL of sane length.
fn validate_video_urls(urls: &[String]) -> Result<(), validator::ValidationError> {
    for url in urls {
        if url.len() > 500 {
            return Err(validator::ValidationError::new("url_too_long"));
        }
        if Url::parse(url).is_err() {
            return Err(validator::ValidationError::new("invalid_url"));
        }
    }
    Ok(())
}

/// The immutable step catalog: every domain and its ordered steps.
///
/// Built once at startup and shared read-only across requests. Construction
/// enforces the catalog invariants, so lookups never have to re-check them:
/// * domain names are unique,
/// * step indices are contiguous from 1,
/// * every quiz has at least one question, and every question has at least
///   two choices with an in-range correct index.
#[derive(Debug, Clone)]
pub struct Catalog {
    domains: Vec<DomainDefinition>,
}

impl Catalog {
    /// Reads and validates a catalog JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: CatalogFile = serde_json::from_str(&raw)?;
        Self::from_domains(file.domains)
    }

    /// Validates an in-memory list of domains. Steps may be given in any order;
    /// they are stored sorted by index.
    pub fn from_domains(mut domains: Vec<DomainDefinition>) -> Result<Self, CatalogError> {
        for domain in &mut domains {
            domain.steps.sort_by_key(|s| s.index);
        }

        let mut seen = HashSet::new();
        for domain in &domains {
            let invalid = |reason: String| CatalogError::Invalid {
                domain: domain.name.clone(),
                reason,
            };

            domain.validate().map_err(|e| invalid(e.to_string()))?;

            if !seen.insert(domain.name.clone()) {
                return Err(CatalogError::DuplicateDomain(domain.name.clone()));
            }

            for (position, step) in domain.steps.iter().enumerate() {
                let expected = position as u32 + 1;
                if step.index != expected {
                    return Err(invalid(format!(
                        "step indices must be contiguous from 1, expected {} but found {}",
                        expected, step.index
                    )));
                }
                if step.quiz.questions.is_empty() {
                    return Err(invalid(format!("step {} has an empty quiz", step.index)));
                }
                for (q_pos, question) in step.quiz.questions.iter().enumerate() {
                    if question.correct >= question.a.len() {
                        return Err(invalid(format!(
                            "step {} question {} has correct index {} but only {} choices",
                            step.index,
                            q_pos + 1,
                            question.correct,
                            question.a.len()
                        )));
                    }
                }
            }
        }

        Ok(Self { domains })
    }

    /// Domain names in catalog order.
    pub fn domain_names(&self) -> Vec<String> {
        self.domains.iter().map(|d| d.name.clone()).collect()
    }

    pub fn domains(&self) -> &[DomainDefinition] {
        &self.domains
    }

    pub fn domain(&self, name: &str) -> Result<&DomainDefinition, EngineError> {
        self.domains
            .iter()
            .find(|d| d.name == name)
            .ok_or_else(|| EngineError::DomainNotFound(name.to_string()))
    }

    /// Looks up a step by its 1-based index. Out-of-range and non-positive
    /// indices are reported as `StepNotFound`.
    pub fn step(&self, domain: &str, step_index: i64) -> Result<&StepDefinition, EngineError> {
        let definition = self.domain(domain)?;
        usize::try_from(step_index)
            .ok()
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| definition.steps.get(i))
            .ok_or_else(|| EngineError::StepNotFound {
                domain: domain.to_string(),
                step_index,
            })
    }

    pub fn total_steps(&self, domain: &str) -> Result<u32, EngineError> {
        Ok(self.domain(domain)?.steps.len() as u32)
    }
}
