/// Static problem catalog bundled into the extension

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const BUNDLED_PROBLEMS: &str = include_str!("../data/problems.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

/// Catalog entry. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    #[serde(rename = "questionId")]
    pub id: String,
    pub title_slug: String,
    pub title: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub topics: Vec<String>,
    pub link: String,
    /// HTML fragment
    #[serde(default)]
    pub question: String,
}

/// Problems indexed by slug
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    by_slug: HashMap<String, Problem>,
}

impl Catalog {
    /// Parse a JSON object of `{ id: Problem }`.
    pub fn from_json(json: &str) -> Result<Catalog, serde_json::Error> {
        let entries: HashMap<String, Problem> = serde_json::from_str(json)?;
        Ok(Catalog::from_problems(entries.into_values()))
    }

    pub fn from_problems(problems: impl IntoIterator<Item = Problem>) -> Catalog {
        Catalog {
            by_slug: problems
                .into_iter()
                .map(|problem| (problem.title_slug.clone(), problem))
                .collect(),
        }
    }

    /// The dataset compiled into the bundle. A broken dataset yields an
    /// empty catalog, which in turn yields empty recommendation lists.
    pub fn bundled() -> Catalog {
        Catalog::from_json(BUNDLED_PROBLEMS).unwrap_or_else(|e| {
            log::error!("Bundled problem catalog is invalid: {}", e);
            Catalog::default()
        })
    }

    /// Exact slug match
    pub fn get(&self, slug: &str) -> Option<&Problem> {
        self.by_slug.get(slug)
    }

    pub fn len(&self) -> usize {
        self.by_slug.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_slug.is_empty()
    }
}

#[cfg(test)]
pub(crate) fn test_problem(slug: &str, title: &str, difficulty: Difficulty) -> Problem {
    Problem {
        id: slug.to_string(),
        title_slug: slug.to_string(),
        title: title.to_string(),
        difficulty,
        topics: vec!["Array".to_string()],
        link: format!("https://leetcode.com/problems/{}/", slug),
        question: "<p>question</p>".to_string(),
    }
}
