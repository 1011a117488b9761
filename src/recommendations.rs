/// Recommendation list: fetch solved set, rank, resolve against the catalog

use log::{error, info, warn};
use std::collections::HashSet;

use crate::api::{Recommendation, RecommendationService, UserDataService};
use crate::catalog::{Catalog, Problem};
use crate::error::NetworkError;

/// Used when the solved set cannot be fetched
pub const DEFAULT_SOLVED: [&str; 2] = ["two-sum", "add-two-integers"];

/// A catalog problem plus the list view's own toggles
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationItem {
    pub problem: Problem,
    pub solved: bool,
    pub expanded: bool,
}

impl RecommendationItem {
    pub fn new(problem: Problem) -> Self {
        RecommendationItem {
            problem,
            solved: false,
            expanded: false,
        }
    }

    /// Label of the button that flips `solved`
    pub fn solved_toggle_label(&self) -> &'static str {
        if self.solved { "Mark Unsolved" } else { "Mark Solved" }
    }
}

/// Changes the list view may make. `SetSolved` is only sent once the backend
/// confirmed the toggle.
#[derive(Debug, Clone, PartialEq)]
pub enum ListAction {
    Replace(RecommendationList),
    SetSolved(usize, bool),
    ToggleExpanded(usize),
}

/// Ordered list in the recommendation service's ranking order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommendationList {
    items: Vec<RecommendationItem>,
}

impl RecommendationList {
    /// Resolve ranked slugs against the catalog, keeping rank order, dropping
    /// slugs the catalog lacks and repeats, and stopping at `limit` slugs.
    pub fn from_ranked(ranked: &[Recommendation], catalog: &Catalog, limit: usize) -> Self {
        let mut seen = HashSet::new();
        let items = ranked
            .iter()
            .take(limit)
            .filter(|rec| seen.insert(rec.slug.as_str()))
            .filter_map(|rec| catalog.get(&rec.slug))
            .cloned()
            .map(RecommendationItem::new)
            .collect();

        RecommendationList { items }
    }

    pub fn items(&self) -> &[RecommendationItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items with their 1-based rank
    pub fn ranked(&self) -> impl Iterator<Item = (usize, &RecommendationItem)> {
        self.items.iter().enumerate().map(|(index, item)| (index + 1, item))
    }

    pub fn apply(&mut self, action: ListAction) {
        match action {
            ListAction::Replace(list) => *self = list,
            ListAction::SetSolved(index, solved) => self.set_solved(index, solved),
            ListAction::ToggleExpanded(index) => self.toggle_expanded(index),
        }
    }

    pub fn titles(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.problem.title.as_str()).collect()
    }

    /// Local UI state only; no backend effect.
    pub fn toggle_expanded(&mut self, index: usize) {
        if let Some(item) = self.items.get_mut(index) {
            item.expanded = !item.expanded;
        }
    }

    /// Record a confirmed solved flag.
    pub fn set_solved(&mut self, index: usize, solved: bool) {
        if let Some(item) = self.items.get_mut(index) {
            item.solved = solved;
        }
    }

    /// Ask the backend to flip `solved`, then flip it locally only once the
    /// backend confirmed. Returns the new flag.
    pub async fn toggle_solved<U: UserDataService>(
        &mut self,
        index: usize,
        email: &str,
        user_data: &U,
    ) -> Result<Option<bool>, NetworkError> {
        let Some(item) = self.items.get(index) else {
            return Ok(None);
        };

        let solved = confirm_solved_toggle(user_data, email, item).await?;
        self.set_solved(index, solved);
        Ok(Some(solved))
    }
}

/// Backend half of a solved toggle: `/removeSolvedQuestion` for a solved item,
/// `/addSolvedQuestion` otherwise. Returns the flag the item should now carry.
pub async fn confirm_solved_toggle<U: UserDataService>(
    user_data: &U,
    email: &str,
    item: &RecommendationItem,
) -> Result<bool, NetworkError> {
    let slug = &item.problem.title_slug;
    let result = if item.solved {
        user_data.remove_solved_question(email, slug).await
    } else {
        user_data.add_solved_question(email, slug).await
    };

    match result {
        Ok(()) => Ok(!item.solved),
        Err(e) => {
            error!("Failed to update solved status for {}: {}", slug, e);
            Err(e)
        }
    }
}

/// Solved set for the user, or the built-in default when it cannot be had.
pub async fn fetch_solved<U: UserDataService>(user_data: &U, email: &str) -> Vec<String> {
    match user_data.solved_questions(email).await {
        Ok(Some(solved)) => solved,
        Ok(None) => {
            warn!("No solved_questions in response, using defaults");
            default_solved()
        }
        Err(e) => {
            error!("Failed to fetch solved questions: {}", e);
            default_solved()
        }
    }
}

fn default_solved() -> Vec<String> {
    DEFAULT_SOLVED.iter().map(|slug| slug.to_string()).collect()
}

/// Full pipeline, strictly sequential: solved set, ranking, catalog lookup.
/// Never fails; a broken step leaves the list empty.
pub async fn load_recommendations<U, R>(
    email: &str,
    user_data: &U,
    recommender: &R,
    catalog: &Catalog,
    top_k: usize,
) -> RecommendationList
where
    U: UserDataService,
    R: RecommendationService,
{
    let solved = fetch_solved(user_data, email).await;

    let ranked = match recommender.recommend(&solved, top_k).await {
        Ok(ranked) => ranked,
        Err(e) => {
            error!("Error fetching recommendations: {}", e);
            return RecommendationList::default();
        }
    };

    let list = RecommendationList::from_ranked(&ranked, catalog, top_k);
    info!(
        "{} of {} recommendations found in catalog",
        list.len(),
        ranked.len().min(top_k)
    );
    list
}
