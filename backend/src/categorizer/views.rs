use super::{belongs_to_category, is_active_for_listing, CategoryId, LocalNow, SearchQuery};
use crate::task::Task;

/// Per-view knobs layered on top of category membership.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewOptions {
    pub hide_completed: bool,
    pub search_query: SearchQuery,
}

impl ViewOptions {
    /// The conventional options for a view: no search, completed tasks
    /// hidden where the view hides them.
    pub fn for_category(category: CategoryId) -> Self {
        Self {
            hide_completed: category.hides_completed_by_default(),
            search_query: SearchQuery::default(),
        }
    }

    pub fn hide_completed(mut self, hide: bool) -> Self {
        self.hide_completed = hide;
        self
    }

    pub fn search(mut self, query: SearchQuery) -> Self {
        self.search_query = query;
        self
    }

    fn admits(&self, task: &Task, category: CategoryId, now: &LocalNow) -> bool {
        belongs_to_category(task, category, now)
            && (!self.hide_completed || is_active_for_listing(task))
            && self.search_query.matches(task)
    }
}

/// The tasks a view displays, in display order.
pub fn filter_view(
    tasks: &[Task],
    category: CategoryId,
    now: &LocalNow,
    options: &ViewOptions,
) -> Vec<Task> {
    let mut shown: Vec<Task> = tasks
        .iter()
        .filter(|t| options.admits(t, category, now))
        .cloned()
        .collect();
    shown.sort_by(|a, b| category.compare(a, b));
    shown
}

/// Fold one mutated task into a displayed list.
///
/// The stale copy (if any) is dropped; the new one goes in at the position
/// the view's order dictates, but only if it still qualifies. Applying the
/// same update twice gives the same list as applying it once.
pub fn reconcile(
    current: &[Task],
    updated: &Task,
    category: CategoryId,
    now: &LocalNow,
    options: &ViewOptions,
) -> Vec<Task> {
    let mut list: Vec<Task> = current
        .iter()
        .filter(|t| t.id != updated.id)
        .cloned()
        .collect();

    if options.admits(updated, category, now) {
        let at = list
            .iter()
            .position(|t| category.compare(updated, t).is_lt())
            .unwrap_or(list.len());
        list.insert(at, updated.clone());
    }
    list
}
