use std::{cmp::Ordering, collections::BTreeSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::LocalNow;
use crate::task::Task;

/// The named views a task can show up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CategoryId {
    MyDay,
    Important,
    Planned,
    AllTasks,
    Calendar,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category '{0}'")]
pub struct UnknownCategory(pub String);

impl CategoryId {
    pub const ALL: [CategoryId; 5] = [
        CategoryId::MyDay,
        CategoryId::Important,
        CategoryId::Planned,
        CategoryId::AllTasks,
        CategoryId::Calendar,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CategoryId::MyDay => "my-day",
            CategoryId::Important => "important",
            CategoryId::Planned => "planned",
            CategoryId::AllTasks => "all-tasks",
            CategoryId::Calendar => "calendar",
        }
    }

    /// Whether the view drops completed tasks unless told otherwise.
    /// All Tasks lists them in their own section; Calendar strikes them through.
    pub fn hides_completed_by_default(self) -> bool {
        match self {
            CategoryId::MyDay | CategoryId::Important | CategoryId::Planned => true,
            CategoryId::AllTasks | CategoryId::Calendar => false,
        }
    }

    /// Display order of the view. Date-driven views run soonest first,
    /// the rest newest first. Insertion order breaks every tie, which makes
    /// the order total.
    pub fn compare(self, a: &Task, b: &Task) -> Ordering {
        match self {
            CategoryId::Planned | CategoryId::Calendar => a
                .due_date
                .cmp(&b.due_date)
                .then(a.sequence.cmp(&b.sequence)),
            CategoryId::MyDay | CategoryId::Important | CategoryId::AllTasks => b
                .created_at
                .cmp(&a.created_at)
                .then(b.sequence.cmp(&a.sequence)),
        }
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryId {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryId::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Category membership from the task's fields alone. Completion is a
/// separate concern, see [`is_active_for_listing`].
pub fn belongs_to_category(task: &Task, category: CategoryId, now: &LocalNow) -> bool {
    match category {
        CategoryId::MyDay => task
            .due_date
            .is_some_and(|due| now.local_date(due) == now.today()),
        CategoryId::Important => task.important,
        CategoryId::Planned | CategoryId::Calendar => task.due_date.is_some(),
        CategoryId::AllTasks => true,
    }
}

pub fn is_active_for_listing(task: &Task) -> bool {
    !task.completed
}

/// The field-driven categories of a task. All Tasks holds everything and
/// Calendar mirrors Planned, so neither is reported.
pub fn classify(task: &Task, now: &LocalNow) -> BTreeSet<CategoryId> {
    [CategoryId::MyDay, CategoryId::Important, CategoryId::Planned]
        .into_iter()
        .filter(|c| belongs_to_category(task, *c, now))
        .collect()
}
