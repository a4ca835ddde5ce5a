use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{CategoryId, LocalNow};
use crate::task::Task;

/// Sub-partition of the Planned view by how close the due date is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BucketId {
    Overdue,
    Today,
    Tomorrow,
    Week,
    Later,
}

impl BucketId {
    pub const ALL: [BucketId; 5] = [
        BucketId::Overdue,
        BucketId::Today,
        BucketId::Tomorrow,
        BucketId::Week,
        BucketId::Later,
    ];
}

/// Bucket of a single task, by its due day in the owner's zone.
///
/// Completed tasks and tasks without a due date have no bucket. `week`
/// covers the day after tomorrow up to (not including) next Monday, and
/// `later` starts at whichever of those two comes last, so on weekends
/// `week` is empty rather than overlapping `tomorrow`.
pub fn bucket_of(task: &Task, now: &LocalNow) -> Option<BucketId> {
    if task.completed {
        return None;
    }
    let day = now.local_date(task.due_date?);
    let today = now.today();
    let tomorrow = now.tomorrow()?;
    let end_of_week = now.end_of_week()?;

    let bucket = if day < today {
        BucketId::Overdue
    } else if day == today {
        BucketId::Today
    } else if day == tomorrow {
        BucketId::Tomorrow
    } else if day < end_of_week {
        BucketId::Week
    } else {
        BucketId::Later
    };
    Some(bucket)
}

/// Split the planned tasks into the five buckets. Every bucket is present
/// in the result, each sorted by due date; tasks due at the same instant
/// keep their insertion order.
pub fn bucket_planned(tasks: &[Task], now: &LocalNow) -> BTreeMap<BucketId, Vec<Task>> {
    let mut buckets: BTreeMap<BucketId, Vec<Task>> =
        BucketId::ALL.into_iter().map(|b| (b, Vec::new())).collect();

    for task in tasks {
        if let Some(bucket) = bucket_of(task, now) {
            buckets.entry(bucket).or_default().push(task.clone());
        }
    }
    for list in buckets.values_mut() {
        list.sort_by(|a, b| CategoryId::Planned.compare(a, b));
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categorizer::fixtures::{at, due, local, task, titles, wednesday_afternoon};
    use crate::categorizer::{belongs_to_category, is_active_for_listing};
    use chrono::{Days, NaiveTime, TimeZone};

    #[test]
    fn buckets_on_a_wednesday() {
        let now = wednesday_afternoon();
        let tasks = vec![
            due(1, "last week", local(2026, 2, 4, 10, 0)),
            due(2, "this morning", local(2026, 2, 11, 9, 0)),
            due(3, "tonight", local(2026, 2, 11, 22, 0)),
            due(4, "thursday", local(2026, 2, 12, 8, 0)),
            due(5, "friday", local(2026, 2, 13, 8, 0)),
            due(6, "sunday night", local(2026, 2, 15, 23, 59)),
            due(7, "next monday", local(2026, 2, 16, 0, 0)),
            task(8, "someday"),
        ];

        let buckets = bucket_planned(&tasks, &now);
        assert_eq!(titles(&buckets[&BucketId::Overdue]), vec!["last week"]);
        assert_eq!(titles(&buckets[&BucketId::Today]), vec!["this morning", "tonight"]);
        assert_eq!(titles(&buckets[&BucketId::Tomorrow]), vec!["thursday"]);
        assert_eq!(titles(&buckets[&BucketId::Week]), vec!["friday", "sunday night"]);
        assert_eq!(titles(&buckets[&BucketId::Later]), vec!["next monday"]);
    }

    #[test]
    fn due_today_lands_in_today() {
        let now = wednesday_afternoon();
        let t = due(1, "standup", local(2026, 2, 11, 9, 0));
        assert_eq!(bucket_of(&t, &now), Some(BucketId::Today));
    }

    #[test]
    fn no_due_date_means_no_bucket() {
        let now = wednesday_afternoon();
        let t = Task { important: true, ..task(1, "taxes") };
        assert_eq!(bucket_of(&t, &now), None);
        assert!(bucket_planned(&[t], &now).values().all(Vec::is_empty));
    }

    #[test]
    fn yesterday_is_overdue_until_completed() {
        let now = wednesday_afternoon();
        let mut t = due(1, "report", local(2026, 2, 10, 17, 0));
        assert_eq!(bucket_of(&t, &now), Some(BucketId::Overdue));

        t.completed = true;
        assert_eq!(bucket_of(&t, &now), None);
    }

    #[test]
    fn equal_due_dates_keep_insertion_order() {
        let now = wednesday_afternoon();
        let when = local(2026, 2, 20, 9, 0);
        let tasks = vec![
            due(1, "A", when),
            due(2, "B", when),
            due(3, "C", when),
            due(4, "earlier", local(2026, 2, 19, 9, 0)),
        ];

        let buckets = bucket_planned(&tasks, &now);
        assert_eq!(titles(&buckets[&BucketId::Later]), vec!["earlier", "A", "B", "C"]);
    }

    #[test]
    fn always_reports_all_five_buckets() {
        let buckets = bucket_planned(&[], &wednesday_afternoon());
        assert_eq!(buckets.keys().copied().collect::<Vec<_>>(), BucketId::ALL.to_vec());
    }

    /// Every active planned task lands in exactly one bucket, for every
    /// weekday and across a month of due dates.
    #[test]
    fn buckets_partition_the_planned_set_on_every_weekday() {
        for day in 9..=15 {
            let now = at(2026, 2, day, 12, 0);
            let mut tasks = Vec::new();
            let mut seq = 0;
            for offset in -10i64..=20 {
                let date = if offset < 0 {
                    now.today() - Days::new(offset.unsigned_abs())
                } else {
                    now.today() + Days::new(offset as u64)
                };
                for time in [NaiveTime::MIN, NaiveTime::from_hms_opt(23, 59, 59).unwrap()] {
                    seq += 1;
                    let instant = now
                        .zone()
                        .from_local_datetime(&date.and_time(time))
                        .earliest()
                        .unwrap()
                        .with_timezone(&chrono::Utc);
                    tasks.push(due(seq, &format!("t{seq}"), instant));
                }
            }
            tasks.push(task(1000, "unplanned"));
            tasks.push(Task { completed: true, ..due(1001, "done", local(2026, 2, day, 9, 0)) });

            let planned: Vec<&Task> = tasks
                .iter()
                .filter(|t| belongs_to_category(t, CategoryId::Planned, &now) && is_active_for_listing(t))
                .collect();
            let buckets = bucket_planned(&tasks, &now);

            let total: usize = buckets.values().map(Vec::len).sum();
            assert_eq!(total, planned.len(), "gap or overlap on day {day}");
            for t in &planned {
                let holders = buckets
                    .values()
                    .filter(|list| list.iter().any(|x| x.id == t.id))
                    .count();
                assert_eq!(holders, 1, "{} held by {holders} buckets", t.title);
            }
        }
    }

    #[test]
    fn weekend_has_an_empty_week_bucket() {
        let sunday = at(2026, 2, 15, 12, 0);
        let monday = due(1, "monday", local(2026, 2, 16, 9, 0));
        let tuesday = due(2, "tuesday", local(2026, 2, 17, 9, 0));

        assert_eq!(bucket_of(&monday, &sunday), Some(BucketId::Tomorrow));
        assert_eq!(bucket_of(&tuesday, &sunday), Some(BucketId::Later));

        let saturday = at(2026, 2, 14, 12, 0);
        assert_eq!(bucket_of(&monday, &saturday), Some(BucketId::Later));
    }
}
