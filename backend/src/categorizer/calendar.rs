use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate};

use super::{CategoryId, LocalNow};
use crate::task::Task;

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// False for the leading/trailing days borrowed from adjacent months.
    pub in_month: bool,
    pub is_today: bool,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    /// Monday-first rows of seven days.
    pub weeks: Vec<Vec<CalendarDay>>,
}

/// Tasks with a due date, keyed by local due day. Completed tasks are kept.
pub fn group_by_day(tasks: &[Task], now: &LocalNow) -> BTreeMap<NaiveDate, Vec<Task>> {
    let mut days: BTreeMap<NaiveDate, Vec<Task>> = BTreeMap::new();
    for task in tasks {
        if let Some(due) = task.due_date {
            days.entry(now.local_date(due)).or_default().push(task.clone());
        }
    }
    for list in days.values_mut() {
        list.sort_by(|a, b| CategoryId::Calendar.compare(a, b));
    }
    days
}

/// Month grid running from the Monday on or before the 1st through the
/// Sunday on or after the last day. `None` for an impossible year/month.
pub fn calendar_month(tasks: &[Task], year: i32, month: u32, now: &LocalNow) -> Option<CalendarMonth> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last = first.checked_add_months(chrono::Months::new(1))?.pred_opt()?;
    let start = first.checked_sub_days(Days::new(u64::from(first.weekday().num_days_from_monday())))?;
    let end = last.checked_add_days(Days::new(u64::from(6 - last.weekday().num_days_from_monday())))?;

    let mut by_day = group_by_day(tasks, now);
    let days: Vec<CalendarDay> = start
        .iter_days()
        .take_while(|d| *d <= end)
        .map(|date| CalendarDay {
            date,
            in_month: date.month() == month && date.year() == year,
            is_today: date == now.today(),
            tasks: by_day.remove(&date).unwrap_or_default(),
        })
        .collect();

    let weeks = days.chunks(7).map(<[CalendarDay]>::to_vec).collect();
    Some(CalendarMonth { year, month, weeks })
}
