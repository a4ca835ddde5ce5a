use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    categorizer::{CalendarDay, CalendarMonth},
    task::Task,
    task_response::TaskResponse,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDayResponse {
    pub date: NaiveDate,
    pub in_month: bool,
    pub is_today: bool,
    pub tasks: Vec<TaskResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarResponse {
    pub year: i32,
    pub month: u32,
    pub weeks: Vec<Vec<CalendarDayResponse>>,
}

impl From<&CalendarDay> for CalendarDayResponse {
    fn from(day: &CalendarDay) -> Self {
        Self {
            date: day.date,
            in_month: day.in_month,
            is_today: day.is_today,
            tasks: day.tasks.iter().map(Task::to_response).collect(),
        }
    }
}

impl From<CalendarMonth> for CalendarResponse {
    fn from(month: CalendarMonth) -> Self {
        Self {
            year: month.year,
            month: month.month,
            weeks: month
                .weeks
                .iter()
                .map(|week| week.iter().map(CalendarDayResponse::from).collect())
                .collect(),
        }
    }
}
