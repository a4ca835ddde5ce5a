use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{categorizer::BucketId, task::Task, task_response::TaskResponse};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlannedBucketsResponse {
    pub overdue: Vec<TaskResponse>,
    pub today: Vec<TaskResponse>,
    pub tomorrow: Vec<TaskResponse>,
    pub week: Vec<TaskResponse>,
    pub later: Vec<TaskResponse>,
}

impl From<BTreeMap<BucketId, Vec<Task>>> for PlannedBucketsResponse {
    fn from(buckets: BTreeMap<BucketId, Vec<Task>>) -> Self {
        let mut response = PlannedBucketsResponse::default();
        for (bucket, tasks) in buckets {
            let slot = match bucket {
                BucketId::Overdue => &mut response.overdue,
                BucketId::Today => &mut response.today,
                BucketId::Tomorrow => &mut response.tomorrow,
                BucketId::Week => &mut response.week,
                BucketId::Later => &mut response.later,
            };
            *slot = tasks.iter().map(Task::to_response).collect();
        }
        response
    }
}
