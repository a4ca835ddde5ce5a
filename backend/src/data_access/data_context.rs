use chrono::{DateTime, Utc};
use redb::{
    Database, MultimapTableDefinition, ReadableMultimapTable, ReadableTable, TableDefinition,
};
use std::{path::Path, sync::Arc};
use uuid::Uuid;

use crate::{
    categorizer::{belongs_to_category, CategoryId, LocalNow, SearchQuery},
    data_access::data_error::{decode, encode, DataError},
    task::{NewTask, Task, TaskPatch},
    user::{User, UserEdit},
};

const USERS_TABLE: TableDefinition<&[u8], &[u8]> = TableDefinition::new("users");
const EMAIL_INDEX: TableDefinition<&str, &[u8]> = TableDefinition::new("email_index");
const TASKS_TABLE: TableDefinition<&[u8], &[u8]> = TableDefinition::new("tasks");
const TASKS_BY_OWNER: MultimapTableDefinition<&[u8], &[u8]> =
    MultimapTableDefinition::new("tasks_by_owner");
const META_TABLE: TableDefinition<&str, u64> = TableDefinition::new("meta");

const TASK_SEQUENCE: &str = "task_sequence";

/// Handle to the redb file. Cloneable (Arc inside).
///
/// Every task query is scoped to an owner; a task that exists but belongs
/// to someone else is reported exactly like a missing one.
#[derive(Clone)]
pub struct DataContext {
    db: Arc<Database>,
}

impl DataContext {
    pub fn new(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let db = Database::create(path)?;
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(USERS_TABLE)?;
            let _ = write_txn.open_table(EMAIL_INDEX)?;
            let _ = write_txn.open_table(TASKS_TABLE)?;
            let _ = write_txn.open_multimap_table(TASKS_BY_OWNER)?;
            let _ = write_txn.open_table(META_TABLE)?;
        }
        write_txn.commit()?;
        Ok(DataContext { db: Arc::new(db) })
    }

    // USERS

    /// Insert a new user. Returns false, writing nothing, when the email is
    /// already registered.
    pub fn create_user(&self, user: &User) -> Result<bool, DataError> {
        let write_txn = self.db.begin_write()?;
        let taken = {
            let email_index = write_txn.open_table(EMAIL_INDEX)?;
            let existing = email_index.get(user.email.as_str())?;
            existing.is_some()
        };
        if taken {
            write_txn.abort()?;
            return Ok(false);
        }
        {
            let mut users_table = write_txn.open_table(USERS_TABLE)?;
            let mut email_index = write_txn.open_table(EMAIL_INDEX)?;
            let id_bytes = user.id.as_bytes();
            users_table.insert(id_bytes.as_slice(), encode(user)?.as_slice())?;
            email_index.insert(user.email.as_str(), id_bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(true)
    }

    pub fn get_user(&self, id: Uuid) -> Result<Option<User>, DataError> {
        let read_txn = self.db.begin_read()?;
        let users_table = read_txn.open_table(USERS_TABLE)?;
        read_record(&users_table, id)
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DataError> {
        let read_txn = self.db.begin_read()?;
        let email_index = read_txn.open_table(EMAIL_INDEX)?;
        let entry = email_index.get(email)?;
        let Some(id_data) = entry else { return Ok(None) };
        let id = Uuid::from_slice(id_data.value()).map_err(|e| DataError::Decode(e.to_string()))?;
        let users_table = read_txn.open_table(USERS_TABLE)?;
        read_record(&users_table, id)
    }

    pub fn edit_user(&self, id: Uuid, edit: UserEdit) -> Result<Option<User>, DataError> {
        let write_txn = self.db.begin_write()?;
        let edited = {
            let mut users_table = write_txn.open_table(USERS_TABLE)?;
            let existing: Option<User> = read_record(&users_table, id)?;
            match existing {
                Some(user) => {
                    let user = user.edit(edit);
                    users_table.insert(id.as_bytes().as_slice(), encode(&user)?.as_slice())?;
                    Some(user)
                }
                None => None,
            }
        };
        write_txn.commit()?;
        Ok(edited)
    }

    /// Delete a user and every task they own in one transaction. Returns
    /// the number of tasks removed, or `None` if the user does not exist.
    pub fn delete_user(&self, id: Uuid) -> Result<Option<usize>, DataError> {
        let owner_bytes = id.as_bytes();

        let write_txn = self.db.begin_write()?;
        let existing: Option<User> = {
            let users_table = write_txn.open_table(USERS_TABLE)?;
            read_record(&users_table, id)?
        };
        let Some(user) = existing else {
            write_txn.abort()?;
            return Ok(None);
        };

        let removed;
        {
            let mut index = write_txn.open_multimap_table(TASKS_BY_OWNER)?;
            let mut tasks_table = write_txn.open_table(TASKS_TABLE)?;
            let mut task_ids: Vec<Vec<u8>> = Vec::new();
            for entry in index.get(owner_bytes.as_slice())? {
                task_ids.push(entry?.value().to_vec());
            }
            for task_id in &task_ids {
                tasks_table.remove(task_id.as_slice())?;
            }
            index.remove_all(owner_bytes.as_slice())?;
            removed = task_ids.len();

            let mut users_table = write_txn.open_table(USERS_TABLE)?;
            let mut email_index = write_txn.open_table(EMAIL_INDEX)?;
            users_table.remove(owner_bytes.as_slice())?;
            email_index.remove(user.email.as_str())?;
        }
        write_txn.commit()?;
        Ok(Some(removed))
    }

    // TASKS

    pub fn create_task(&self, owner: Uuid, new: NewTask, now: DateTime<Utc>) -> Result<Task, DataError> {
        let write_txn = self.db.begin_write()?;
        let task;
        {
            let mut meta = write_txn.open_table(META_TABLE)?;
            let last = meta.get(TASK_SEQUENCE)?.map(|g| g.value()).unwrap_or(0);
            let sequence = last + 1;
            meta.insert(TASK_SEQUENCE, sequence)?;

            task = Task::new(owner, new, sequence, now);
            let mut tasks_table = write_txn.open_table(TASKS_TABLE)?;
            let mut index = write_txn.open_multimap_table(TASKS_BY_OWNER)?;
            tasks_table.insert(task.id.as_bytes().as_slice(), encode(&task)?.as_slice())?;
            index.insert(owner.as_bytes().as_slice(), task.id.as_bytes().as_slice())?;
        }
        write_txn.commit()?;
        tracing::debug!(task = %task.id, %owner, sequence = task.sequence, "task created");
        Ok(task)
    }

    pub fn get_task(&self, owner: Uuid, id: Uuid) -> Result<Option<Task>, DataError> {
        let read_txn = self.db.begin_read()?;
        let tasks_table = read_txn.open_table(TASKS_TABLE)?;
        let task: Option<Task> = read_record(&tasks_table, id)?;
        Ok(task.filter(|t| t.owner == owner))
    }

    /// All of an owner's tasks in insertion order.
    pub fn list_tasks(&self, owner: Uuid) -> Result<Vec<Task>, DataError> {
        self.owner_tasks(owner, |_| true)
    }

    /// Store-side counterpart of [`belongs_to_category`], in insertion order.
    pub fn list_tasks_by_category(
        &self,
        owner: Uuid,
        category: CategoryId,
        now: &LocalNow,
    ) -> Result<Vec<Task>, DataError> {
        self.owner_tasks(owner, |t| belongs_to_category(t, category, now))
    }

    pub fn search_tasks(&self, owner: Uuid, query: &SearchQuery) -> Result<Vec<Task>, DataError> {
        self.owner_tasks(owner, |t| query.matches(t))
    }

    pub fn update_task(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: TaskPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<Task>, DataError> {
        let write_txn = self.db.begin_write()?;
        let updated = {
            let mut tasks_table = write_txn.open_table(TASKS_TABLE)?;
            let existing: Option<Task> = read_record(&tasks_table, id)?;
            match existing {
                Some(mut task) if task.owner == owner => {
                    task.apply(patch, now);
                    tasks_table.insert(id.as_bytes().as_slice(), encode(&task)?.as_slice())?;
                    Some(task)
                }
                _ => None,
            }
        };
        write_txn.commit()?;
        Ok(updated)
    }

    pub fn delete_task(&self, owner: Uuid, id: Uuid) -> Result<Option<Task>, DataError> {
        let write_txn = self.db.begin_write()?;
        let deleted = {
            let mut tasks_table = write_txn.open_table(TASKS_TABLE)?;
            let mut index = write_txn.open_multimap_table(TASKS_BY_OWNER)?;
            let existing: Option<Task> = read_record(&tasks_table, id)?;
            match existing {
                Some(task) if task.owner == owner => {
                    tasks_table.remove(id.as_bytes().as_slice())?;
                    index.remove(owner.as_bytes().as_slice(), id.as_bytes().as_slice())?;
                    Some(task)
                }
                _ => None,
            }
        };
        write_txn.commit()?;
        Ok(deleted)
    }

    fn owner_tasks(&self, owner: Uuid, keep: impl Fn(&Task) -> bool) -> Result<Vec<Task>, DataError> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_multimap_table(TASKS_BY_OWNER)?;
        let tasks_table = read_txn.open_table(TASKS_TABLE)?;

        let mut tasks = Vec::new();
        for entry in index.get(owner.as_bytes().as_slice())? {
            let task_id = entry?;
            let row = tasks_table.get(task_id.value())?;
            if let Some(row) = row {
                let task: Task = decode(row.value())?;
                if keep(&task) {
                    tasks.push(task);
                }
            }
        }
        tasks.sort_by_key(|t| t.sequence);
        tracing::debug!(%owner, count = tasks.len(), "owner tasks scanned");
        Ok(tasks)
    }
}

/// Fetch and decode the record stored under `id`.
fn read_record<T: serde::de::DeserializeOwned>(
    table: &impl ReadableTable<&'static [u8], &'static [u8]>,
    id: Uuid,
) -> Result<Option<T>, DataError> {
    let row = table.get(id.as_bytes().as_slice())?;
    let record = match row {
        Some(data) => Some(decode(data.value())?),
        None => None,
    };
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categorizer::{filter_view, ViewOptions};
    use chrono::TimeZone;
    use std::fs;

    /// Create a temp data context that the caller cleans up.
    fn temp_context(name: &str) -> (DataContext, String) {
        let path = std::env::temp_dir()
            .join(format!("tasklist_test_{name}_{}.redb", std::process::id()))
            .display()
            .to_string();
        let _ = fs::remove_file(&path);
        let ctx = DataContext::new(&path).unwrap();
        (ctx, path)
    }

    fn cleanup(path: &str) {
        let _ = fs::remove_file(path);
    }

    fn user(email: &str) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Test".into(),
            email: email.into(),
            password_hash: "not-a-real-hash".into(),
            time_zone: "Europe/Berlin".into(),
            created_at: Utc::now(),
        }
    }

    fn new_task(title: &str) -> NewTask {
        NewTask {
            title: title.into(),
            note: String::new(),
            due_date: None,
            important: false,
        }
    }

    fn wednesday() -> LocalNow {
        LocalNow::new(
            Utc.with_ymd_and_hms(2026, 2, 11, 12, 0, 0).unwrap(),
            chrono_tz::Europe::Berlin,
        )
    }

    #[test]
    fn users_round_trip_and_emails_are_unique() {
        let (ctx, path) = temp_context("users");

        let ada = user("ada@example.com");
        assert!(ctx.create_user(&ada).unwrap());
        assert!(!ctx.create_user(&user("ada@example.com")).unwrap());

        assert_eq!(ctx.get_user(ada.id).unwrap(), Some(ada.clone()));
        assert_eq!(ctx.get_user_by_email("ada@example.com").unwrap(), Some(ada.clone()));
        assert_eq!(ctx.get_user_by_email("bob@example.com").unwrap(), None);

        let edited = ctx
            .edit_user(ada.id, UserEdit { name: Some("Ada L.".into()), time_zone: None })
            .unwrap()
            .unwrap();
        assert_eq!(edited.name, "Ada L.");
        assert_eq!(ctx.get_user(ada.id).unwrap().unwrap().name, "Ada L.");
        assert_eq!(ctx.edit_user(Uuid::new_v4(), UserEdit::default()).unwrap(), None);

        cleanup(&path);
    }

    #[test]
    fn tasks_keep_insertion_order_across_reopen() {
        let (ctx, path) = temp_context("order");
        let owner = Uuid::new_v4();
        let now = Utc::now();

        for title in ["A", "B", "C"] {
            ctx.create_task(owner, new_task(title), now).unwrap();
        }
        drop(ctx);

        let ctx = DataContext::new(&path).unwrap();
        let d = ctx.create_task(owner, new_task("D"), now).unwrap();
        assert_eq!(d.sequence, 4);

        let titles: Vec<String> = ctx.list_tasks(owner).unwrap().into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["A", "B", "C", "D"]);

        cleanup(&path);
    }

    #[test]
    fn other_owners_cannot_see_or_touch_tasks() {
        let (ctx, path) = temp_context("owners");
        let owner = Uuid::new_v4();
        let intruder = Uuid::new_v4();
        let task = ctx.create_task(owner, new_task("private"), Utc::now()).unwrap();

        assert_eq!(ctx.get_task(intruder, task.id).unwrap(), None);
        assert!(ctx.list_tasks(intruder).unwrap().is_empty());
        let patch = TaskPatch { completed: Some(true), ..Default::default() };
        assert_eq!(ctx.update_task(intruder, task.id, patch, Utc::now()).unwrap(), None);
        assert_eq!(ctx.delete_task(intruder, task.id).unwrap(), None);

        assert_eq!(ctx.get_task(owner, task.id).unwrap(), Some(task));
        cleanup(&path);
    }

    #[test]
    fn update_and_delete() {
        let (ctx, path) = temp_context("update");
        let owner = Uuid::new_v4();
        let due = Utc.with_ymd_and_hms(2026, 2, 11, 9, 0, 0).unwrap();
        let task = ctx
            .create_task(owner, NewTask { due_date: Some(due), ..new_task("report") }, Utc::now())
            .unwrap();

        let patch = TaskPatch { due_date: Some(None), important: Some(true), ..Default::default() };
        let updated = ctx.update_task(owner, task.id, patch, Utc::now()).unwrap().unwrap();
        assert_eq!(updated.due_date, None);
        assert!(updated.important);
        assert_eq!(updated.sequence, task.sequence);
        assert_eq!(ctx.get_task(owner, task.id).unwrap(), Some(updated));

        assert!(ctx.delete_task(owner, task.id).unwrap().is_some());
        assert_eq!(ctx.get_task(owner, task.id).unwrap(), None);
        assert!(ctx.list_tasks(owner).unwrap().is_empty());
        assert_eq!(ctx.delete_task(owner, task.id).unwrap(), None);

        cleanup(&path);
    }

    #[test]
    fn store_queries_agree_with_in_memory_predicates() {
        let (ctx, path) = temp_context("agree");
        let owner = Uuid::new_v4();
        let now = wednesday();
        let today = Utc.with_ymd_and_hms(2026, 2, 11, 16, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2026, 3, 2, 16, 0, 0).unwrap();

        let inputs = vec![
            NewTask { due_date: Some(today), ..new_task("Pay rent") },
            NewTask { important: true, note: "a.c and *stars*".into(), ..new_task("Misc") },
            NewTask { due_date: Some(later), important: true, ..new_task("Buy MILK") },
            new_task("abc"),
        ];
        for input in inputs {
            ctx.create_task(owner, input, Utc::now()).unwrap();
        }
        let all = ctx.list_tasks(owner).unwrap();

        for category in CategoryId::ALL {
            let stored = ctx.list_tasks_by_category(owner, category, &now).unwrap();
            let options = ViewOptions::default();
            let expected: Vec<Task> = all
                .iter()
                .filter(|t| belongs_to_category(t, category, &now))
                .cloned()
                .collect();
            assert_eq!(stored, expected, "{category}");
            assert_eq!(
                filter_view(&stored, category, &now, &options),
                filter_view(&all, category, &now, &options)
            );
        }

        for q in ["", "   ", "a.c", "*", "milk", "MILK", "zzz"] {
            let query = SearchQuery::from(q);
            let stored = ctx.search_tasks(owner, &query).unwrap();
            let expected: Vec<Task> = all.iter().filter(|t| query.matches(t)).cloned().collect();
            assert_eq!(stored, expected, "query {q:?}");
        }
        assert_eq!(ctx.search_tasks(owner, &SearchQuery::from("a.c")).unwrap().len(), 1);

        cleanup(&path);
    }

    #[test]
    fn deleting_a_user_cascades_to_their_tasks_only() {
        let (ctx, path) = temp_context("cascade");
        let ada = user("ada@example.com");
        let bob = user("bob@example.com");
        ctx.create_user(&ada).unwrap();
        ctx.create_user(&bob).unwrap();

        for title in ["one", "two", "three"] {
            ctx.create_task(ada.id, new_task(title), Utc::now()).unwrap();
        }
        let kept = ctx.create_task(bob.id, new_task("bob's"), Utc::now()).unwrap();

        assert_eq!(ctx.delete_user(ada.id).unwrap(), Some(3));
        assert_eq!(ctx.get_user(ada.id).unwrap(), None);
        assert_eq!(ctx.get_user_by_email("ada@example.com").unwrap(), None);
        assert!(ctx.list_tasks(ada.id).unwrap().is_empty());
        assert_eq!(ctx.list_tasks(bob.id).unwrap(), vec![kept]);

        assert_eq!(ctx.delete_user(ada.id).unwrap(), None);
        // the email is free again
        assert!(ctx.create_user(&user("ada@example.com")).unwrap());

        cleanup(&path);
    }

    #[test]
    fn repeated_delete_leaves_a_reregistered_email_alone() {
        let (ctx, path) = temp_context("redelete");
        let first = user("ada@example.com");
        ctx.create_user(&first).unwrap();
        ctx.create_task(first.id, new_task("old"), Utc::now()).unwrap();

        assert_eq!(ctx.delete_user(first.id).unwrap(), Some(1));
        let second = user("ada@example.com");
        assert!(ctx.create_user(&second).unwrap());
        ctx.create_task(second.id, new_task("new"), Utc::now()).unwrap();

        assert_eq!(ctx.delete_user(first.id).unwrap(), None);
        assert_eq!(ctx.get_user_by_email("ada@example.com").unwrap(), Some(second.clone()));
        assert_eq!(ctx.list_tasks(second.id).unwrap().len(), 1);
        assert!(!ctx.create_user(&user("ada@example.com")).unwrap());

        cleanup(&path);
    }
}
