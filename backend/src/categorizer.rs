//! Task categorization and filtering.
//!
//! Every view (My Day, Important, Planned, All Tasks, Calendar) is computed
//! here from an in-memory snapshot of one owner's tasks. Nothing in this
//! module performs I/O or reads the clock: "now" is sampled once by the
//! caller as a [`LocalNow`] and passed down explicitly.

pub mod local_now;
pub mod category;
pub mod search;
pub mod buckets;
pub mod views;
pub mod calendar;

pub use buckets::{bucket_of, bucket_planned, BucketId};
pub use calendar::{calendar_month, group_by_day, CalendarDay, CalendarMonth};
pub use category::{belongs_to_category, classify, is_active_for_listing, CategoryId, UnknownCategory};
pub use local_now::LocalNow;
pub use search::SearchQuery;
pub use views::{filter_view, reconcile, ViewOptions};
