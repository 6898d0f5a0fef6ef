// Chart data: notes, loading, and the derived schedule.

pub mod chart_loader;
pub mod note;
pub mod schedule;

pub use chart_loader::{load_chart, normalize_key};
pub use note::{Chart, Note};
pub use schedule::{Schedule, ScheduleEntry, group_notes};
