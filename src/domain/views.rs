use super::enums::SortBy;
use super::task::{Task, TaskGroup};

/// Ungrouped tasks that are still open
pub fn active_tasks(tasks: &[Task]) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|t| !t.completed && t.group_id.is_none())
        .collect()
}

/// Completed tasks, grouped or not
pub fn completed_tasks(tasks: &[Task]) -> Vec<&Task> {
    tasks.iter().filter(|t| t.completed).collect()
}

/// Open tasks belonging to one group
pub fn grouped_active_tasks<'a>(tasks: &'a [Task], group_id: &str) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|t| !t.completed && t.group_id.as_deref() == Some(group_id))
        .collect()
}

/// Order a task view for display. Never touches the stored `order` values.
pub fn sort_tasks(mut tasks: Vec<&Task>, sort_by: SortBy) -> Vec<&Task> {
    match sort_by {
        SortBy::Alphabetical => tasks.sort_by(|a, b| a.title.cmp(&b.title)),
        SortBy::CreatedAt => tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortBy::Manual => tasks.sort_by_key(|t| t.order),
    }
    tasks
}

/// Groups in ascending manual order
pub fn groups_in_order(groups: &[TaskGroup]) -> Vec<&TaskGroup> {
    let mut ordered: Vec<&TaskGroup> = groups.iter().collect();
    ordered.sort_by_key(|g| g.order);
    ordered
}

/// Move `dragged_id` to the position currently held by `target_id` in the
/// manual (`order`, then stored position) sequence and renumber every
/// `order` to its new index. `None` when either id is missing or they are
/// the same task.
pub fn move_task(tasks: &[Task], dragged_id: &str, target_id: &str) -> Option<Vec<Task>> {
    if dragged_id == target_id {
        return None;
    }
    let mut reordered = tasks.to_vec();
    reordered.sort_by_key(|t| t.order);

    let from = reordered.iter().position(|t| t.id == dragged_id)?;
    let to = reordered.iter().position(|t| t.id == target_id)?;
    let moved = reordered.remove(from);
    reordered.insert(to, moved);
    for (index, task) in reordered.iter_mut().enumerate() {
        task.order = index as i64;
    }
    Some(reordered)
}

/// Section of the task list a row belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Group,
    Ungrouped,
    Completed,
}

/// A flattened row for rendering the task list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlatRow {
    GroupHeader { group_id: String },
    Task { task_id: String, section: Section },
}

impl FlatRow {
    pub fn task_id(&self) -> Option<&str> {
        match self {
            FlatRow::Task { task_id, .. } => Some(task_id),
            FlatRow::GroupHeader { .. } => None,
        }
    }
}

/// Flatten groups and tasks into display rows: each group header followed by
/// its open tasks when expanded, then ungrouped open tasks, then (optionally)
/// completed tasks.
pub fn flatten_rows(
    tasks: &[Task],
    groups: &[TaskGroup],
    sort_by: SortBy,
    show_completed: bool,
) -> Vec<FlatRow> {
    let mut rows = Vec::new();

    for group in groups_in_order(groups) {
        rows.push(FlatRow::GroupHeader {
            group_id: group.id.clone(),
        });
        if group.expanded {
            for task in sort_tasks(grouped_active_tasks(tasks, &group.id), sort_by) {
                rows.push(FlatRow::Task {
                    task_id: task.id.clone(),
                    section: Section::Group,
                });
            }
        }
    }

    for task in sort_tasks(active_tasks(tasks), sort_by) {
        rows.push(FlatRow::Task {
            task_id: task.id.clone(),
            section: Section::Ungrouped,
        });
    }

    if show_completed {
        for task in sort_tasks(completed_tasks(tasks), sort_by) {
            rows.push(FlatRow::Task {
                task_id: task.id.clone(),
                section: Section::Completed,
            });
        }
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn task(title: &str, created_at: i64, order: i64) -> Task {
        let mut task = Task::new(title.to_string(), None, None, order);
        task.created_at = created_at;
        task
    }

    fn titles(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|t| t.title.clone()).collect()
    }

    #[test]
    fn test_partitions() {
        let mut done = task("Done", 1, 0);
        done.completed = true;
        done.group_id = Some("g1".to_string());
        let mut grouped = task("Grouped", 2, 1);
        grouped.group_id = Some("g1".to_string());
        let loose = task("Loose", 3, 2);
        let tasks = vec![done, grouped, loose];

        assert_eq!(titles(&active_tasks(&tasks)), vec!["Loose"]);
        assert_eq!(titles(&completed_tasks(&tasks)), vec!["Done"]);
        assert_eq!(titles(&grouped_active_tasks(&tasks, "g1")), vec!["Grouped"]);
        assert!(grouped_active_tasks(&tasks, "g2").is_empty());
    }

    #[test]
    fn test_sort_alphabetical_is_case_respecting() {
        let tasks = vec![task("banana", 1, 0), task("Apple", 2, 1), task("apple", 3, 2)];
        let sorted = sort_tasks(tasks.iter().collect(), SortBy::Alphabetical);
        assert_eq!(titles(&sorted), vec!["Apple", "apple", "banana"]);
    }

    #[test]
    fn test_sort_created_at_newest_first() {
        let tasks = vec![task("old", 10, 0), task("new", 30, 1), task("mid", 20, 2)];
        let sorted = sort_tasks(tasks.iter().collect(), SortBy::CreatedAt);
        assert_eq!(titles(&sorted), vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_sort_manual_by_order_with_gaps() {
        let tasks = vec![task("c", 1, 9), task("a", 2, -1), task("b", 3, 4)];
        let sorted = sort_tasks(tasks.iter().collect(), SortBy::Manual);
        assert_eq!(titles(&sorted), vec!["a", "b", "c"]);
        // stored order is untouched
        assert_eq!(tasks[0].order, 9);
    }

    #[test]
    fn test_move_task_renumbers() {
        let tasks = vec![task("a", 1, 5), task("b", 2, 7), task("c", 3, 9)];

        let moved = move_task(&tasks, &tasks[2].id, &tasks[0].id).unwrap();
        let names: Vec<&str> = moved.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
        let orders: Vec<i64> = moved.iter().map(|t| t.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);

        let moved = move_task(&tasks, &tasks[0].id, &tasks[1].id).unwrap();
        let names: Vec<&str> = moved.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);

        assert!(move_task(&tasks, &tasks[0].id, &tasks[0].id).is_none());
        assert!(move_task(&tasks, "missing", &tasks[0].id).is_none());
    }

    #[test]
    fn test_move_task_follows_manual_order_not_storage() {
        // stored out of order, with a tie
        let tasks = vec![task("c", 1, 2), task("a", 2, 0), task("b", 3, 2)];

        let moved = move_task(&tasks, &tasks[1].id, &tasks[0].id).unwrap();
        let names: Vec<&str> = moved.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
        let orders: Vec<i64> = moved.iter().map(|t| t.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[test]
    fn test_flatten_rows() {
        let mut work = TaskGroup::new("Work".to_string(), None, 0);
        work.id = "g1".to_string();
        let mut home = TaskGroup::new("Home".to_string(), None, 1);
        home.id = "g2".to_string();
        home.expanded = false;

        let mut in_work = task("Slides", 1, 0);
        in_work.group_id = Some("g1".to_string());
        let mut in_home = task("Laundry", 2, 1);
        in_home.group_id = Some("g2".to_string());
        let loose = task("Read", 3, 2);
        let mut done = task("Done", 4, 3);
        done.completed = true;
        let tasks = vec![in_work.clone(), in_home, loose.clone(), done.clone()];
        let groups = vec![home, work];

        let rows = flatten_rows(&tasks, &groups, SortBy::Manual, true);
        assert_eq!(
            rows,
            vec![
                FlatRow::GroupHeader { group_id: "g1".to_string() },
                FlatRow::Task { task_id: in_work.id.clone(), section: Section::Group },
                FlatRow::GroupHeader { group_id: "g2".to_string() },
                FlatRow::Task { task_id: loose.id.clone(), section: Section::Ungrouped },
                FlatRow::Task { task_id: done.id.clone(), section: Section::Completed },
            ]
        );

        let rows = flatten_rows(&tasks, &groups, SortBy::Manual, false);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].task_id(), None);
        assert_eq!(rows[3].task_id(), Some(loose.id.as_str()));
    }
}
