use chrono::NaiveDate;
use crate::models::{Tag, Task};

fn sample(id: u64, name: &str, completed: bool, when: Option<NaiveDate>) -> Task {
    Task {
        id,
        name: name.to_string(),
        completed,
        when,
        notes: None,
        tags: Vec::new(),
        checklist: Vec::new(),
        priority: None,
        selected: false,
        expanded: false,
    }
}

/// Sample collection shown by the app when no task file is configured.
///
/// One task done today (tagged), one open today, one in the inbox.
pub fn today_tasks(today: NaiveDate) -> Vec<Task> {
    let mut done = sample(1, "Task 1", true, Some(today));
    done.tags.push(Tag {
        id: "1".to_string(),
        value: "Svelte".to_string(),
        color: None,
        description: None,
    });
    vec![
        done,
        sample(2, "Task 2", false, Some(today)),
        sample(3, "Task 3", false, None),
    ]
}

/// Sample collection for the inbox list.
pub fn inbox_tasks(today: NaiveDate) -> Vec<Task> {
    vec![
        sample(1, "Task 1", true, Some(today)),
        sample(2, "Task 2", false, Some(today)),
        sample(3, "Task 3", false, None),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ViewFilter;
    use crate::task_utils::classify_by_view;

    #[test]
    fn test_today_sample_partitions() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let p = classify_by_view(&today_tasks(today), &ViewFilter::Day(today));
        assert_eq!(p.available.len(), 1);
        assert_eq!(p.completed.len(), 1);
        assert_eq!(p.completed[0].tags[0].value, "Svelte");
    }

    #[test]
    fn test_inbox_sample_has_one_unscheduled() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let p = classify_by_view(&inbox_tasks(today), &ViewFilter::Inbox);
        assert_eq!(p.available.len(), 1);
        assert_eq!(p.available[0].id, 3);
        assert!(p.completed.is_empty());
    }
}
