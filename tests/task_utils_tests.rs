use daybook::models::{ChecklistItem, Priority, Tag, Task, TaskAction, TaskPatch, ViewFilter};
use daybook::task_utils::*;
use daybook::DaybookError;
use chrono::{Datelike, Duration, Local, NaiveDate};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn task(id: u64, when: Option<NaiveDate>, completed: bool) -> Task {
    Task {
        id,
        name: format!("Task {}", id),
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

fn mixed() -> Vec<Task> {
    vec![
        task(1, Some(day(2024, 1, 3)), false),
        task(2, None, false),
        task(3, Some(day(2024, 1, 1)), true),
        task(4, Some(day(2024, 1, 1)), false),
        task(5, None, true),
        task(6, Some(day(2024, 1, 3)), false),
    ]
}

#[test]
fn test_create_task_id_follows_max() {
    let tasks = vec![task(7, None, false), task(2, None, false)];
    let t = create_task(&tasks, None).unwrap();
    assert_eq!(t.id, 8);
    assert!(t.name.is_empty());
    assert!(!t.completed);
    assert!(!t.selected);
    assert!(t.expanded);
    assert!(t.checklist.is_empty());
    assert_eq!(t.when, None);
    // pure constructor
    assert_eq!(tasks.len(), 2);
}

#[test]
fn test_create_task_on_empty_collection() {
    let t = create_task(&[], Some(day(2024, 1, 1))).unwrap();
    assert_eq!(t.id, 1);
    assert_eq!(t.when, Some(day(2024, 1, 1)));
}

#[test]
fn test_ids_not_reused_after_delete_of_lower_id() {
    let tasks = apply_action(&mixed(), &TaskAction::Delete(2));
    assert_eq!(create_task(&tasks, None).unwrap().id, 7);
}

#[test]
fn test_append_task_adds_one_at_tail() {
    let tasks = mixed();
    let out = append_task(&tasks, None).unwrap();
    assert_eq!(out.len(), tasks.len() + 1);
    assert_eq!(&out[..tasks.len()], &tasks[..]);
    assert_eq!(out.last().unwrap().id, 7);
}

#[test]
fn test_classify_all_is_a_partition() {
    let tasks = mixed();
    let p = classify_by_view(&tasks, &ViewFilter::All);
    assert_eq!(p.len(), tasks.len());
    assert!(p.available.iter().all(|t| !t.completed));
    assert!(p.completed.iter().all(|t| t.completed));
    let mut ids: Vec<u64> = p.available.iter().chain(p.completed.iter()).map(|t| t.id).collect();
    ids.sort();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn test_classify_sorts_by_day_with_inbox_last() {
    let p = classify_by_view(&mixed(), &ViewFilter::All);
    let available: Vec<u64> = p.available.iter().map(|t| t.id).collect();
    let completed: Vec<u64> = p.completed.iter().map(|t| t.id).collect();
    assert_eq!(available, vec![4, 1, 6, 2]);
    assert_eq!(completed, vec![3, 5]);
}

#[test]
fn test_classify_day_view() {
    let p = classify_by_view(&mixed(), &ViewFilter::Day(day(2024, 1, 1)));
    assert_eq!(p.available.iter().map(|t| t.id).collect::<Vec<_>>(), vec![4]);
    assert_eq!(p.completed.iter().map(|t| t.id).collect::<Vec<_>>(), vec![3]);
}

#[test]
fn test_classify_inbox_view() {
    let p = classify_by_view(&mixed(), &ViewFilter::Inbox);
    assert_eq!(p.available.iter().map(|t| t.id).collect::<Vec<_>>(), vec![2]);
    assert_eq!(p.completed.iter().map(|t| t.id).collect::<Vec<_>>(), vec![5]);
}

#[test]
fn test_classify_example_scenario() {
    let tasks: Vec<Task> = serde_json::from_str(
        r#"[{"id": 1, "when": "2024-01-01", "completed": false},
            {"id": 2, "when": null, "completed": false}]"#,
    )
    .unwrap();
    let p = classify_by_view(&tasks, &ViewFilter::Day(day(2024, 1, 1)));
    assert_eq!(p.available.len(), 1);
    assert_eq!(p.available[0].id, 1);
    assert!(p.completed.is_empty());
}

#[test]
fn test_classify_matches_any_time_within_day() {
    let tasks: Vec<Task> = serde_json::from_str(
        r#"[{"id": 1, "when": "2024-01-01T00:00:00"},
            {"id": 2, "when": "2024-01-01T18:45:10.250"},
            {"id": 3, "when": "2024-01-02T00:00:00"}]"#,
    )
    .unwrap();
    let p = classify_by_view(&tasks, &ViewFilter::Day(day(2024, 1, 1)));
    assert_eq!(p.available.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1, 2]);
}

#[test]
fn test_classify_does_not_touch_input() {
    let tasks = mixed();
    let before = tasks.clone();
    let _ = classify_by_view(&tasks, &ViewFilter::All);
    assert_eq!(tasks, before);
}

#[test]
fn test_select_is_exclusive() {
    let mut tasks = mixed();
    tasks[0].selected = true;
    let out = apply_action(&tasks, &TaskAction::Select(4));
    assert_eq!(out.iter().filter(|t| t.selected).count(), 1);
    assert_eq!(selected_task(&out).map(|t| t.id), Some(4));
    for (a, b) in tasks.iter().zip(out.iter()) {
        assert_eq!(a.completed, b.completed);
        assert_eq!(a.name, b.name);
    }
}

#[test]
fn test_select_missing_id_clears_selection() {
    let mut tasks = mixed();
    tasks[2].selected = true;
    let out = apply_action(&tasks, &TaskAction::Select(99));
    assert!(out.iter().all(|t| !t.selected));
}

#[test]
fn test_delete_preserves_order() {
    let tasks = mixed();
    let out = apply_action(&tasks, &TaskAction::Delete(3));
    assert_eq!(out.len(), tasks.len() - 1);
    assert_eq!(out.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1, 2, 4, 5, 6]);

    let same = apply_action(&tasks, &TaskAction::Delete(42));
    assert_eq!(same, tasks);
}

#[test]
fn test_complete_round_trip() {
    let mut tasks = mixed();
    tasks[0].selected = true;
    tasks[0].notes = Some("keep me".into());
    let done = apply_action(&tasks, &TaskAction::Complete { id: 1, completed: true });
    assert!(done[0].completed);
    assert!(done[0].selected);
    let back = apply_action(&done, &TaskAction::Complete { id: 1, completed: false });
    assert_eq!(back, tasks);
}

#[test]
fn test_update_is_shallow_merge() {
    let mut tasks = mixed();
    tasks[1].notes = Some("old notes".into());
    tasks[1].priority = Some(Priority::Low);
    tasks[1].tags = vec![Tag::new("home")];
    tasks[1].selected = true;

    let patch = TaskPatch::new(2).name("Renamed").priority(None).when(Some(day(2024, 2, 2)));
    let out = apply_action(&tasks, &TaskAction::Update(patch));

    let t = &out[1];
    assert_eq!(t.name, "Renamed");
    assert_eq!(t.priority, None);
    assert_eq!(t.when, Some(day(2024, 2, 2)));
    // untouched fields survive
    assert_eq!(t.notes.as_deref(), Some("old notes"));
    assert_eq!(t.tags, vec![Tag::new("home")]);
    assert!(!t.selected);
    // other tasks unchanged
    assert_eq!(out[0], tasks[0]);
    assert_eq!(&out[2..], &tasks[2..]);
}

#[test]
fn test_update_with_empty_collections_replaces() {
    let mut tasks = mixed();
    tasks[0].checklist = vec![ChecklistItem { id: 1, name: "a".into(), completed: false }];
    tasks[0].tags = vec![Tag::new("x")];
    let patch = TaskPatch::new(1).checklist(Vec::new()).tags(Vec::new());
    let out = apply_action(&tasks, &TaskAction::Update(patch));
    assert!(out[0].checklist.is_empty());
    assert!(out[0].tags.is_empty());
}

#[test]
fn test_try_apply_reports_missing_id() {
    let tasks = mixed();
    let complete = TaskAction::Complete { id: 77, completed: true };
    let err = try_apply_action(&tasks, &complete).unwrap_err();
    assert!(matches!(err, DaybookError::NotFound(77)));
    assert!(try_apply_action(&tasks, &TaskAction::Delete(1)).is_ok());
}

#[test]
fn test_checklist_items_keep_ids() {
    let t = task(1, None, false);
    let t = add_checklist_item(&t, "one").unwrap();
    let t = add_checklist_item(&t, "two").unwrap();
    let t = remove_checklist_item(&t, 1).unwrap();
    let t = add_checklist_item(&t, "three").unwrap();
    let ids: Vec<u64> = t.checklist.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![2, 3]);

    let t = set_checklist_item(&t, 3, true).unwrap();
    assert!(t.checklist[1].completed);
    assert!(set_checklist_item(&t, 9, true).is_err());
}

#[test]
fn test_format_display_date_relative_days() {
    let today = Local::now().date_naive();
    assert_eq!(format_display_date(Some(today)), "Today");
    assert_eq!(format_display_date(Some(today + Duration::days(1))), "Tomorrow");

    let plus3 = today + Duration::days(3);
    assert_eq!(format_display_date(Some(plus3)), plus3.format("%A").to_string());

    let far = today + Duration::days(400);
    let s = format_display_date(Some(far));
    assert!(s.contains(&far.year().to_string()));
    assert_eq!(format_display_date(None), "");
}

#[test]
fn test_format_display_date_from_fixed_today() {
    let today = day(2024, 3, 4);
    assert_eq!(format_display_date_from(Some(day(2024, 3, 6)), today), "Wednesday");
    assert_eq!(format_display_date_from(Some(day(2024, 3, 9)), today), "Saturday");
    assert_eq!(format_display_date_from(Some(day(2024, 3, 10)), today), "Sun, 10 Mar");
    assert_eq!(format_display_date_from(Some(day(2025, 1, 2)), today), "2 Jan 2025");
}

#[test]
fn test_format_display_str() {
    assert_eq!(format_display_str(""), "");
    assert_eq!(format_display_str("not a date"), "");
    let today = Local::now().date_naive();
    assert_eq!(format_display_str(&today.format("%Y-%m-%d").to_string()), "Today");
}
