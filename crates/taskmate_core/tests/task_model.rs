use chrono::{Local, TimeZone};
use taskmate_core::{SubTask, Task, TaskCategory, TaskDraft, TaskPriority, TaskValidationError};
use uuid::Uuid;

fn sample_task() -> Task {
    let created_at = Local
        .with_ymd_and_hms(2026, 3, 10, 9, 0, 0)
        .single()
        .expect("unambiguous local time");
    let mut draft = TaskDraft::new("Pay rent");
    draft.category = TaskCategory::Finance;
    draft.priority = TaskPriority::High;
    draft.tags = vec!["bills".to_string()];
    draft.subtasks = vec![SubTask::new("log in to bank")];
    draft.into_task(
        Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap(),
        created_at,
    )
}

#[test]
fn draft_defaults_match_manual_entry() {
    let draft = TaskDraft::new("Stretch");

    assert_eq!(draft.category, TaskCategory::Personal);
    assert_eq!(draft.priority, TaskPriority::Medium);
    assert_eq!(draft.due_date, None);
    assert!(!draft.completed);
    assert!(draft.tags.is_empty());
    assert!(draft.subtasks.is_empty());
}

#[test]
fn task_serialization_uses_expected_wire_fields() {
    let task = sample_task();

    let json = serde_json::to_value(&task).unwrap();
    assert_eq!(json["id"], "11111111-2222-4333-8444-555555555555");
    assert_eq!(json["category"], "Finance");
    assert_eq!(json["priority"], "high");
    assert_eq!(json["completed"], false);
    assert_eq!(json["due_date"], serde_json::Value::Null);
    assert_eq!(json["tags"][0], "bills");
    assert_eq!(json["subtasks"][0]["title"], "log in to bank");

    let decoded: Task = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, task);
}

#[test]
fn validate_rejects_nil_id_and_blank_titles() {
    let mut task = sample_task();
    task.id = Uuid::nil();
    assert_eq!(task.validate(), Err(TaskValidationError::NilId));

    let mut task = sample_task();
    task.title = "  ".to_string();
    assert_eq!(task.validate(), Err(TaskValidationError::BlankTitle));

    let mut task = sample_task();
    let blank = SubTask::new("");
    let blank_id = blank.id;
    task.subtasks.push(blank);
    assert_eq!(
        task.validate(),
        Err(TaskValidationError::BlankSubTaskTitle(blank_id))
    );
}

#[test]
fn category_and_priority_parse_case_insensitively() {
    assert_eq!("work".parse::<TaskCategory>(), Ok(TaskCategory::Work));
    assert_eq!("LOW".parse::<TaskPriority>(), Ok(TaskPriority::Low));
    assert!("chores".parse::<TaskCategory>().is_err());
    assert_eq!(TaskCategory::Education.to_string(), "Education");
    assert_eq!(TaskPriority::Medium.to_string(), "medium");
}
