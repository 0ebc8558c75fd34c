use chrono::{DateTime, Duration, Local, TimeZone};
use taskmate_core::db::open_db_in_memory;
use taskmate_core::{
    RepoError, SqliteTaskRepository, SubTask, Task, TaskCategory, TaskDraft, TaskListQuery,
    TaskPriority, TaskRepository, TaskSort, TaskValidationError,
};
use uuid::Uuid;

fn base_time() -> DateTime<Local> {
    Local
        .with_ymd_and_hms(2026, 3, 10, 9, 0, 0)
        .single()
        .expect("unambiguous local time")
}

fn task(title: &str, minutes_after_base: i64) -> Task {
    TaskDraft::new(title).into_task(
        Uuid::new_v4(),
        base_time() + Duration::minutes(minutes_after_base),
    )
}

#[test]
fn create_and_get_roundtrip_preserves_all_fields() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteTaskRepository::try_new(&mut conn).unwrap();

    let mut draft = TaskDraft::new("Quarterly report");
    draft.description = "Numbers for Q1".to_string();
    draft.due_date = Some(base_time() + Duration::days(2));
    draft.category = TaskCategory::Work;
    draft.priority = TaskPriority::High;
    draft.tags = vec!["Reports".to_string(), "q1".to_string()];
    draft.subtasks = vec![SubTask::new("collect data"), SubTask::new("write summary")];
    let created = draft.into_task(Uuid::new_v4(), base_time());

    let id = repo.create_task(&created).unwrap();
    let loaded = repo.get_task(id).unwrap().unwrap();

    assert_eq!(loaded.title, "Quarterly report");
    assert_eq!(loaded.description, "Numbers for Q1");
    assert_eq!(loaded.due_date, created.due_date);
    assert_eq!(loaded.created_at, base_time());
    assert_eq!(loaded.category, TaskCategory::Work);
    assert_eq!(loaded.priority, TaskPriority::High);
    assert_eq!(loaded.tags, vec!["q1".to_string(), "reports".to_string()]);
    assert_eq!(loaded.subtasks, created.subtasks);
    assert!(!loaded.completed);
}

#[test]
fn create_rejects_blank_title() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteTaskRepository::try_new(&mut conn).unwrap();

    let err = repo.create_task(&task("   ", 0)).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(TaskValidationError::BlankTitle)
    ));
}

#[test]
fn update_replaces_fields_subtasks_and_tags_but_keeps_created_at() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteTaskRepository::try_new(&mut conn).unwrap();

    let mut original = task("draft", 0);
    original.tags = vec!["old".to_string()];
    original.subtasks = vec![SubTask::new("first")];
    repo.create_task(&original).unwrap();

    let mut changed = original.clone();
    changed.title = "final".to_string();
    changed.completed = true;
    changed.created_at = base_time() + Duration::days(100);
    changed.tags = vec!["new".to_string()];
    changed.subtasks = vec![SubTask::new("second"), original.subtasks[0].clone()];
    repo.update_task(&changed).unwrap();

    let loaded = repo.get_task(original.id).unwrap().unwrap();
    assert_eq!(loaded.title, "final");
    assert!(loaded.completed);
    assert_eq!(loaded.created_at, base_time());
    assert_eq!(loaded.tags, vec!["new".to_string()]);
    assert_eq!(loaded.subtasks.len(), 2);
    assert_eq!(loaded.subtasks[0].title, "second");
    assert_eq!(loaded.subtasks[1].id, original.subtasks[0].id);
}

#[test]
fn update_missing_task_returns_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteTaskRepository::try_new(&mut conn).unwrap();

    let missing = task("missing", 0);
    let err = repo.update_task(&missing).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == missing.id));
}

#[test]
fn delete_removes_task_and_cascades() {
    let mut conn = open_db_in_memory().unwrap();
    {
        let mut repo = SqliteTaskRepository::try_new(&mut conn).unwrap();
        let mut doomed = task("doomed", 0);
        doomed.tags = vec!["gone".to_string()];
        doomed.subtasks = vec![SubTask::new("child")];
        repo.create_task(&doomed).unwrap();

        repo.delete_task(doomed.id).unwrap();
        assert!(repo.get_task(doomed.id).unwrap().is_none());
        assert!(matches!(
            repo.delete_task(doomed.id).unwrap_err(),
            RepoError::NotFound(_)
        ));
    }

    let orphans: i64 = conn
        .query_row(
            "SELECT (SELECT COUNT(*) FROM subtasks) + (SELECT COUNT(*) FROM task_tags);",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(orphans, 0);
}

#[test]
fn list_defaults_to_newest_first() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteTaskRepository::try_new(&mut conn).unwrap();

    let older = task("older", 0);
    let newer = task("newer", 10);
    repo.create_task(&older).unwrap();
    repo.create_task(&newer).unwrap();

    let listed = repo.list_tasks(&TaskListQuery::default()).unwrap();
    let ids = listed.iter().map(|task| task.id).collect::<Vec<_>>();
    assert_eq!(ids, vec![newer.id, older.id]);

    let ascending = repo
        .list_tasks(&TaskListQuery {
            sort: TaskSort::CreatedAtAsc,
            ..TaskListQuery::default()
        })
        .unwrap();
    assert_eq!(ascending[0].id, older.id);
}

#[test]
fn due_date_sort_puts_undated_tasks_last() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteTaskRepository::try_new(&mut conn).unwrap();

    let undated = task("undated", 0);
    let mut late = task("late", 1);
    late.due_date = Some(base_time() + Duration::days(9));
    let mut soon = task("soon", 2);
    soon.due_date = Some(base_time() + Duration::days(1));
    for item in [&undated, &late, &soon] {
        repo.create_task(item).unwrap();
    }

    let listed = repo
        .list_tasks(&TaskListQuery {
            sort: TaskSort::DueDateAsc,
            ..TaskListQuery::default()
        })
        .unwrap();
    let titles = listed.iter().map(|task| task.title.as_str()).collect::<Vec<_>>();
    assert_eq!(titles, vec!["soon", "late", "undated"]);
}

#[test]
fn search_matches_title_description_and_tags_case_insensitively() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteTaskRepository::try_new(&mut conn).unwrap();

    let by_title = task("Renew PASSPORT", 0);
    let mut by_description = task("errand", 1);
    by_description.description = "bring passport photos".to_string();
    let mut by_tag = task("travel prep", 2);
    by_tag.tags = vec!["passports".to_string()];
    let unrelated = task("water plants", 3);
    for item in [&by_title, &by_description, &by_tag, &unrelated] {
        repo.create_task(item).unwrap();
    }

    let hits = repo
        .list_tasks(&TaskListQuery {
            search: Some("passport".to_string()),
            ..TaskListQuery::default()
        })
        .unwrap();
    assert_eq!(hits.len(), 3);
    assert!(hits.iter().all(|task| task.id != unrelated.id));
}

#[test]
fn search_treats_wildcards_literally() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteTaskRepository::try_new(&mut conn).unwrap();

    repo.create_task(&task("50% off sale", 0)).unwrap();
    repo.create_task(&task("500 items", 1)).unwrap();

    let hits = repo
        .list_tasks(&TaskListQuery {
            search: Some("50%".to_string()),
            ..TaskListQuery::default()
        })
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "50% off sale");
}

#[test]
fn list_filters_by_category_priority_and_completion() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteTaskRepository::try_new(&mut conn).unwrap();

    let mut work_high = task("work high", 0);
    work_high.category = TaskCategory::Work;
    work_high.priority = TaskPriority::High;
    let mut work_done = task("work done", 1);
    work_done.category = TaskCategory::Work;
    work_done.completed = true;
    let mut health = task("health", 2);
    health.category = TaskCategory::Health;
    for item in [&work_high, &work_done, &health] {
        repo.create_task(item).unwrap();
    }

    let work = repo
        .list_tasks(&TaskListQuery {
            category: Some(TaskCategory::Work),
            ..TaskListQuery::default()
        })
        .unwrap();
    assert_eq!(work.len(), 2);

    let open_work = repo
        .list_tasks(&TaskListQuery {
            category: Some(TaskCategory::Work),
            completed: Some(false),
            ..TaskListQuery::default()
        })
        .unwrap();
    assert_eq!(open_work.len(), 1);
    assert_eq!(open_work[0].id, work_high.id);

    let high = repo
        .list_tasks(&TaskListQuery {
            priority: Some(TaskPriority::High),
            ..TaskListQuery::default()
        })
        .unwrap();
    assert_eq!(high.len(), 1);
}

#[test]
fn list_applies_limit_and_offset() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteTaskRepository::try_new(&mut conn).unwrap();
    for idx in 0..5 {
        repo.create_task(&task(&format!("task {idx}"), idx)).unwrap();
    }

    let page = repo
        .list_tasks(&TaskListQuery {
            limit: Some(2),
            offset: 1,
            ..TaskListQuery::default()
        })
        .unwrap();
    let titles = page.iter().map(|task| task.title.as_str()).collect::<Vec<_>>();
    assert_eq!(titles, vec!["task 3", "task 2"]);

    let tail = repo
        .list_tasks(&TaskListQuery {
            offset: 4,
            ..TaskListQuery::default()
        })
        .unwrap();
    assert_eq!(tail.len(), 1);
    assert_eq!(tail[0].title, "task 0");
}

#[test]
fn list_tags_returns_tags_in_use_sorted() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteTaskRepository::try_new(&mut conn).unwrap();

    let mut first = task("a", 0);
    first.tags = vec!["Zeta".to_string(), "alpha".to_string()];
    let mut second = task("b", 1);
    second.tags = vec!["ALPHA".to_string()];
    repo.create_task(&first).unwrap();
    repo.create_task(&second).unwrap();

    assert_eq!(
        repo.list_tags().unwrap(),
        vec!["alpha".to_string(), "zeta".to_string()]
    );

    repo.delete_task(first.id).unwrap();
    assert_eq!(repo.list_tags().unwrap(), vec!["alpha".to_string()]);
}

#[test]
fn search_folds_non_ascii_case() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteTaskRepository::try_new(&mut conn).unwrap();

    let accented = task("Réserver le CAFÉ", 0);
    let mut by_description = task("errand", 1);
    by_description.description = "ÉCOLE pickup".to_string();
    repo.create_task(&accented).unwrap();
    repo.create_task(&by_description).unwrap();
    repo.create_task(&task("tea time", 2)).unwrap();

    let search = |repo: &SqliteTaskRepository<'_>, text: &str| {
        repo.list_tasks(&TaskListQuery {
            search: Some(text.to_string()),
            ..TaskListQuery::default()
        })
        .unwrap()
    };

    let hits = search(&repo, "café");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, accented.id);

    let hits = search(&repo, "École");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, by_description.id);
}
