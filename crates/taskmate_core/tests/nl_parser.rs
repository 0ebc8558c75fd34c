use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Timelike};
use taskmate_core::{
    extract_date_time, extract_tags, guess_category, guess_priority,
    parse_natural_language_task, suggest_deadline, FixedClock, TaskCategory, TaskDraft,
    TaskPriority,
};
use uuid::Uuid;

fn now() -> DateTime<Local> {
    Local
        .with_ymd_and_hms(2026, 3, 10, 9, 30, 0)
        .single()
        .expect("unambiguous local time")
}

fn clock() -> FixedClock {
    FixedClock(now())
}

#[test]
fn tomorrow_resolves_to_next_midnight() {
    let due = extract_date_time("finish slides tomorrow", &clock()).unwrap();
    assert_eq!(due.date_naive(), NaiveDate::from_ymd_opt(2026, 3, 11).unwrap());
    assert_eq!((due.hour(), due.minute(), due.second()), (0, 0, 0));
}

#[test]
fn tomorrow_with_time_uses_that_time() {
    let due = extract_date_time("dentist tomorrow at 4:15pm", &clock()).unwrap();
    assert_eq!(due.date_naive(), NaiveDate::from_ymd_opt(2026, 3, 11).unwrap());
    assert_eq!((due.hour(), due.minute()), (16, 15));
}

#[test]
fn month_phrase_wins_over_relative_day() {
    let due = extract_date_time("tomorrow or maybe on April 2nd", &clock()).unwrap();
    assert_eq!(due.date_naive(), NaiveDate::from_ymd_opt(2026, 4, 2).unwrap());
}

#[test]
fn time_phrase_alone_yields_no_due_date() {
    assert_eq!(extract_date_time("standup at 9am", &clock()), None);
    assert_eq!(extract_date_time("no dates here", &clock()), None);
}

#[test]
fn categories_follow_keyword_tables() {
    assert_eq!(
        guess_category("Prepare the quarterly report for my boss"),
        TaskCategory::Work
    );
    assert_eq!(
        guess_category("Buy groceries at the supermarket"),
        TaskCategory::Shopping
    );
    assert_eq!(
        guess_category("Call the doctor about my prescription"),
        TaskCategory::Health
    );
    assert_eq!(guess_category("Water the plants"), TaskCategory::Personal);
}

#[test]
fn priorities_follow_keyword_tables() {
    assert_eq!(
        guess_priority("This is urgent, needs ASAP attention"),
        TaskPriority::High
    );
    assert_eq!(
        guess_priority("It would be nice to do this soon"),
        TaskPriority::Medium
    );
    assert_eq!(
        guess_priority("Maybe someday I'll reorganize my closet"),
        TaskPriority::Low
    );
}

#[test]
fn tags_combine_hashtags_and_keywords() {
    let tags = extract_tags("Call John tomorrow at 5pm #followup");
    assert!(tags.contains(&"followup".to_string()));
    assert!(tags.contains(&"call".to_string()));
}

#[test]
fn reparsing_description_does_not_restore_input() {
    let input = "Call John tomorrow at 5pm #followup";
    let first = parse_natural_language_task(input, &clock());
    let second = parse_natural_language_task(&first.description, &clock());

    assert_ne!(second.title, input);
    assert!(second.description.starts_with("Created from: "));
}

#[test]
fn deadline_without_history_uses_work_offset() {
    let suggested = suggest_deadline("Prepare client presentation", "", &[], &clock());
    assert_eq!(suggested, now() + Duration::days(2));
}

#[test]
fn deadline_follows_single_similar_task() {
    let mut draft = TaskDraft::new("Prepare client presentation");
    draft.category = TaskCategory::Work;
    let created_at = now() - Duration::days(20);
    draft.due_date = Some(created_at + Duration::days(5));
    let history = vec![draft.into_task(Uuid::new_v4(), created_at)];

    let suggested = suggest_deadline("client presentation", "", &history, &clock());
    assert_eq!(suggested, now() + Duration::days(5));
}

#[test]
fn bill_payment_sentence_parses_end_to_end() {
    let input = "Pay electricity bill tomorrow #bills";
    let draft = parse_natural_language_task(input, &clock());

    assert_eq!(draft.title, input);
    assert_eq!(draft.category, TaskCategory::Finance);
    assert_eq!(draft.priority, TaskPriority::Low);
    assert!(draft.tags.contains(&"bills".to_string()));
    assert_eq!(
        draft.due_date.map(|due| due.date_naive()),
        NaiveDate::from_ymd_opt(2026, 3, 11)
    );
    assert!(!draft.completed);
    assert!(draft.subtasks.is_empty());
}
