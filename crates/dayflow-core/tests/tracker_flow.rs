//! Integration tests for the task -> stats -> pomodoro -> persistence loop.

use chrono::{Days, FixedOffset, NaiveDate, TimeZone};
use dayflow_core::{
    Action, AppStore, Database, Event, IdGenerator, PomodoroPhase, SessionId, StateGateway,
    UuidGenerator,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 12).unwrap()
}

fn at(day: NaiveDate, hour: u32) -> chrono::DateTime<FixedOffset> {
    FixedOffset::east_opt(0)
        .unwrap()
        .from_local_datetime(&day.and_hms_opt(hour, 0, 0).unwrap())
        .single()
        .unwrap()
}

fn add_task(store: &mut AppStore<Database>, text: &str, when: chrono::DateTime<FixedOffset>) -> String {
    let state = store
        .dispatch(
            Action::AddTask {
                text: text.into(),
                at: when,
            },
            today(),
            &UuidGenerator,
        )
        .unwrap();
    state.tasks.last().unwrap().id.clone()
}

#[test]
fn focus_time_flows_back_into_history() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dayflow.db");

    let task_id = {
        let mut store = AppStore::open(Database::open_at(&path).unwrap(), today());
        let yesterday = today().checked_sub_days(Days::new(1)).unwrap();
        add_task(&mut store, "outline chapter", at(yesterday, 21));
        let task_id = add_task(&mut store, "draft chapter", at(today(), 11));

        assert_eq!(store.state().tasks[0].session, SessionId::Night);
        assert_eq!(store.state().tasks[1].session, SessionId::Midday);
        assert_eq!(store.state().streak, 2);

        let db = store.gateway();
        let mut timer = db.load_timer(&store.state().pomodoro_settings);
        timer.attach_task(store.state().focus_task(&task_id).unwrap());
        timer.start();

        let mut completion = None;
        while timer.phase() == PomodoroPhase::Focusing {
            if let Some(done) = timer.tick().completion() {
                completion = Some(done);
            }
        }
        assert_eq!(timer.phase(), PomodoroPhase::OnBreak);
        db.save_timer(&timer);

        store
            .dispatch(Action::RecordFocus(completion.unwrap()), today(), &UuidGenerator)
            .unwrap();
        task_id
    };

    let db = Database::open_at(&path).unwrap();
    let state = db.load();
    let task = state.task(&task_id).unwrap();
    assert_eq!(task.focus_minutes, 25);
    assert!(task.pomodoro_completed);

    let timer = db.load_timer(&state.pomodoro_settings);
    assert_eq!(timer.phase(), PomodoroPhase::OnBreak);
    assert_eq!(timer.state().sessions_completed, 1);
    assert_eq!(timer.state().time_left, 300);
}

#[test]
fn stats_follow_deletions() {
    let db = Database::open_memory().unwrap();
    let mut store = AppStore::open(db, today());
    for offset in [0u64, 1, 2] {
        let day = today().checked_sub_days(Days::new(offset)).unwrap();
        add_task(&mut store, "daily review", at(day, 9));
    }
    assert_eq!(store.state().streak, 3);

    // Removing the middle day breaks the streak after today.
    store
        .dispatch(Action::DeleteTask { index: 1 }, today(), &UuidGenerator)
        .unwrap();
    assert_eq!(store.state().streak, 1);
    assert!((store.state().rolling_average - 2.0 / 30.0).abs() < 1e-9);

    let report = store.state().report(today());
    assert_eq!(report.today_count, 1);
    assert_eq!(report.heatmap.iter().map(|d| d.count).sum::<u32>(), 2);
}

#[test]
fn completion_event_names_task_and_minutes() {
    let mut timer = dayflow_core::PomodoroTimer::new(dayflow_core::PomodoroSettings {
        work_duration: 2,
        ..Default::default()
    });
    let id = UuidGenerator.generate();
    timer.attach_task(dayflow_core::FocusTask {
        id: id.clone(),
        text: "inbox zero".into(),
    });
    timer.start();
    let events: Vec<Event> = (0..120).filter_map(|_| timer.tick().event).collect();
    assert_eq!(events.len(), 1);
    let completion = events[0].completion().unwrap();
    assert_eq!(completion.task_id, id);
    assert_eq!(completion.focus_minutes_added, 2);
}
