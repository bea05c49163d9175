use std::cell::RefCell;
use std::fs;
use std::rc::Rc;
use std::time::Duration;

use logic_drill::bank::{FallbackPolicy, QuestionCatalog};
use logic_drill::config::Config;
use logic_drill::engine::{Mode, Skill, StatsTable};
use logic_drill::provider::LogicProvider;
use logic_drill::session::{ManualClock, Screen, SessionController, SessionCounts};
use logic_drill::settings::{LANGUAGE, QUESTION_COUNT, TIME_LIMIT_SECONDS, Language};
use logic_drill::store::json_store::JsonStore;
use tempfile::TempDir;

fn new_controller(store: Option<JsonStore>, clock: &ManualClock) -> SessionController {
    let provider = LogicProvider::with_seed(
        Box::new(QuestionCatalog::embedded()),
        FallbackPolicy::Nearest,
        42,
    );
    SessionController::new(Box::new(provider), store, &Config::default())
        .with_clock(Box::new(clock.clone()))
}

fn answer_correctly(ctl: &mut SessionController) {
    let answer = ctl.question().expect("active question").answer.clone();
    ctl.submit_answer(&answer);
}

fn answer_wrong(ctl: &mut SessionController) {
    let q = ctl.question().expect("active question");
    let wrong = q
        .options
        .iter()
        .find(|o| !o.eq_ignore_ascii_case(&q.answer))
        .expect("a wrong option")
        .clone();
    ctl.submit_answer(&wrong);
}

#[test]
fn perfect_mix_session_reaches_summary() {
    let clock = ManualClock::new();
    let mut ctl = new_controller(None, &clock);
    let completed = Rc::new(RefCell::new(None));
    let sink = completed.clone();
    ctl.set_on_complete(Box::new(move |counts: &SessionCounts| *sink.borrow_mut() = Some(*counts)));

    ctl.start_session(Mode::Mix);
    for i in 1..=10 {
        assert_eq!(ctl.screen(), Screen::Drill);
        assert_eq!(ctl.question_index(), i);
        clock.advance(Duration::from_millis(1500));
        answer_correctly(&mut ctl);
        assert!(ctl.feedback().unwrap().correct);
        clock.advance(Duration::from_millis(700));
        ctl.poll_timers();
    }

    assert_eq!(ctl.screen(), Screen::Summary);
    let counts = ctl.session();
    assert_eq!(counts, SessionCounts { correct: 10, wrong: 0 });
    assert_eq!(counts.accuracy(), 100);
    assert_eq!(*completed.borrow(), Some(counts));
    assert_eq!(ctl.stats().all_attempts().count(), 10);
    assert!(ctl.stats().all_attempts().all(|a| a.correct && a.ms == 1500));
}

#[test]
fn mix_mode_spreads_over_skills() {
    let clock = ManualClock::new();
    let mut ctl = new_controller(None, &clock);
    ctl.start_session(Mode::Mix);

    let mut seen = Vec::new();
    for _ in 0..4 {
        seen.push(ctl.question().unwrap().skill);
        answer_correctly(&mut ctl);
        ctl.advance_to_next();
    }
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 4, "each correct answer moves focus to an untried skill");
}

#[test]
fn single_skill_levels_up_then_down() {
    let clock = ManualClock::new();
    let mut ctl = new_controller(None, &clock);
    for _ in 0..10 {
        ctl.adjust_setting(QUESTION_COUNT, 1);
    }
    ctl.start_session(Mode::Single(Skill::Deduction));

    for _ in 0..5 {
        answer_correctly(&mut ctl);
        ctl.advance_to_next();
    }
    let s = ctl.stats().get(Skill::Deduction).unwrap();
    assert_eq!(s.level, 2);
    assert_eq!(s.streak, 0);
    assert_eq!(ctl.question().unwrap().level, 2);

    for _ in 0..2 {
        answer_wrong(&mut ctl);
        ctl.advance_to_next();
    }
    let s = ctl.stats().get(Skill::Deduction).unwrap();
    assert_eq!(s.level, 1);
    assert_eq!(s.mistake_streak, 0);
    assert_eq!(ctl.session(), SessionCounts { correct: 5, wrong: 2 });
}

#[test]
fn unanswered_question_times_out_and_moves_on() {
    let clock = ManualClock::new();
    let mut ctl = new_controller(None, &clock);
    ctl.adjust_setting(TIME_LIMIT_SECONDS, -2);
    ctl.start_session(Mode::Single(Skill::Fallacy));

    for _ in 0..10 {
        clock.advance(Duration::from_secs(1));
        ctl.poll_timers();
    }
    let fb = ctl.feedback().expect("timeout feedback").clone();
    assert!(fb.timed_out);
    assert!(!fb.correct);
    assert_eq!(fb.ms, 10_000);
    assert_eq!(ctl.time_left(), 0);
    assert_eq!(ctl.stats().get(Skill::Fallacy).unwrap().mistake_streak, 1);

    answer_correctly(&mut ctl);
    assert_eq!(ctl.session(), SessionCounts { correct: 0, wrong: 1 });

    clock.advance(Duration::from_millis(700));
    ctl.poll_timers();
    assert_eq!(ctl.question_index(), 2);
    assert!(!ctl.answered());
}

#[test]
fn indonesian_questions_are_served() {
    let clock = ManualClock::new();
    let mut ctl = new_controller(None, &clock);
    ctl.adjust_setting(LANGUAGE, 1);
    assert_eq!(ctl.language(), Language::Id);
    ctl.start_session(Mode::Single(Skill::Syllogism));
    let q = ctl.question().unwrap();
    assert!(q.id.contains("-id-"), "got {}", q.id);

    ctl.submit_answer("");
    let message = ctl.error_message().unwrap();
    assert_ne!(message, "Please select an answer.");
}

#[test]
fn progress_persists_under_namespaced_keys() {
    let dir = TempDir::new().unwrap();
    let clock = ManualClock::new();
    {
        let store = JsonStore::new(dir.path().to_path_buf()).unwrap();
        let mut ctl = new_controller(Some(store), &clock);
        ctl.adjust_setting(TIME_LIMIT_SECONDS, 2);
        ctl.start_session(Mode::Single(Skill::Induction));
        answer_correctly(&mut ctl);
    }

    assert!(dir.path().join("logic-training_session_logic.json").exists());
    assert!(dir.path().join("logic-training_settings.json").exists());

    let store = JsonStore::new(dir.path().to_path_buf()).unwrap();
    let ctl = new_controller(Some(store), &clock);
    assert_eq!(ctl.screen(), Screen::Menu);
    assert_eq!(ctl.mode(), Mode::Single(Skill::Induction));
    assert_eq!(ctl.settings().time_limit_seconds, 30);
    let s = ctl.stats().get(Skill::Induction).unwrap();
    assert_eq!(s.streak, 1);
    assert_eq!(s.history.len(), 1);
}

#[test]
fn corrupt_saved_state_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("logic-training_session_logic.json"), "{ \"stats\": 7").unwrap();
    fs::write(
        dir.path().join("logic-training_settings.json"),
        r#"{ "timeLimitSeconds": 1 }"#,
    )
    .unwrap();

    let clock = ManualClock::new();
    let store = JsonStore::new(dir.path().to_path_buf()).unwrap();
    let mut ctl = new_controller(Some(store), &clock);
    assert_eq!(ctl.stats(), &StatsTable::default());
    assert_eq!(ctl.settings().time_limit_seconds, 10);
    assert_eq!(ctl.settings().question_count, 10);

    ctl.start_session(Mode::Mix);
    assert_eq!(ctl.screen(), Screen::Drill);
}

#[test]
fn reset_clears_persisted_stats() {
    let dir = TempDir::new().unwrap();
    let clock = ManualClock::new();
    let store = JsonStore::new(dir.path().to_path_buf()).unwrap();
    let mut ctl = new_controller(Some(store), &clock);
    ctl.start_session(Mode::Mix);
    answer_correctly(&mut ctl);
    ctl.reset_stats();
    drop(ctl);

    let store = JsonStore::new(dir.path().to_path_buf()).unwrap();
    let ctl = new_controller(Some(store), &clock);
    assert_eq!(ctl.stats(), &StatsTable::default());
}
