use std::sync::Arc;

use chrono::Duration;
use elevate_core::model::{Role, Username};
use elevate_core::time::{fixed_clock, fixed_now};
use services::{Clock, Portal};
use storage::{DocumentStore, MemoryStore};

fn open_portal(kv: &MemoryStore, clock: Clock) -> Portal {
    let store = DocumentStore::new(Arc::new(kv.clone()), clock);
    Portal::open(clock, store).expect("open portal")
}

#[test]
fn teacher_and_student_question_flow() {
    let kv = MemoryStore::new();
    let mut portal = open_portal(&kv, fixed_clock());

    // Teacher posts a material.
    portal.login("t1", Role::Teacher).expect("teacher login");
    portal
        .post_material("Algebra", "http://x", "intro")
        .expect("post material");
    portal.logout();

    // Student finds it and asks a question.
    portal.login("s1", Role::Student).expect("student login");
    let found = portal.materials_matching("alge");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].url(), "http://x");
    let question_id = portal
        .ask_question("What is a variable?")
        .expect("ask question");
    portal.logout();

    // Teacher answers it.
    portal.login("t1", Role::Teacher).expect("teacher re-login");
    assert_eq!(portal.unanswered_count(), 1);
    assert!(
        portal
            .answer_question(question_id, "A named value.")
            .expect("answer question")
    );
    assert_eq!(portal.unanswered_count(), 0);
    portal.logout();

    // The student's view shows exactly one entry with that answer, and it
    // survives a fresh portal over the same slot.
    let mut reopened = open_portal(&kv, fixed_clock());
    reopened.login("s1", Role::Student).expect("student re-login");
    let mine = reopened.my_questions();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].text(), "What is a variable?");
    assert_eq!(mine[0].answer(), Some("A named value."));
}

#[test]
fn progress_on_two_days_keeps_both_entries() {
    let kv = MemoryStore::new();

    let mut day_one = open_portal(&kv, fixed_clock());
    day_one.login("s1", Role::Student).expect("login day one");
    day_one
        .log_progress("Finished chapter 1")
        .expect("log day one");

    let mut later = fixed_clock();
    later.advance(Duration::days(1));
    let mut day_two = open_portal(&kv, later);
    day_two.login("s1", Role::Student).expect("login day two");
    day_two
        .log_progress("Finished chapter 1")
        .expect("log day two");

    let user = day_two.current_user().expect("session user");
    assert_eq!(user.progress().len(), 2);
    assert_eq!(user.progress()[0].created_at(), fixed_now());
    assert_eq!(
        user.progress()[1].created_at(),
        fixed_now() + Duration::days(1)
    );
}

#[test]
fn document_written_by_one_portal_is_read_by_the_next() {
    let kv = MemoryStore::new();

    let mut first = open_portal(&kv, fixed_clock());
    first.login("s1", Role::Student).expect("login");
    first.record_activity("joined study group").expect("record");
    first.ask_question("Where do I start?").expect("ask");

    let second = open_portal(&kv, fixed_clock());
    let doc = second.document();
    let user = doc.user(&Username::new("s1").unwrap()).expect("user");
    assert_eq!(user.activities().len(), 1);
    assert_eq!(user.activities()[0].text(), "joined study group");
    assert_eq!(doc.questions().len(), 1);
    assert!(!doc.questions()[0].is_answered());
}
