//! List fragments matching the original portal templates.
//!
//! Each builder returns a string of `<li>` items, one per line, ready to be
//! dropped into the matching `<ul>`. Empty-state strings are verbatim from
//! the original. All interpolated user text goes through [`escape`].

use std::fmt::Write as _;

use elevate_core::model::{Activity, Material, ProgressEntry, Question};

use crate::escape::escape;
use crate::time_fmt::format_date;

/// Materials list, teacher and student views alike. An empty list renders
/// as an empty string; the surrounding page shows nothing.
#[must_use]
pub fn materials_list(materials: &[&Material]) -> String {
    let mut out = String::new();
    for (i, m) in materials.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = write!(
            out,
            r#"<li><strong>{title}</strong><br/><a href="{url}" target="_blank" rel="noopener noreferrer">{url}</a><br/><small>{description}</small></li>"#,
            title = escape(m.title()),
            url = escape(m.url()),
            description = escape(m.description()),
        );
    }
    out
}

/// A student's own questions, with answers where given.
#[must_use]
pub fn student_questions_list(questions: &[&Question]) -> String {
    if questions.is_empty() {
        return "<li>No questions asked yet.</li>".to_string();
    }
    let mut out = String::new();
    for (i, q) in questions.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let answer = match q.answer() {
            Some(answer) => escape(answer),
            None => "<em>Not answered yet</em>".to_string(),
        };
        let _ = write!(
            out,
            "<li><strong>Q:</strong> {question}<br/><strong>A:</strong> {answer}</li>",
            question = escape(q.text()),
        );
    }
    out
}

/// The teacher's full question queue. Unanswered entries carry the inline
/// answer form the page script wires up by class name.
#[must_use]
pub fn teacher_questions_list(questions: &[Question]) -> String {
    if questions.is_empty() {
        return "<li>No questions from students.</li>".to_string();
    }
    let mut out = String::new();
    for (i, q) in questions.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let answer = match q.answer() {
            Some(answer) => escape(answer),
            None => concat!(
                r#"<textarea placeholder="Type answer here..." class="answer-input"></textarea>"#,
                r#"<button class="answer-btn">Submit Answer</button>"#,
            )
            .to_string(),
        };
        let _ = write!(
            out,
            r#"<li data-id="{id}"><strong>{username} asks:</strong> {question}<br/><strong>Answer:</strong> {answer}</li>"#,
            id = q.id(),
            username = escape(q.username().as_str()),
            question = escape(q.text()),
        );
    }
    out
}

/// A user's progress log.
#[must_use]
pub fn progress_list(entries: &[ProgressEntry]) -> String {
    if entries.is_empty() {
        return "<li>No progress recorded yet.</li>".to_string();
    }
    entries
        .iter()
        .map(|p| {
            format!(
                "<li>{text} <small>({date})</small></li>",
                text = escape(p.text()),
                date = format_date(p.created_at()),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// A user's activity feed.
#[must_use]
pub fn activities_list(activities: &[Activity]) -> String {
    if activities.is_empty() {
        return "<li>No activities yet.</li>".to_string();
    }
    activities
        .iter()
        .map(|a| {
            format!(
                "<li>{text} <small>({date})</small></li>",
                text = escape(a.text()),
                date = format_date(a.created_at()),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
