//! Role-gated dashboard composition.
//!
//! The role check lives here and nowhere else: repository operations accept
//! either role, exactly as the original page only hid the forms.

use std::fmt::Write as _;

use services::Portal;

use crate::escape::escape;
use crate::fragments;

/// Renders the dashboard for the signed-in user, or `None` while anonymous
/// (the page stays on the login view).
///
/// Teachers see the shared materials and the full question queue; students
/// see the materials, their own questions, their progress log, and their
/// activity feed. List `id`s match the original page so the form wiring
/// finds them.
#[must_use]
pub fn dashboard(portal: &Portal) -> Option<String> {
    let user = portal.current_user()?;
    let materials = fragments::materials_list(&portal.materials_matching(""));

    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<h2 id="welcome-msg">Welcome, {username} ({role})</h2>"#,
        username = escape(user.username().as_str()),
        role = user.role(),
    );

    if user.role().is_teacher() {
        push_section(&mut out, "Materials", "materials-list", &materials);
        push_section(
            &mut out,
            "Student Questions",
            "questions-list",
            &fragments::teacher_questions_list(portal.document().questions()),
        );
    } else {
        push_section(&mut out, "Materials", "student-materials-list", &materials);
        push_section(
            &mut out,
            "My Questions",
            "student-questions-list",
            &fragments::student_questions_list(&portal.my_questions()),
        );
        push_section(
            &mut out,
            "My Progress",
            "progress-list",
            &fragments::progress_list(user.progress()),
        );
        push_section(
            &mut out,
            "My Activities",
            "activities-list",
            &fragments::activities_list(user.activities()),
        );
    }
    Some(out)
}

fn push_section(out: &mut String, heading: &str, list_id: &str, items: &str) {
    let _ = writeln!(
        out,
        "<section><h3>{heading}</h3><ul id=\"{list_id}\">{items}</ul></section>"
    );
}
