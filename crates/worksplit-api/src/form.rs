//! Server-rendered assignment form
//!
//! The page keeps no server-side session. Everything the user typed comes
//! back in the POST body as a [`FormState`] and is echoed into the next page.

use axum::{
    extract::{Form, State},
    response::Html,
};
use html_escape::{encode_double_quoted_attribute, encode_text};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};
use worksplit_core::{format_members, parse_members, problem_count, AssignmentRequest, DaemonConfig};

use crate::rest::{AppState, AssignmentOutcome};

/// Widest result grid
const MAX_COLUMNS: usize = 4;

const STYLE: &str = "\
body{font-family:sans-serif;max-width:48rem;margin:2rem auto;padding:0 1rem}\
textarea{width:100%;min-height:4rem}\
.info{color:#1c5d99}.ok{color:#2b7a0b}.warn{color:#a15c00}.error{color:#b00020}\
.grid{display:grid;gap:1rem;margin:1rem 0}\
.card{border:1px solid #ccc;border-radius:6px;padding:.5rem .75rem}\
pre{background:#f4f4f4;padding:.75rem;white-space:pre-wrap}\
footer{margin-top:2rem;color:#777;font-size:.8rem}";

/// Fields posted by the form
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FormState {
    /// Comma-separated member names, as typed
    pub members: String,
    /// Selected subject label
    pub subject: String,
    /// Problem count, as typed
    pub total_problems: String,
}

impl FormState {
    /// State for a fresh page load
    pub fn initial(config: &DaemonConfig) -> Self {
        let members = &config.assignment.default_members;
        Self {
            members: format_members(members),
            subject: config.assignment.unspecified_subject.clone(),
            total_problems: members.len().max(1).to_string(),
        }
    }

    /// Members parsed from the text field
    pub fn member_names(&self) -> Vec<String> {
        parse_members(&self.members)
    }
}

/// What to show under the form
#[derive(Debug)]
pub enum FormResult<'a> {
    /// Nothing submitted yet
    Empty,
    /// The assignment ran
    Assigned(&'a AssignmentOutcome),
    /// The submission was rejected with a message
    Rejected(String),
}

/// Render the full page for the given form state
pub fn render_page(config: &DaemonConfig, form: &FormState, result: FormResult<'_>) -> String {
    let title = encode_text(&config.api.title);
    let mut html = format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{title}</title>\
         <style>{STYLE}</style></head><body><h1>{title}</h1>"
    );
    render_members(&mut html, form);
    render_settings(&mut html, config, form);

    match result {
        FormResult::Empty => {}
        FormResult::Assigned(outcome) => render_result(&mut html, outcome),
        FormResult::Rejected(message) => {
            html.push_str(&format!(
                "<p class=\"error\">{}</p>",
                encode_text(&message)
            ));
        }
    }

    html.push_str("<footer>Served by worksplit</footer></body></html>");
    html
}

fn render_members(html: &mut String, form: &FormState) {
    let names = form.member_names();

    html.push_str(&format!(
        "<form method=\"post\" action=\"/\"><h2>Members</h2>\
         <p class=\"info\">Separate names with commas.</p>\
         <textarea name=\"members\">{}</textarea>",
        encode_text(&form.members)
    ));

    if names.is_empty() {
        html.push_str("<p class=\"warn\">No members entered.</p>");
    } else {
        html.push_str(&format!(
            "<p class=\"ok\">{} member(s): {}</p>",
            names.len(),
            encode_text(&format_members(&names))
        ));
    }
}

fn render_settings(html: &mut String, config: &DaemonConfig, form: &FormState) {
    let no_members = form.member_names().is_empty();

    html.push_str("<h2>Assignment settings</h2><label>Subject <select name=\"subject\">");
    for option in config.assignment.subject_options() {
        let selected = if option == form.subject { " selected" } else { "" };
        html.push_str(&format!(
            "<option value=\"{}\"{selected}>{}</option>",
            encode_double_quoted_attribute(option),
            encode_text(option)
        ));
    }
    html.push_str(&format!(
        "</select></label> <label>Number of problems \
         <input type=\"number\" name=\"total_problems\" min=\"1\" max=\"{}\" step=\"1\" value=\"{}\"></label> \
         <button type=\"submit\"{}>Assign</button></form>",
        config.assignment.max_problems,
        encode_double_quoted_attribute(&form.total_problems),
        if no_members { " disabled" } else { "" }
    ));
}

fn render_result(html: &mut String, outcome: &AssignmentOutcome) {
    let entries = outcome.assignment.display_order();
    let columns = entries.len().clamp(1, MAX_COLUMNS);

    html.push_str(&format!(
        "<h2>Assignment result</h2>\
         <div class=\"grid\" style=\"grid-template-columns:repeat({columns},1fr)\">"
    ));
    for entry in entries {
        html.push_str(&format!(
            "<div class=\"card\"><strong>{}</strong> ({})<br>",
            encode_text(&entry.member.name),
            problem_count(entry.count())
        ));
        if entry.problems.is_empty() {
            html.push_str("no assignment</div>");
        } else {
            html.push_str(&format!("Problems: {}</div>", entry.problem_list()));
        }
    }
    html.push_str(&format!(
        "</div><h2>Share text</h2><pre>{}</pre>\
         <p class=\"info\">Copy the text above and paste it into your group chat.</p>",
        encode_text(&outcome.share_text)
    ));
}

/// Show the form with configured defaults
pub async fn show_form(State(state): State<Arc<AppState>>) -> Html<String> {
    let form = FormState::initial(&state.config);
    Html(render_page(&state.config, &form, FormResult::Empty))
}

/// Run the assignment for a submitted form and show the result
pub async fn submit_form(
    State(state): State<Arc<AppState>>,
    Form(form): Form<FormState>,
) -> Html<String> {
    let total = match form.total_problems.trim().parse::<i64>() {
        Ok(total) => total,
        Err(_) => {
            warn!(value = %form.total_problems, "Problem count is not a number");
            let message = "Enter the number of problems as a whole number.".to_string();
            return Html(render_page(&state.config, &form, FormResult::Rejected(message)));
        }
    };

    let subject = Some(form.subject.clone());
    let request = AssignmentRequest::new(form.member_names(), total, subject);
    info!(
        members = request.members.len(),
        total_problems = total,
        "Form submitted"
    );

    let page = match state.assign(request, None, None) {
        Ok(outcome) => render_page(&state.config, &form, FormResult::Assigned(&outcome)),
        Err(e) => {
            warn!(error = %e, "Form submission rejected");
            render_page(&state.config, &form, FormResult::Rejected(e.to_string()))
        }
    };
    Html(page)
}
