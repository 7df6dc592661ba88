//! Plain-text summary meant to be pasted into a group chat

use crate::config::ShareLocale;
use crate::model::{Assignment, MemberAssignment};

/// Renders the shareable text for an assignment
#[derive(Debug, Clone, Copy)]
pub struct ShareText<'a> {
    assignment: &'a Assignment,
    subject: Option<&'a str>,
    locale: ShareLocale,
}

impl<'a> ShareText<'a> {
    pub fn new(assignment: &'a Assignment, subject: Option<&'a str>, locale: ShareLocale) -> Self {
        Self {
            assignment,
            subject,
            locale,
        }
    }

    /// Header, separator, then one line per member in display order
    pub fn render(&self) -> String {
        let mut lines = Vec::with_capacity(self.assignment.len() + 2);
        lines.push(self.header());
        lines.push("---".to_string());
        lines.extend(
            self.assignment
                .display_order()
                .into_iter()
                .map(|entry| self.member_line(entry)),
        );
        lines.join("\n")
    }

    fn header(&self) -> String {
        let total = self.assignment.total_problems;
        match (self.locale, self.subject) {
            (ShareLocale::En, Some(subject)) => {
                format!("[{} assignment ({})]", subject, problem_count(total as usize))
            }
            (ShareLocale::En, None) => format!("[Assignment ({})]", problem_count(total as usize)),
            (ShareLocale::Ja, Some(subject)) => format!("【{} 課題割り当て ({}問)】", subject, total),
            (ShareLocale::Ja, None) => format!("【課題割り当て ({}問)】", total),
        }
    }

    fn member_line(&self, entry: &MemberAssignment) -> String {
        let name = &entry.member.name;
        match (self.locale, entry.problems.is_empty()) {
            (ShareLocale::En, true) => format!("{}: no assignment", name),
            (ShareLocale::En, false) => format!(
                "{}: problems {} ({})",
                name,
                entry.problem_list(),
                problem_count(entry.count())
            ),
            (ShareLocale::Ja, true) => format!("{}さん: 担当なし", name),
            (ShareLocale::Ja, false) => format!(
                "{}さん: 問題 {} ({}問)",
                name,
                entry.problem_list(),
                entry.count()
            ),
        }
    }
}

impl std::fmt::Display for ShareText<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

/// `1 problem`, `3 problems`
pub fn problem_count(n: usize) -> String {
    if n == 1 {
        "1 problem".to_string()
    } else {
        format!("{} problems", n)
    }
}
