//! Member, Assignment, and request type definitions

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::config::AssignmentConfig;
use crate::error::{WorksplitError, WorksplitResult};

/// Separators accepted between names in the free-text member field.
/// The full-width forms show up when names are typed with a Japanese IME.
const MEMBER_SEPARATORS: [char; 3] = [',', '、', '，'];

/// A participant eligible to receive problems.
///
/// Identity is the position in the member list, so two members may share a
/// display name and still be assigned independently.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Member {
    /// Zero-based position in the member list
    pub position: usize,
    /// Display name
    pub name: String,
}

impl Member {
    /// Create a new member
    pub fn new(position: usize, name: impl Into<String>) -> Self {
        Self {
            position,
            name: name.into(),
        }
    }

    /// Build members from names, numbering them in order
    pub fn from_names<I, S>(names: I) -> Vec<Member>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names
            .into_iter()
            .enumerate()
            .map(|(position, name)| Member::new(position, name))
            .collect()
    }
}

impl std::fmt::Display for Member {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Split a comma-separated member field into trimmed, non-empty names.
/// Duplicates are kept.
pub fn parse_members(text: &str) -> Vec<String> {
    text.split(&MEMBER_SEPARATORS[..])
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join names back into the free-text form
pub fn format_members<S: AsRef<str>>(names: &[S]) -> String {
    names
        .iter()
        .map(|n| n.as_ref())
        .collect::<Vec<_>>()
        .join(", ")
}

/// The problems handed to one member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberAssignment {
    /// The member
    pub member: Member,
    /// Assigned problem numbers, ascending
    pub problems: Vec<u32>,
}

impl MemberAssignment {
    /// Number of assigned problems
    pub fn count(&self) -> usize {
        self.problems.len()
    }

    /// Problem numbers joined as `1, 4, 7`
    pub fn problem_list(&self) -> String {
        self.problems
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// The complete mapping from members to problem numbers for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Size of the problem set that was split
    pub total_problems: u32,
    /// One entry per member, in member-list order
    pub entries: Vec<MemberAssignment>,
}

impl Assignment {
    /// An assignment with no members
    pub fn empty() -> Self {
        Self {
            total_problems: 0,
            entries: Vec::new(),
        }
    }

    /// Number of members in the assignment
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the assignment has no members
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry for the member at `position`
    pub fn get(&self, position: usize) -> Option<&MemberAssignment> {
        self.entries.iter().find(|e| e.member.position == position)
    }

    /// Entry for the first member called `name`
    pub fn find(&self, name: &str) -> Option<&MemberAssignment> {
        self.entries.iter().find(|e| e.member.name == name)
    }

    /// Total number of problems handed out
    pub fn assigned_count(&self) -> usize {
        self.entries.iter().map(MemberAssignment::count).sum()
    }

    /// Entries sorted by member name for display.
    ///
    /// The sort is stable, so members sharing a name keep list order.
    pub fn display_order(&self) -> Vec<&MemberAssignment> {
        let mut sorted: Vec<&MemberAssignment> = self.entries.iter().collect();
        sorted.sort_by(|a, b| a.member.name.cmp(&b.member.name));
        sorted
    }

    /// Check that every problem in 1..=total_problems is assigned exactly
    /// once and that each member's list is strictly ascending.
    pub fn is_partition(&self) -> bool {
        let mut seen = HashSet::new();
        for entry in &self.entries {
            if entry.problems.windows(2).any(|w| w[0] >= w[1]) {
                return false;
            }
            for &p in &entry.problems {
                if p == 0 || p > self.total_problems || !seen.insert(p) {
                    return false;
                }
            }
        }
        seen.len() == self.total_problems as usize
    }
}

/// A validated-or-not request to split problems
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRequest {
    /// Member names in list order
    pub members: Vec<String>,
    /// Number of problems to split
    pub total_problems: i64,
    /// Optional subject label
    pub subject: Option<String>,
}

impl AssignmentRequest {
    /// Create a request from a list of names
    pub fn new(members: Vec<String>, total_problems: i64, subject: Option<String>) -> Self {
        Self {
            members,
            total_problems,
            subject,
        }
    }

    /// Create a request from the free-text member field
    pub fn from_text(members_text: &str, total_problems: i64, subject: Option<String>) -> Self {
        Self::new(parse_members(members_text), total_problems, subject)
    }

    /// Members numbered by position
    pub fn member_list(&self) -> Vec<Member> {
        Member::from_names(self.members.iter().cloned())
    }

    /// Check the request against the configured limits.
    ///
    /// Names are trimmed and blank names dropped first. Returns the resolved
    /// subject label (`None` when unspecified).
    pub fn validate(&mut self, config: &AssignmentConfig) -> WorksplitResult<Option<String>> {
        self.members = self
            .members
            .iter()
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .collect();

        if self.members.is_empty() {
            return Err(WorksplitError::NoMembers);
        }
        if self.total_problems < 1 {
            return Err(WorksplitError::InvalidProblemCount(self.total_problems));
        }
        if self.total_problems > i64::from(config.max_problems) {
            return Err(WorksplitError::TooManyProblems {
                requested: self.total_problems,
                limit: config.max_problems,
            });
        }

        config.resolve_subject(self.subject.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(total: u32, lists: Vec<Vec<u32>>) -> Assignment {
        let names = ["A", "B", "C", "D"];
        Assignment {
            total_problems: total,
            entries: lists
                .into_iter()
                .enumerate()
                .map(|(i, problems)| MemberAssignment {
                    member: Member::new(i, names[i]),
                    problems,
                })
                .collect(),
        }
    }

    #[test]
    fn test_parse_members() {
        assert_eq!(
            parse_members(" Ito, Saito ,, Sawa,  "),
            vec!["Ito", "Saito", "Sawa"]
        );
        assert_eq!(parse_members("いとう、さいとう，さわ"), vec!["いとう", "さいとう", "さわ"]);
        assert!(parse_members(" , ,").is_empty());
        assert!(parse_members("").is_empty());
    }

    #[test]
    fn test_parse_members_keeps_duplicates() {
        let names = parse_members("Ito, Ito, Sawa");
        assert_eq!(names, vec!["Ito", "Ito", "Sawa"]);

        let members = Member::from_names(names);
        assert_eq!(members[0].name, members[1].name);
        assert_ne!(members[0], members[1]);
    }

    #[test]
    fn test_format_members() {
        assert_eq!(format_members(&["Ito", "Saito"]), "Ito, Saito");
        assert_eq!(format_members::<&str>(&[]), "");
    }

    #[test]
    fn test_is_partition() {
        assert!(assignment(5, vec![vec![1, 4], vec![2, 5], vec![3]]).is_partition());
        assert!(assignment(0, vec![vec![], vec![]]).is_partition());
        // Missing problem 5
        assert!(!assignment(5, vec![vec![1, 4], vec![2], vec![3]]).is_partition());
        // Duplicate
        assert!(!assignment(3, vec![vec![1, 2], vec![2, 3]]).is_partition());
        // Not ascending
        assert!(!assignment(3, vec![vec![2, 1], vec![3]]).is_partition());
        // Out of range
        assert!(!assignment(2, vec![vec![1], vec![3]]).is_partition());
    }

    #[test]
    fn test_display_order_is_stable() {
        let a = Assignment {
            total_problems: 3,
            entries: vec![
                MemberAssignment {
                    member: Member::new(0, "Sawa"),
                    problems: vec![1],
                },
                MemberAssignment {
                    member: Member::new(1, "Ito"),
                    problems: vec![2],
                },
                MemberAssignment {
                    member: Member::new(2, "Ito"),
                    problems: vec![3],
                },
            ],
        };
        let order: Vec<usize> = a.display_order().iter().map(|e| e.member.position).collect();
        assert_eq!(order, vec![1, 2, 0]);
        assert_eq!(a.find("Ito").map(|e| e.member.position), Some(1));
        assert_eq!(a.get(2).map(|e| e.problem_list()), Some("3".to_string()));
        assert_eq!(a.assigned_count(), 3);
    }

    #[test]
    fn test_validate_request() {
        let config = AssignmentConfig::default();

        let mut req = AssignmentRequest::new(vec![" Ito ".into(), "".into()], 3, None);
        assert_eq!(req.validate(&config).unwrap(), None);
        assert_eq!(req.members, vec!["Ito"]);

        let mut req = AssignmentRequest::from_text(" , ", 3, None);
        assert!(matches!(req.validate(&config), Err(WorksplitError::NoMembers)));

        let mut req = AssignmentRequest::from_text("Ito", 0, None);
        assert!(matches!(
            req.validate(&config),
            Err(WorksplitError::InvalidProblemCount(0))
        ));

        let mut req = AssignmentRequest::from_text("Ito", i64::from(config.max_problems) + 1, None);
        assert!(matches!(
            req.validate(&config),
            Err(WorksplitError::TooManyProblems { .. })
        ));
    }

    #[test]
    fn test_validate_request_subject() {
        let config = AssignmentConfig::default();

        let mut req =
            AssignmentRequest::from_text("Ito", 3, Some("Criminal Law".to_string()));
        assert_eq!(
            req.validate(&config).unwrap(),
            Some("Criminal Law".to_string())
        );

        let mut req = AssignmentRequest::from_text("Ito", 3, Some("Unspecified".to_string()));
        assert_eq!(req.validate(&config).unwrap(), None);

        let mut req = AssignmentRequest::from_text("Ito", 3, Some("Astrology".to_string()));
        assert!(matches!(
            req.validate(&config),
            Err(WorksplitError::UnknownSubject(_))
        ));
    }
}
