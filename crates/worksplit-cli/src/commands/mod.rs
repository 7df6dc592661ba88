//! CLI commands implementation

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;
use uuid::Uuid;
use worksplit_core::{parse_members, AssignmentRequest, DaemonConfig, RemainderPolicy, ShareText};
use worksplit_partition::Partitioner;

/// API client for communicating with the daemon
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Options shared by local and remote assignment
#[derive(Debug, Clone)]
pub struct AssignArgs {
    pub members: Vec<String>,
    pub problems: i64,
    pub subject: Option<String>,
    pub policy: Option<RemainderPolicy>,
    pub seed: Option<u64>,
    pub share_only: bool,
}

/// Member entry as returned by the API
#[derive(Debug, Clone, Deserialize)]
pub struct MemberAssignmentResponse {
    #[allow(dead_code)]
    pub position: usize,
    pub name: String,
    pub count: usize,
    pub problems: Vec<u32>,
}

/// Assignment response from API
#[derive(Debug, Clone, Deserialize)]
pub struct AssignmentResponse {
    pub id: Option<Uuid>,
    pub total_problems: u32,
    pub subject: Option<String>,
    pub policy: RemainderPolicy,
    pub assignments: Vec<MemberAssignmentResponse>,
    pub share_text: String,
}

/// Subjects response
#[derive(Debug, Deserialize)]
pub struct SubjectsResponse {
    pub unspecified: String,
    pub subjects: Vec<String>,
    pub allow_custom: bool,
}

/// Status response
#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    pub version: String,
    pub policy: RemainderPolicy,
    pub seeded: bool,
    pub max_problems: u32,
    pub default_members: Vec<String>,
    pub share_locale: String,
}

/// Gather member names from positional arguments and `--members`
pub fn collect_members(names: &[String], members_text: Option<&str>) -> Vec<String> {
    names
        .iter()
        .map(String::as_str)
        .chain(members_text)
        .flat_map(parse_members)
        .collect()
}

/// Split problems through the daemon
pub async fn assign(client: &ApiClient, args: AssignArgs) -> Result<()> {
    #[derive(Serialize)]
    struct CreateRequest {
        members: Vec<String>,
        total_problems: i64,
        subject: Option<String>,
        policy: Option<RemainderPolicy>,
        seed: Option<u64>,
    }

    let req = CreateRequest {
        members: args.members,
        total_problems: args.problems,
        subject: args.subject,
        policy: args.policy,
        seed: args.seed,
    };

    let response = client
        .client
        .post(client.url("/api/v1/assignments"))
        .json(&req)
        .send()
        .await?;

    if !response.status().is_success() {
        let error = response.text().await?;
        bail!("Failed to create assignment: {}", error);
    }

    let assignment: AssignmentResponse = response.json().await?;
    debug!(id = ?assignment.id, "Assignment received");
    print!("{}", render_assignment(&assignment, args.share_only));
    Ok(())
}

/// Split problems in-process
pub fn assign_local(args: AssignArgs, config_path: Option<&Path>) -> Result<()> {
    let config = match config_path {
        Some(path) => DaemonConfig::from_file(path)?,
        None => DaemonConfig::default(),
    };
    let assignment = local_assignment(&config, &args)?;
    print!("{}", render_assignment(&assignment, args.share_only));
    Ok(())
}

/// Validate and partition without a daemon, producing the same shape the API returns
pub fn local_assignment(config: &DaemonConfig, args: &AssignArgs) -> Result<AssignmentResponse> {
    let mut request =
        AssignmentRequest::new(args.members.clone(), args.problems, args.subject.clone());
    let subject = request.validate(&config.assignment)?;

    let partitioner = Partitioner::from_config(&config.assignment);
    let policy = args.policy.unwrap_or_else(|| partitioner.policy());
    let assignment = partitioner.assign_with(
        request.total_problems,
        &request.member_list(),
        policy,
        args.seed,
    );
    let share_text =
        ShareText::new(&assignment, subject.as_deref(), config.share.locale).render();

    Ok(AssignmentResponse {
        id: None,
        total_problems: assignment.total_problems,
        subject,
        policy,
        assignments: assignment
            .entries
            .into_iter()
            .map(|e| MemberAssignmentResponse {
                position: e.member.position,
                name: e.member.name,
                count: e.problems.len(),
                problems: e.problems,
            })
            .collect(),
        share_text,
    })
}

/// Format an assignment as a table followed by the share text
pub fn render_assignment(assignment: &AssignmentResponse, share_only: bool) -> String {
    if share_only {
        return format!("{}\n", assignment.share_text);
    }

    let mut out = format!(
        "{} problems, {} policy",
        assignment.total_problems, assignment.policy
    );
    if let Some(subject) = &assignment.subject {
        out.push_str(&format!(" ({})", subject));
    }
    out.push('\n');
    out.push_str(&format!("{:<20} {:<6} {}\n", "MEMBER", "COUNT", "PROBLEMS"));
    out.push_str(&"-".repeat(60));
    out.push('\n');

    let mut rows: Vec<&MemberAssignmentResponse> = assignment.assignments.iter().collect();
    rows.sort_by(|a, b| a.name.cmp(&b.name));
    for row in rows {
        let problems = if row.problems.is_empty() {
            "no assignment".to_string()
        } else {
            row.problems
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };
        out.push_str(&format!("{:<20} {:<6} {}\n", row.name, row.count, problems));
    }

    out.push_str(&format!("\nShare text:\n{}\n", assignment.share_text));
    out
}

/// List subjects
pub async fn subjects(client: &ApiClient) -> Result<()> {
    let response = client
        .client
        .get(client.url("/api/v1/subjects"))
        .send()
        .await?;

    if !response.status().is_success() {
        let error = response.text().await?;
        bail!("Failed to list subjects: {}", error);
    }

    let subjects: SubjectsResponse = response.json().await?;
    println!("{} (no subject)", subjects.unspecified);
    for subject in subjects.subjects {
        println!("{}", subject);
    }
    if subjects.allow_custom {
        println!("\nOther subject labels are accepted too.");
    }
    Ok(())
}

/// Show daemon status
pub async fn status(client: &ApiClient) -> Result<()> {
    let response = client
        .client
        .get(client.url("/api/v1/status"))
        .send()
        .await?;

    if !response.status().is_success() {
        let error = response.text().await?;
        bail!("Failed to get status: {}", error);
    }

    let status: StatusResponse = response.json().await?;
    println!("worksplit v{}", status.version);
    println!();
    println!(
        "Policy: {}{}",
        status.policy,
        if status.seeded { " (seeded)" } else { "" }
    );
    println!("Max problems: {}", status.max_problems);
    println!("Share locale: {}", status.share_locale);
    println!("Default members: {}", status.default_members.join(", "));
    Ok(())
}
