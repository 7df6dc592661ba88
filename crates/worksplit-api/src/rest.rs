//! REST API handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use uuid::Uuid;
use worksplit_core::{
    parse_members, Assignment, AssignmentRequest, DaemonConfig, RemainderPolicy, ShareLocale,
    ShareText, WorksplitError, WorksplitResult,
};
use worksplit_partition::Partitioner;

use crate::form;

/// Application state shared across handlers
pub struct AppState {
    pub config: DaemonConfig,
    pub partitioner: Partitioner,
}

impl AppState {
    /// Build the state from configuration
    pub fn new(config: DaemonConfig) -> Self {
        let partitioner = Partitioner::from_config(&config.assignment);
        Self {
            config,
            partitioner,
        }
    }

    /// Validate a request and split its problems
    pub fn assign(
        &self,
        mut request: AssignmentRequest,
        policy: Option<RemainderPolicy>,
        seed: Option<u64>,
    ) -> WorksplitResult<AssignmentOutcome> {
        let subject = request.validate(&self.config.assignment)?;
        let policy = policy.unwrap_or_else(|| self.partitioner.policy());

        let assignment = self.partitioner.assign_with(
            request.total_problems,
            &request.member_list(),
            policy,
            seed,
        );
        if !assignment.is_partition() {
            return Err(WorksplitError::Internal(
                "assignment does not cover the problem set".to_string(),
            ));
        }

        let share_text =
            ShareText::new(&assignment, subject.as_deref(), self.config.share.locale).render();

        Ok(AssignmentOutcome {
            id: Uuid::new_v4(),
            generated_at: Utc::now(),
            assignment,
            subject,
            policy,
            share_text,
        })
    }
}

/// One finished assignment, ready to display
#[derive(Debug, Clone)]
pub struct AssignmentOutcome {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub assignment: Assignment,
    pub subject: Option<String>,
    pub policy: RemainderPolicy,
    pub share_text: String,
}

/// Create the router serving the form and the JSON API
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors_enabled = state.config.api.cors_enabled;

    let api = Router::new()
        .route("/api/v1/assignments", post(create_assignment))
        .route("/api/v1/subjects", get(get_subjects))
        .route("/api/v1/status", get(get_status));
    let api = if cors_enabled {
        api.layer(CorsLayer::permissive())
    } else {
        api
    };

    Router::new()
        .route("/", get(form::show_form).post(form::submit_form))
        .route("/health", get(health))
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Request to create an assignment
#[derive(Debug, Deserialize)]
pub struct CreateAssignmentRequest {
    /// Member names; takes precedence over `members_text`
    #[serde(default)]
    pub members: Vec<String>,
    /// Comma-separated member names
    #[serde(default)]
    pub members_text: Option<String>,
    /// Number of problems
    pub total_problems: i64,
    /// Subject label
    #[serde(default)]
    pub subject: Option<String>,
    /// Remainder policy (server default if unset)
    #[serde(default)]
    pub policy: Option<RemainderPolicy>,
    /// Seed for reproducible output
    #[serde(default)]
    pub seed: Option<u64>,
}

impl CreateAssignmentRequest {
    fn into_parts(self) -> (AssignmentRequest, Option<RemainderPolicy>, Option<u64>) {
        let members = if self.members.is_empty() {
            self.members_text
                .as_deref()
                .map(parse_members)
                .unwrap_or_default()
        } else {
            self.members
        };
        (
            AssignmentRequest::new(members, self.total_problems, self.subject),
            self.policy,
            self.seed,
        )
    }
}

/// Problems handed to one member
#[derive(Debug, Serialize)]
pub struct MemberAssignmentResponse {
    pub position: usize,
    pub name: String,
    pub count: usize,
    pub problems: Vec<u32>,
}

/// Response for an assignment
#[derive(Debug, Serialize)]
pub struct AssignmentResponse {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub total_problems: u32,
    pub subject: Option<String>,
    pub policy: RemainderPolicy,
    /// Entries in member-list order
    pub assignments: Vec<MemberAssignmentResponse>,
    pub share_text: String,
}

impl From<AssignmentOutcome> for AssignmentResponse {
    fn from(outcome: AssignmentOutcome) -> Self {
        Self {
            id: outcome.id,
            generated_at: outcome.generated_at,
            total_problems: outcome.assignment.total_problems,
            subject: outcome.subject,
            policy: outcome.policy,
            assignments: outcome
                .assignment
                .entries
                .into_iter()
                .map(|e| MemberAssignmentResponse {
                    position: e.member.position,
                    name: e.member.name,
                    count: e.problems.len(),
                    problems: e.problems,
                })
                .collect(),
            share_text: outcome.share_text,
        }
    }
}

/// Map a worksplit error onto an HTTP status
pub(crate) fn error_status(err: &WorksplitError) -> StatusCode {
    if err.is_validation() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// Create an assignment
async fn create_assignment(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateAssignmentRequest>, JsonRejection>,
) -> Result<Json<AssignmentResponse>, (StatusCode, String)> {
    let Json(req) = payload.map_err(|rejection| {
        warn!(error = %rejection, "Malformed assignment request");
        (StatusCode::BAD_REQUEST, rejection.body_text())
    })?;
    let (request, policy, seed) = req.into_parts();

    info!(
        members = request.members.len(),
        total_problems = request.total_problems,
        "Creating assignment"
    );

    let outcome = state.assign(request, policy, seed).map_err(|e| {
        warn!(error = %e, "Assignment rejected");
        (error_status(&e), e.to_string())
    })?;

    Ok(Json(AssignmentResponse::from(outcome)))
}

/// Subject options
#[derive(Debug, Serialize)]
pub struct SubjectsResponse {
    /// Label meaning "no subject"
    pub unspecified: String,
    pub subjects: Vec<String>,
    pub allow_custom: bool,
}

/// List configured subjects
async fn get_subjects(State(state): State<Arc<AppState>>) -> Json<SubjectsResponse> {
    let config = &state.config.assignment;
    Json(SubjectsResponse {
        unspecified: config.unspecified_subject.clone(),
        subjects: config.subjects.clone(),
        allow_custom: config.allow_custom_subjects,
    })
}

/// Server status response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub version: String,
    pub policy: RemainderPolicy,
    pub seeded: bool,
    pub max_problems: u32,
    pub default_members: Vec<String>,
    pub share_locale: ShareLocale,
}

/// Get server status
async fn get_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        policy: state.partitioner.policy(),
        seeded: state.partitioner.seed().is_some(),
        max_problems: state.config.assignment.max_problems,
        default_members: state.config.assignment.default_members.clone(),
        share_locale: state.config.share.locale,
    })
}

async fn health() -> &'static str {
    "ok"
}
