use bughive::model::{
    Bug, Environment, Priority, Project, ProjectStatus, Severity, Status, User,
};
use bughive::store::{BugDraft, SqliteStore};
use chrono::{DateTime, Utc};

/// Seed two users and one project; returns (user ids, project id).
///
/// Sarah Chen (#1) leads the Frontend project, Miguel Torres (#2) is on
/// the team. Every seeded id is deterministic because the store starts
/// empty.
pub fn seed_directory(store: &mut SqliteStore) -> (Vec<i64>, i64) {
    let sarah = store
        .create_user(&User {
            id: 0,
            first_name: "Sarah".to_string(),
            last_name: "Chen".to_string(),
            email: "sarah@example.com".to_string(),
            role: Some("developer".to_string()),
            active: true,
        })
        .expect("seed user");
    let miguel = store
        .create_user(&User {
            id: 0,
            first_name: "Miguel".to_string(),
            last_name: "Torres".to_string(),
            email: "miguel@example.com".to_string(),
            role: Some("qa".to_string()),
            active: true,
        })
        .expect("seed user");

    let project = store
        .create_project(&Project {
            id: 0,
            name: "Frontend".to_string(),
            description: Some("Web client".to_string()),
            lead_id: Some(sarah.id),
            status: ProjectStatus::Active,
            team_member_ids: vec![sarah.id, miguel.id],
            default_priority: Priority::Medium,
            environments: vec!["staging".to_string(), "production".to_string()],
            created_at: None,
        })
        .expect("seed project");

    (vec![sarah.id, miguel.id], project.id)
}

/// Draft reported by user 1 against project 1; everything else default.
pub fn bug_draft(title: &str) -> BugDraft {
    BugDraft {
        title: title.to_string(),
        reporter_id: 1,
        project_id: 1,
        ..Default::default()
    }
}

/// In-memory bug for view and sort tests, no store involved.
pub fn test_bug(
    id: i64,
    title: &str,
    status: Status,
    priority: Priority,
    updated_at: Option<DateTime<Utc>>,
) -> Bug {
    Bug {
        id,
        title: title.to_string(),
        description: None,
        steps_to_reproduce: None,
        status,
        priority,
        severity: Severity::Medium,
        assignee_id: Some(1),
        reporter_id: 1,
        project_id: 1,
        created_at: updated_at,
        updated_at,
        environment: Environment::default(),
        attachments: vec![],
    }
}
