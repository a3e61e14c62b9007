//! Text formatting for terminal output.
//!
//! Provides status icons, colored labels, and aligned single-line bug
//! rows.

use crate::model::{
    Bug, Notification, Priority, SavedFilter, Severity, Status, User, UserDirectory,
};
use crate::view::FilterBadge;
use colored::Colorize;

/// Status icon characters.
pub mod icons {
    /// Open bug (hollow circle).
    pub const OPEN: &str = "○";
    /// In progress (half-filled).
    pub const IN_PROGRESS: &str = "◐";
    /// Resolved (checkmark).
    pub const RESOLVED: &str = "✓";
    /// Closed (filled circle).
    pub const CLOSED: &str = "●";
}

/// Return the icon character for a status.
#[must_use]
pub const fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Open => icons::OPEN,
        Status::InProgress => icons::IN_PROGRESS,
        Status::Resolved => icons::RESOLVED,
        Status::Closed => icons::CLOSED,
    }
}

/// Format a status label with optional color.
#[must_use]
pub fn status_label(status: Status, use_color: bool) -> String {
    let label = status.as_str();
    if !use_color {
        return label.to_string();
    }
    match status {
        Status::Open => label.green().to_string(),
        Status::InProgress => label.yellow().to_string(),
        Status::Resolved => label.cyan().to_string(),
        Status::Closed => label.bright_black().to_string(),
    }
}

/// Format a priority label with optional color.
#[must_use]
pub fn priority_label(priority: Priority, use_color: bool) -> String {
    let label = priority.as_str();
    if !use_color {
        return label.to_string();
    }
    match priority {
        Priority::Critical => label.red().bold().to_string(),
        Priority::High => label.red().to_string(),
        Priority::Medium => label.yellow().to_string(),
        Priority::Low => label.bright_black().to_string(),
    }
}

/// Format a severity label with optional color.
#[must_use]
pub fn severity_label(severity: Severity, use_color: bool) -> String {
    let label = severity.as_str();
    if !use_color {
        return label.to_string();
    }
    match severity {
        Severity::Critical => label.red().bold().to_string(),
        Severity::Major => label.red().to_string(),
        Severity::Medium => label.yellow().to_string(),
        Severity::Minor => label.bright_black().to_string(),
    }
}

/// One aligned line per bug: icon, id, priority, severity, title,
/// assignee.
#[must_use]
pub fn bug_line(bug: &Bug, users: &UserDirectory, use_color: bool) -> String {
    let icon = status_icon(bug.status);
    let assignee = bug
        .assignee_id
        .and_then(|id| users.display_name(id))
        .unwrap_or_else(|| "unassigned".to_string());

    format!(
        "{icon} #{:<5} {:<9} {:<9} {:<50} {assignee}",
        bug.id,
        priority_label(bug.priority, use_color),
        severity_label(bug.severity, use_color),
        truncate(&bug.title, 50),
    )
}

/// Multi-line detail block for one bug.
#[must_use]
pub fn bug_details(bug: &Bug, users: &UserDirectory, use_color: bool) -> String {
    let mut out = String::new();
    out.push_str(&format!("#{} {}\n", bug.id, bug.title));
    out.push_str(&format!(
        "  status:    {}\n",
        status_label(bug.status, use_color)
    ));
    out.push_str(&format!(
        "  priority:  {}\n",
        priority_label(bug.priority, use_color)
    ));
    out.push_str(&format!(
        "  severity:  {}\n",
        severity_label(bug.severity, use_color)
    ));
    let assignee = bug
        .assignee_id
        .and_then(|id| users.display_name(id))
        .unwrap_or_else(|| "unassigned".to_string());
    out.push_str(&format!("  assignee:  {assignee}\n"));
    if let Some(reporter) = users.display_name(bug.reporter_id) {
        out.push_str(&format!("  reporter:  {reporter}\n"));
    }
    if let Some(created) = bug.created_at {
        out.push_str(&format!("  created:   {}\n", created.to_rfc3339()));
    }
    if let Some(updated) = bug.updated_at {
        out.push_str(&format!("  updated:   {}\n", updated.to_rfc3339()));
    }
    if let Some(description) = bug.description.as_deref() {
        out.push_str(&format!("\n  {description}\n"));
    }
    if let Some(steps) = bug.steps_to_reproduce.as_deref() {
        out.push_str(&format!("\n  Steps to reproduce:\n  {steps}\n"));
    }
    if !bug.environment.is_empty() {
        let env = &bug.environment;
        let parts: Vec<&str> = [env.browser.as_deref(), env.os.as_deref(), env.device.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        out.push_str(&format!("\n  environment: {}\n", parts.join(", ")));
    }
    if !bug.attachments.is_empty() {
        out.push_str(&format!("  attachments: {}\n", bug.attachments.join(", ")));
    }
    out
}

/// One line per saved filter.
#[must_use]
pub fn filter_line(filter: &SavedFilter) -> String {
    let kind = if filter.is_preset() { "preset" } else { "custom" };
    let dimensions = filter.criteria.active_count();
    format!(
        "{:>4}  {:<7} {:<24} {dimensions} criteria",
        filter.id, kind, filter.name
    )
}

/// One line per notification.
#[must_use]
pub fn notification_line(notification: &Notification, use_color: bool) -> String {
    let marker = if notification.read { " " } else { "*" };
    format!(
        "{marker} {:>4}  bug #{:<5} {} -> {}",
        notification.id,
        notification.bug_id,
        status_label(notification.old_status, use_color),
        status_label(notification.new_status, use_color),
    )
}

/// One line per user.
#[must_use]
pub fn user_line(user: &User) -> String {
    let role = user.role.as_deref().unwrap_or("-");
    let active = if user.active { "" } else { " (inactive)" };
    format!(
        "{:>4}  {:<24} {:<28} {role}{active}",
        user.id,
        user.display_name(),
        user.email
    )
}

/// Comma-joined badge summary, e.g. `status=open, priority=high`.
#[must_use]
pub fn badge_summary(badges: &[FilterBadge]) -> String {
    badges
        .iter()
        .map(|b| format!("{}={}", b.dimension, b.value))
        .collect::<Vec<_>>()
        .join(", ")
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{truncated}…")
    }
}
