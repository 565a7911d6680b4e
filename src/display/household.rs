//! Household, user and notification views

use tabled::Tabled;

use super::table;
use crate::models::{Notification, SplitMethod, User, UserId};
use crate::services::HouseholdView;

/// Household details with its members in join order
pub fn format_household(view: &HouseholdView) -> String {
    let household = &view.household;
    let mut output = String::new();

    output.push_str(&format!("Household: {}\n", household.name));
    output.push_str(&format!("  ID:          {}\n", household.id));
    output.push_str(&format!("  Invite code: {}\n", household.invite_code));
    output.push_str(&format!("  Split:       {}", household.split_method));
    if household.split_method == SplitMethod::Custom {
        if let Some(custom) = household.custom_split {
            output.push_str(&format!(
                " ({}% / {}%)",
                custom.user1_percentage, custom.user2_percentage
            ));
        }
    }
    output.push('\n');

    output.push_str("  Members:\n");
    for (position, member) in view.members.iter().enumerate() {
        let joined = member
            .joined_at
            .map(|t| t.date_naive().to_string())
            .unwrap_or_default();
        output.push_str(&format!(
            "    {}. {} ({}) joined {}\n",
            position + 1,
            member.name,
            member.id,
            joined
        ));
    }
    if view.members.len() < 2 {
        output.push_str("  Waiting for a second member to join with the invite code.\n");
    }

    output
}

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "")]
    marker: &'static str,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Household")]
    household: String,
}

/// Registered users, the active one marked with `*`
pub fn format_user_list(users: &[User], active: Option<UserId>) -> String {
    if users.is_empty() {
        return "No users registered.".to_string();
    }

    table(
        users
            .iter()
            .map(|u| UserRow {
                marker: if Some(u.id) == active { "*" } else { "" },
                id: u.id.to_string(),
                name: u.name.clone(),
                email: u.email.clone(),
                household: u.household_id.map(|h| h.to_string()).unwrap_or_default(),
            })
            .collect(),
    )
}

#[derive(Tabled)]
struct NotificationRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "")]
    unread: &'static str,
    #[tabled(rename = "Received")]
    received: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Message")]
    message: String,
}

pub fn format_notification_list(notifications: &[Notification]) -> String {
    if notifications.is_empty() {
        return "No notifications.".to_string();
    }

    table(
        notifications
            .iter()
            .map(|n| NotificationRow {
                id: n.id.to_string(),
                unread: if n.is_read { "" } else { "new" },
                received: n.created_at.format("%Y-%m-%d %H:%M").to_string(),
                kind: n.payload.notification_type.to_string(),
                title: n.payload.title.clone(),
                message: n.payload.message.clone(),
            })
            .collect(),
    )
}
