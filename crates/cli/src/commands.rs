//! CLI commands

use anyhow::{Context, Result};
use chatrizz_core::{ListQuery, OverviewQuery};
use chatrizz_domain::{
    AdminPayload, AdminRole, Audience, Channel, ContentKind, LoginCredentials,
    NotificationPayload, ReportReason, ReportStatus,
};
use chatrizz_infra::api::{
    admin_query, content_query, group_query, notification_query, report_query,
    user_content_query, user_query,
};
use chatrizz_infra::AdminSession;
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use serde_json::{json, Value};
use tracing::info;

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sign in and store the session
    Login {
        #[arg(long, env = "CHATRIZZ_ADMIN_EMAIL")]
        email: String,

        #[arg(long, env = "CHATRIZZ_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Check whether the stored session is usable, refreshing it if needed
    Status,

    /// Dashboard metrics and the daily engagement series
    Overview {
        /// First day of the window (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Last day of the window (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,

        #[command(flatten)]
        list: ListArgs,
    },

    /// Platform users
    Users {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Admin team
    Admins {
        #[command(subcommand)]
        command: AdminCommands,
    },

    /// Broadcast notifications
    Notifications {
        #[command(subcommand)]
        command: NotificationCommands,
    },

    /// Posts, products and reviews
    Content {
        #[command(subcommand)]
        command: ContentCommands,
    },

    /// Abuse reports
    Reports {
        #[command(subcommand)]
        command: ReportCommands,
    },

    /// Groups
    Groups {
        #[command(subcommand)]
        command: GroupCommands,
    },
}

/// Pagination and search shared by every listing.
#[derive(Debug, Clone, Default, Args)]
pub struct ListArgs {
    /// Free-text search (ignored below three characters)
    #[arg(long)]
    pub search: Option<String>,

    #[arg(long)]
    pub page: Option<u32>,

    #[arg(long)]
    pub limit: Option<u32>,
}

impl ListArgs {
    fn apply(&self, mut query: ListQuery) -> ListQuery {
        if let Some(search) = &self.search {
            query = query.with_search(search);
        }
        if let Some(page) = self.page {
            query = query.with_page(page);
        }
        if let Some(limit) = self.limit {
            query = query.with_limit(limit);
        }
        query
    }
}

#[derive(Debug, Subcommand)]
pub enum UserCommands {
    List {
        #[command(flatten)]
        list: ListArgs,
    },
    Show {
        id: String,
    },
    /// Content created by one user
    Content {
        id: String,

        #[arg(long)]
        kind: Option<ContentKind>,

        #[command(flatten)]
        list: ListArgs,
    },
    Suspend {
        id: String,
    },
    RemoveBadge {
        id: String,
    },
}

#[derive(Debug, Clone, Args)]
pub struct AdminFields {
    #[arg(long)]
    pub full_name: String,

    #[arg(long)]
    pub email: String,

    /// `administrator` or `sub-admin`
    #[arg(long)]
    pub role: AdminRole,
}

impl From<AdminFields> for AdminPayload {
    fn from(fields: AdminFields) -> Self {
        Self { full_name: fields.full_name, email: fields.email, role: fields.role }
    }
}

#[derive(Debug, Subcommand)]
pub enum AdminCommands {
    List {
        #[command(flatten)]
        list: ListArgs,
    },
    Show {
        id: String,
    },
    Create {
        #[command(flatten)]
        fields: AdminFields,
    },
    Update {
        id: String,

        #[command(flatten)]
        fields: AdminFields,
    },
    Suspend {
        id: String,
    },
}

#[derive(Debug, Clone, Args)]
pub struct NotificationFields {
    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub message: String,

    #[arg(long)]
    pub audience: Audience,

    /// `in-app`, `push` or `email`
    #[arg(long)]
    pub channel: Channel,
}

impl From<NotificationFields> for NotificationPayload {
    fn from(fields: NotificationFields) -> Self {
        Self {
            title: fields.title,
            message: fields.message,
            audience: fields.audience,
            channel: fields.channel,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum NotificationCommands {
    List {
        #[arg(long)]
        audience: Option<Audience>,

        #[command(flatten)]
        list: ListArgs,
    },
    Show {
        id: String,
    },
    Create {
        #[command(flatten)]
        fields: NotificationFields,
    },
    Update {
        id: String,

        #[command(flatten)]
        fields: NotificationFields,
    },
}

#[derive(Debug, Subcommand)]
pub enum ContentCommands {
    List {
        #[arg(long)]
        kind: Option<ContentKind>,

        #[command(flatten)]
        list: ListArgs,
    },
    Delete {
        kind: ContentKind,
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum ReportCommands {
    List {
        #[arg(long)]
        status: Option<ReportStatus>,

        #[arg(long)]
        reason: Option<ReportReason>,

        #[command(flatten)]
        list: ListArgs,
    },
    Resolve {
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum GroupCommands {
    List {
        #[command(flatten)]
        list: ListArgs,
    },
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).context("Failed to encode response")
}

impl Commands {
    /// Short name used in logs.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Login { .. } => "login",
            Self::Logout => "logout",
            Self::Status => "status",
            Self::Overview { .. } => "overview",
            Self::Users { .. } => "users",
            Self::Admins { .. } => "admins",
            Self::Notifications { .. } => "notifications",
            Self::Content { .. } => "content",
            Self::Reports { .. } => "reports",
            Self::Groups { .. } => "groups",
        }
    }

    /// Run the command and return what should be printed.
    pub async fn execute(self, session: &AdminSession) -> Result<Value> {
        match self {
            Self::Login { email, password } => {
                let profile = session.auth.login(&LoginCredentials::new(email, password)).await?;
                info!(user_id = %profile.id, "signed in");
                to_json(&profile)
            }
            Self::Logout => {
                session.auth.logout().await?;
                Ok(json!({ "state": "unauthenticated" }))
            }
            Self::Status => {
                let state = session.auth.restore_session().await?;
                let user = session.auth.current_user().await?;
                Ok(json!({ "state": state, "user": user }))
            }
            Self::Overview { start, end, list } => {
                let mut query = OverviewQuery::default().between(start, end);
                query.list = list.apply(query.list);
                let (overview, daily) = session.api.overview_with_engagement(&query).await?;
                Ok(json!({ "overview": overview, "daily": daily }))
            }
            Self::Users { command } => command.execute(session).await,
            Self::Admins { command } => command.execute(session).await,
            Self::Notifications { command } => command.execute(session).await,
            Self::Content { command } => command.execute(session).await,
            Self::Reports { command } => command.execute(session).await,
            Self::Groups { command } => command.execute(session).await,
        }
    }
}

impl UserCommands {
    async fn execute(self, session: &AdminSession) -> Result<Value> {
        let api = &session.api;
        match self {
            Self::List { list } => to_json(&api.list_users(&list.apply(user_query())).await?),
            Self::Show { id } => to_json(&api.get_user(&id).await?),
            Self::Content { id, kind, list } => {
                to_json(&api.user_content(&id, &list.apply(user_content_query(kind))).await?)
            }
            Self::Suspend { id } => to_json(&api.suspend_user(&id).await?),
            Self::RemoveBadge { id } => to_json(&api.remove_badge(&id).await?),
        }
    }
}

impl AdminCommands {
    async fn execute(self, session: &AdminSession) -> Result<Value> {
        let api = &session.api;
        match self {
            Self::List { list } => to_json(&api.list_admins(&list.apply(admin_query())).await?),
            Self::Show { id } => to_json(&api.get_admin(&id).await?),
            Self::Create { fields } => to_json(&api.create_admin(&fields.into()).await?),
            Self::Update { id, fields } => to_json(&api.update_admin(&id, &fields.into()).await?),
            Self::Suspend { id } => to_json(&api.suspend_admin(&id).await?),
        }
    }
}

impl NotificationCommands {
    async fn execute(self, session: &AdminSession) -> Result<Value> {
        let api = &session.api;
        match self {
            Self::List { audience, list } => {
                to_json(&api.list_notifications(&list.apply(notification_query(audience))).await?)
            }
            Self::Show { id } => to_json(&api.get_notification(&id).await?),
            Self::Create { fields } => to_json(&api.create_notification(&fields.into()).await?),
            Self::Update { id, fields } => {
                to_json(&api.update_notification(&id, &fields.into()).await?)
            }
        }
    }
}

impl ContentCommands {
    async fn execute(self, session: &AdminSession) -> Result<Value> {
        let api = &session.api;
        match self {
            Self::List { kind, list } => {
                to_json(&api.list_content(&list.apply(content_query(kind))).await?)
            }
            Self::Delete { kind, id } => to_json(&api.delete_content(kind, &id).await?),
        }
    }
}

impl ReportCommands {
    async fn execute(self, session: &AdminSession) -> Result<Value> {
        let api = &session.api;
        match self {
            Self::List { status, reason, list } => {
                to_json(&api.list_reports(&list.apply(report_query(status, reason))).await?)
            }
            Self::Resolve { id } => to_json(&api.resolve_report(&id).await?),
        }
    }
}

impl GroupCommands {
    async fn execute(self, session: &AdminSession) -> Result<Value> {
        match self {
            Self::List { list } => to_json(&session.api.list_groups(&list.apply(group_query())).await?),
        }
    }
}
