//! Project commands driven by flags instead of a draft file.

use clap::Args;

use portfolio_admin::AdminContext;
use portfolio_admin::gateway::Projects;
use portfolio_admin::models::ProjectDraft;
use portfolio_admin_core::{AdminRole, ProjectCategory, ProjectStatus, RecordId};

use crate::commands::content::{save_created, save_updated};
use crate::error::CliError;

#[derive(Debug, Default, Args)]
pub struct ProjectArgs {
    #[arg(long)]
    title_en: Option<String>,
    #[arg(long)]
    title_ar: Option<String>,
    #[arg(long)]
    description_en: Option<String>,
    #[arg(long)]
    description_ar: Option<String>,
    /// `planned`, `in_progress` or `completed`
    #[arg(long)]
    status: Option<ProjectStatus>,
    /// e.g. `machine_learning`, `nlp`, `computer_vision`
    #[arg(long)]
    category: Option<ProjectCategory>,
    /// Technologies, comma separated; replaces the stored list
    #[arg(long, value_delimiter = ',')]
    tech: Vec<String>,
    #[arg(long)]
    image_url: Option<String>,
    #[arg(long)]
    demo_url: Option<String>,
    #[arg(long)]
    github_url: Option<String>,
    #[arg(long)]
    featured: Option<bool>,
    #[arg(long)]
    sort_order: Option<i32>,
}

impl ProjectArgs {
    /// Overlay the flags that were given onto `base`.
    fn apply(self, base: ProjectDraft) -> ProjectDraft {
        ProjectDraft {
            title_en: self.title_en.or(base.title_en),
            title_ar: self.title_ar.or(base.title_ar),
            description_en: self.description_en.or(base.description_en),
            description_ar: self.description_ar.or(base.description_ar),
            status: self.status.or(base.status),
            category: self.category.or(base.category),
            tech_stack: if self.tech.is_empty() {
                base.tech_stack
            } else {
                Some(self.tech)
            },
            image_url: self.image_url.or(base.image_url),
            demo_url: self.demo_url.or(base.demo_url),
            github_url: self.github_url.or(base.github_url),
            is_featured: self.featured.or(base.is_featured),
            sort_order: self.sort_order.or(base.sort_order),
            ..base
        }
    }
}

pub async fn create(ctx: &AdminContext, args: ProjectArgs) -> Result<(), CliError> {
    ctx.auth().require_role(AdminRole::Admin)?;
    save_created::<Projects>(ctx, args.apply(ProjectDraft::default())).await
}

/// Update a project, keeping stored values for flags that were not given.
pub async fn update(ctx: &AdminContext, id: RecordId, args: ProjectArgs) -> Result<(), CliError> {
    ctx.auth().require_role(AdminRole::Admin)?;
    let current = ctx.content::<Projects>().get_by_id(id).await?;
    save_updated::<Projects>(ctx, id, args.apply(ProjectDraft::from(&current))).await
}
