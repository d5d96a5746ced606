//! Generic content commands, shared by every domain.

use std::path::Path;

use serde::de::DeserializeOwned;

use portfolio_admin::AdminContext;
use portfolio_admin::gateway::ContentDomain;
use portfolio_admin_core::{AdminRole, RecordId};

use crate::error::CliError;
use crate::output;

/// Parse a JSON file into a draft.
pub fn read_draft<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CliError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| CliError::Draft {
        path: path.to_path_buf(),
        source,
    })
}

fn domain_label<D: ContentDomain>(ctx: &AdminContext) -> String {
    ctx.translator().t(&format!("domain.{}", D::NAME)).to_string()
}

pub async fn list<D: ContentDomain>(ctx: &AdminContext) -> Result<(), CliError> {
    ctx.auth().require_role(AdminRole::Admin)?;
    let records = ctx.list::<D>().await?;
    if records.is_empty() {
        let t = ctx.translator();
        output::print_line(&format!("{}: {}", domain_label::<D>(ctx), t.t("record.empty")));
    } else {
        output::print_json(&records)?;
    }
    Ok(())
}

pub async fn show<D: ContentDomain>(ctx: &AdminContext, id: RecordId) -> Result<(), CliError> {
    ctx.auth().require_role(AdminRole::Admin)?;
    let record = ctx.get::<D>(id).await?;
    output::print_json(&record)
}

pub async fn create<D: ContentDomain>(ctx: &AdminContext, file: &Path) -> Result<(), CliError> {
    ctx.auth().require_role(AdminRole::Admin)?;
    let draft: D::Draft = read_draft(file)?;
    save_created::<D>(ctx, draft).await
}

pub async fn update<D: ContentDomain>(
    ctx: &AdminContext,
    id: RecordId,
    file: &Path,
) -> Result<(), CliError> {
    ctx.auth().require_role(AdminRole::Admin)?;
    let draft: D::Draft = read_draft(file)?;
    save_updated::<D>(ctx, id, draft).await
}

pub async fn delete<D: ContentDomain>(ctx: &AdminContext, id: RecordId) -> Result<(), CliError> {
    ctx.auth().require_role(AdminRole::Admin)?;
    ctx.delete::<D>(id).await?;
    output::print_line(ctx.translator().t("record.deleted"));
    Ok(())
}

pub(crate) async fn save_created<D: ContentDomain>(
    ctx: &AdminContext,
    draft: D::Draft,
) -> Result<(), CliError> {
    let record = ctx.create::<D>(draft).await?;
    output::print_json(&record)?;
    output::print_line(ctx.translator().t("record.created"));
    Ok(())
}

pub(crate) async fn save_updated<D: ContentDomain>(
    ctx: &AdminContext,
    id: RecordId,
    draft: D::Draft,
) -> Result<(), CliError> {
    let record = ctx.update::<D>(id, draft).await?;
    output::print_json(&record)?;
    output::print_line(ctx.translator().t("record.updated"));
    Ok(())
}
