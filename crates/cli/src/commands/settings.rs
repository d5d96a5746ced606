//! Site settings by key.

use serde_json::Value as JsonValue;

use portfolio_admin::AdminContext;
use portfolio_admin::models::SiteSettingDraft;
use portfolio_admin_core::AdminRole;

use crate::error::CliError;
use crate::output;

/// A command-line value: JSON when it parses, a plain string otherwise.
fn parse_value(raw: &str) -> JsonValue {
    serde_json::from_str(raw).unwrap_or_else(|_| JsonValue::String(raw.to_string()))
}

pub async fn get(ctx: &AdminContext, key: &str) -> Result<(), CliError> {
    ctx.auth().require_role(AdminRole::Admin)?;
    let setting = ctx.setting(key).await?;
    output::print_json(&setting)
}

pub async fn set(
    ctx: &AdminContext,
    key: &str,
    value: &str,
    category: Option<String>,
    description: Option<String>,
) -> Result<(), CliError> {
    ctx.auth().require_role(AdminRole::Admin)?;
    let draft = SiteSettingDraft {
        category,
        description,
        ..SiteSettingDraft::new(key, parse_value(value))
    };
    let setting = ctx.upsert_setting(draft).await?;
    output::print_json(&setting)?;
    output::print_line(ctx.translator().t("record.updated"));
    Ok(())
}
