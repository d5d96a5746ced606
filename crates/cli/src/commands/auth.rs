//! Session and account commands.

use portfolio_admin::AdminContext;
use portfolio_admin::services::check_new_password;
use portfolio_admin_core::AdminRole;

use crate::error::CliError;
use crate::output;

fn expiry_line(ctx: &AdminContext) -> Option<String> {
    let expires_at = ctx.auth().sessions().expires_at()?;
    Some(ctx.translator().t_with(
        "auth.session_expires",
        &[("time", &expires_at.format("%Y-%m-%d %H:%M UTC").to_string())],
    ))
}

/// Sign in with a password read from standard input.
pub async fn login(ctx: &AdminContext, email: &str) -> Result<(), CliError> {
    output::print_error("Password:");
    let password = output::read_secret(&mut std::io::stdin().lock())?;
    let session = ctx.auth().authenticate(email, &password).await?;

    let t = ctx.translator();
    output::print_line(&t.t_with("auth.signed_in", &[("name", &session.full_name)]));
    if let Some(line) = expiry_line(ctx) {
        output::print_line(&line);
    }
    Ok(())
}

pub fn logout(ctx: &AdminContext) -> Result<(), CliError> {
    ctx.auth().sign_out()?;
    output::print_line(ctx.translator().t("auth.signed_out"));
    Ok(())
}

/// Print the stored session as JSON.
pub fn whoami(ctx: &AdminContext) -> Result<(), CliError> {
    let session = ctx.auth().require_role(AdminRole::Admin)?;
    output::print_json(&session)?;
    if let Some(line) = expiry_line(ctx) {
        output::print_line(&line);
    }
    Ok(())
}

/// Read the current password, the new one and its confirmation, one per
/// line of standard input.
pub async fn change_password(ctx: &AdminContext) -> Result<(), CliError> {
    let session = ctx.auth().require_role(AdminRole::Admin)?;

    let mut input = std::io::stdin().lock();
    output::print_error("Current password:");
    let current = output::read_secret(&mut input)?;
    output::print_error("New password:");
    let new = output::read_secret(&mut input)?;
    output::print_error("Confirm new password:");
    let confirm = output::read_secret(&mut input)?;
    drop(input);

    check_new_password(&new, &confirm)?;
    ctx.auth()
        .change_password(session.email.as_str(), &current, &new)
        .await?
        .ensure_accepted()?;

    output::print_line(ctx.translator().t("auth.password_updated"));
    Ok(())
}

/// Wait for the stored session to expire.
pub async fn watch(ctx: &AdminContext) -> Result<(), CliError> {
    let session = ctx.auth().require_role(AdminRole::Admin)?;
    tracing::info!(admin_id = %session.id, "Watching session");
    if let Some(line) = expiry_line(ctx) {
        output::print_line(&line);
    }
    if ctx.auth().expire_when_due().await {
        output::print_line(ctx.translator().t("auth.signed_out"));
    }
    Ok(())
}
