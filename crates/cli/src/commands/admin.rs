//! Admin user management commands.
//!
//! # Usage
//!
//! ```bash
//! # Create a new admin; password and confirmation on standard input
//! pa-cli admin create -e admin@example.com -n "Admin Name" -r super_admin
//! ```
//!
//! Only a signed-in super admin may create users.

use portfolio_admin::AdminContext;
use portfolio_admin::services::check_new_password;
use portfolio_admin_core::AdminRole;

use crate::error::CliError;
use crate::output;

/// Create a new admin user.
///
/// # Arguments
///
/// * `email` - New admin's email address
/// * `name` - New admin's display name
/// * `role` - New admin's role
pub async fn create_user(
    ctx: &AdminContext,
    email: &str,
    name: &str,
    role: AdminRole,
) -> Result<(), CliError> {
    let creator = ctx.auth().require_role(AdminRole::SuperAdmin)?;

    let mut input = std::io::stdin().lock();
    output::print_error("Password:");
    let password = output::read_secret(&mut input)?;
    output::print_error("Confirm password:");
    let confirm = output::read_secret(&mut input)?;
    drop(input);
    check_new_password(&password, &confirm)?;

    tracing::info!(created_by = %creator.id, "Creating admin user: {} ({})", email, role);
    let created = ctx.auth().create_user(email, &password, name, role).await?;

    output::print_line(ctx.translator().t("auth.user_created"));
    if !created.is_null() {
        output::print_json(&created)?;
    }
    Ok(())
}
