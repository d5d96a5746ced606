//! Command implementations.
//!
//! Every command except `login`, `logout` and `lang` needs a valid session.

pub mod admin;
pub mod auth;
pub mod content;
pub mod project;
pub mod settings;

use portfolio_admin::AdminContext;
use portfolio_admin_core::Language;

use crate::error::CliError;
use crate::output;

/// Show the saved language, or persist a new one.
pub fn lang(ctx: &mut AdminContext, language: Option<Language>) -> Result<(), CliError> {
    match language {
        Some(language) => {
            ctx.set_language(language)?;
            output::print_line(&format!("{language} ({})", language.direction().as_str()));
        }
        None => {
            let current = ctx.translator().language();
            output::print_line(&format!("{current} ({})", current.direction().as_str()));
        }
    }
    Ok(())
}
