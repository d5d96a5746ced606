//! Portfolio admin CLI - manage portfolio content from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (the password is read from standard input)
//! pa-cli login -e admin@example.com
//!
//! # List, show and delete content
//! pa-cli list projects
//! pa-cli show publications 6f1c1c5e-7c3a-4a57-9a59-6f0b7f8f6e11
//! pa-cli delete testimonials 6f1c1c5e-7c3a-4a57-9a59-6f0b7f8f6e11
//!
//! # Create or update from a JSON draft
//! pa-cli create blog --file post.json
//!
//! # Create a project from flags
//! pa-cli project create --title-en "Vision" --title-ar "رؤية" \
//!     --description-en "Image models" --description-ar "نماذج الصور"
//!
//! # Site settings
//! pa-cli settings set site_title '"My Portfolio"'
//!
//! # Create another admin (super admins only)
//! pa-cli admin create -e new@example.com -n "New Admin" -r admin
//!
//! # Messages in Arabic for one command, or switch for good
//! pa-cli --lang ar list research
//! pa-cli lang ar
//! ```
//!
//! # Commands
//!
//! - `login` / `logout` / `whoami` / `passwd` / `watch` - session and account
//! - `admin create` - create admin users
//! - `list` / `show` / `create` / `update` / `delete` - generic content CRUD
//! - `project` - project create/update from flags
//! - `settings` - site settings by key
//! - `lang` - saved dashboard language

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use portfolio_admin::AdminContext;
use portfolio_admin::config::{AdminConfig, LogFormat};
use portfolio_admin::gateway::{
    BlogPosts, Categories, Projects, Publications, ResearchProjects, Services, Settings,
    Testimonials,
};
use portfolio_admin_core::{AdminRole, Language, RecordId};

mod commands;
mod error;
mod output;

use commands::project::ProjectArgs;
use error::CliError;

#[derive(Parser)]
#[command(name = "pa-cli")]
#[command(author, version, about = "Portfolio admin dashboard")]
struct Cli {
    /// Message language for this command (`en` or `ar`)
    #[arg(long, global = true)]
    lang: Option<Language>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in; the password is read from standard input
    Login {
        /// Admin email address
        #[arg(short, long)]
        email: String,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in admin and when the session expires
    Whoami,
    /// Change the signed-in admin's password
    Passwd,
    /// Block until the stored session expires, then sign out
    Watch,
    /// Manage admin users
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// List every record of a content domain
    List { domain: Domain },
    /// Show one record
    Show { domain: Domain, id: RecordId },
    /// Create a record from a JSON draft file
    Create {
        domain: Domain,
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Update a record from a JSON draft file
    Update {
        domain: Domain,
        id: RecordId,
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Delete one record
    Delete { domain: Domain, id: RecordId },
    /// Create or edit projects from flags
    Project {
        #[command(subcommand)]
        action: ProjectAction,
    },
    /// Read and write site settings by key
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Show the saved dashboard language, or change it
    Lang { language: Option<Language> },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin user; the password is read from standard input
    Create {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Admin display name
        #[arg(short, long)]
        name: String,

        /// Admin role (`super_admin`, `admin`)
        #[arg(short, long, default_value = "admin")]
        role: AdminRole,
    },
}

#[derive(Subcommand)]
enum ProjectAction {
    /// Create a project
    Create(ProjectArgs),
    /// Update a project; unset flags keep their stored value
    Update {
        id: RecordId,
        #[command(flatten)]
        args: ProjectArgs,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// List every setting
    List,
    /// Show one setting
    Get { key: String },
    /// Create or replace a setting; the value is JSON, or plain text
    Set {
        key: String,
        value: String,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
}

/// Content domains addressable from the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Domain {
    Projects,
    Research,
    Publications,
    Blog,
    Services,
    Categories,
    Settings,
    Testimonials,
}

/// Run `$body` with `$d` bound to the gateway type of `$domain`.
macro_rules! with_domain {
    ($domain:expr, $d:ident => $body:expr) => {
        match $domain {
            Domain::Projects => {
                type $d = Projects;
                $body
            }
            Domain::Research => {
                type $d = ResearchProjects;
                $body
            }
            Domain::Publications => {
                type $d = Publications;
                $body
            }
            Domain::Blog => {
                type $d = BlogPosts;
                $body
            }
            Domain::Services => {
                type $d = Services;
                $body
            }
            Domain::Categories => {
                type $d = Categories;
                $body
            }
            Domain::Settings => {
                type $d = Settings;
                $body
            }
            Domain::Testimonials => {
                type $d = Testimonials;
                $body
            }
        }
    };
}

fn init_tracing(format: LogFormat) {
    // Logs go to stderr; stdout carries command output
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warn,portfolio_admin=info,pa_cli=info".into());

    let json_layer = (format == LogFormat::Json).then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (format == LogFormat::Text)
        .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AdminConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(LogFormat::Text);
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };
    init_tracing(config.log_format);

    let mut ctx = match AdminContext::from_config(config) {
        Ok(ctx) => ctx,
        Err(e) => {
            tracing::error!("Failed to start: {e}");
            std::process::exit(1);
        }
    };
    if let Some(language) = cli.lang {
        ctx.use_language(language);
    }

    if let Err(e) = run(cli.command, &mut ctx).await {
        tracing::error!(code = e.code(), "Command failed: {e}");
        output::print_error(&e.user_message(ctx.translator()));
        std::process::exit(1);
    }
}

async fn run(command: Commands, ctx: &mut AdminContext) -> Result<(), CliError> {
    match command {
        Commands::Login { email } => commands::auth::login(ctx, &email).await?,
        Commands::Logout => commands::auth::logout(ctx)?,
        Commands::Whoami => commands::auth::whoami(ctx)?,
        Commands::Passwd => commands::auth::change_password(ctx).await?,
        Commands::Watch => commands::auth::watch(ctx).await?,
        Commands::Admin { action } => match action {
            AdminAction::Create { email, name, role } => {
                commands::admin::create_user(ctx, &email, &name, role).await?;
            }
        },
        Commands::List { domain } => {
            with_domain!(domain, D => commands::content::list::<D>(ctx).await?);
        }
        Commands::Show { domain, id } => {
            with_domain!(domain, D => commands::content::show::<D>(ctx, id).await?);
        }
        Commands::Create { domain, file } => {
            with_domain!(domain, D => commands::content::create::<D>(ctx, &file).await?);
        }
        Commands::Update { domain, id, file } => {
            with_domain!(domain, D => commands::content::update::<D>(ctx, id, &file).await?);
        }
        Commands::Delete { domain, id } => {
            with_domain!(domain, D => commands::content::delete::<D>(ctx, id).await?);
        }
        Commands::Project { action } => match action {
            ProjectAction::Create(args) => commands::project::create(ctx, args).await?,
            ProjectAction::Update { id, args } => {
                commands::project::update(ctx, id, args).await?;
            }
        },
        Commands::Settings { action } => match action {
            SettingsAction::List => commands::content::list::<Settings>(ctx).await?,
            SettingsAction::Get { key } => commands::settings::get(ctx, &key).await?,
            SettingsAction::Set {
                key,
                value,
                category,
                description,
            } => commands::settings::set(ctx, &key, &value, category, description).await?,
        },
        Commands::Lang { language } => commands::lang(ctx, language)?,
    }
    Ok(())
}
