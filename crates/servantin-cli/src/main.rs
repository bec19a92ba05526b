use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use servantin_application::auth::RegistrationForm;
use servantin_core::booking::{ClientFilter, ProviderTab, TimeSlot};

mod app;
mod commands;
mod display;
mod logging;

#[derive(Parser)]
#[command(name = "servantin")]
#[command(about = "Servantin - services à domicile dans le Jura", long_about = None)]
struct Cli {
    /// Backend base URL (overrides config.toml and SERVANTIN_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in
    Login {
        email: String,
        #[arg(long)]
        password: String,
        /// Screen to open afterwards, e.g. /book
        #[arg(long)]
        redirect: Option<String>,
    },
    /// Sign out and forget the saved session
    Logout,
    /// Create an account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        password: String,
        /// Defaults to --password
        #[arg(long)]
        confirm: Option<String>,
        /// Register as a service provider
        #[arg(long)]
        provider: bool,
        /// Accept the terms and conditions
        #[arg(long)]
        accept_terms: bool,
    },
    /// Show the signed-in user
    Whoami,
    /// List service categories
    Categories,
    /// Request a service
    Book(BookArgs),
    /// List your bookings
    Bookings {
        #[arg(long, default_value = "all")]
        filter: ClientFilter,
    },
    /// Work with one booking
    Booking {
        #[command(subcommand)]
        action: BookingAction,
    },
    /// Provider space
    Provider {
        #[command(subcommand)]
        action: ProviderAction,
    },
    /// Password recovery
    Password {
        #[command(subcommand)]
        action: PasswordAction,
    },
    /// Verify an email address, or ask for a new link
    VerifyEmail {
        #[arg(long)]
        token: Option<String>,
        /// Send a new verification email to this address
        #[arg(long, conflicts_with = "token")]
        resend: Option<String>,
    },
    /// Back-office
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(clap::Args)]
struct BookArgs {
    /// Category slug, e.g. babysitting
    #[arg(long)]
    category: String,
    #[arg(long)]
    postal_code: String,
    #[arg(long)]
    city: String,
    #[arg(long, default_value = "JU")]
    canton: String,
    #[arg(long)]
    description: String,
    /// Preferred day (YYYY-MM-DD)
    #[arg(long)]
    date: Option<NaiveDate>,
    /// morning, afternoon or evening
    #[arg(long)]
    slot: Option<TimeSlot>,
    /// Provider id from the match list; omit to let the platform choose
    #[arg(long)]
    provider: Option<String>,
    #[arg(long)]
    budget_min: Option<f64>,
    #[arg(long)]
    budget_max: Option<f64>,
}

#[derive(Subcommand)]
enum BookingAction {
    /// Booking details and timeline
    Show { id: String },
    /// Cancel an active booking
    Cancel { id: String },
    /// Show the message thread
    Messages { id: String },
    /// Send a message
    Send { id: String, text: String },
}

#[derive(Subcommand)]
enum ProviderAction {
    /// Incoming requests and missions
    Requests {
        #[arg(long, default_value = "pending")]
        tab: ProviderTab,
    },
    /// Accept a pending request
    Accept {
        id: String,
    },
    /// Decline a pending request
    Decline {
        id: String,
        #[arg(long)]
        reason: Option<String>,
    },
    /// Mark an accepted mission as done
    Complete {
        id: String,
    },
    /// Show the profile, or edit it when any field flag is given
    Profile(ProfileArgs),
    /// Create the provider profile
    Onboard(OnboardArgs),
}

#[derive(clap::Args)]
struct ProfileArgs {
    #[arg(long)]
    bio: Option<String>,
    /// Category id to add or remove
    #[arg(long)]
    toggle_category: Vec<String>,
    /// Language code to add or remove
    #[arg(long)]
    toggle_language: Vec<String>,
    #[arg(long)]
    postal_code: Option<String>,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    radius: Option<u32>,
    #[arg(long)]
    rate: Option<f64>,
    #[arg(long)]
    experience: Option<u32>,
    #[arg(long)]
    add_certification: Vec<String>,
    /// Position of a certification to remove (from 1)
    #[arg(long)]
    remove_certification: Option<usize>,
}

#[derive(clap::Args)]
struct OnboardArgs {
    /// At least 50 characters
    #[arg(long)]
    bio: String,
    /// Category id (repeatable)
    #[arg(long = "category", required = true)]
    categories: Vec<String>,
    /// Language code (repeatable, default fr)
    #[arg(long = "language")]
    languages: Vec<String>,
    #[arg(long)]
    postal_code: String,
    #[arg(long)]
    city: String,
    #[arg(long)]
    radius: Option<u32>,
    #[arg(long)]
    rate: Option<f64>,
    #[arg(long, default_value_t = 0)]
    experience: u32,
    #[arg(long = "certification")]
    certifications: Vec<String>,
}

#[derive(Subcommand)]
enum PasswordAction {
    /// Email a reset link
    Forgot { email: String },
    /// Set a new password from a reset link
    Reset {
        #[arg(long)]
        token: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm: String,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// List providers
    Providers,
    /// Verify a provider (or revoke with --revoke)
    Verify {
        id: String,
        #[arg(long)]
        revoke: bool,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Page through all bookings
    Bookings {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        size: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let runtime = app::bootstrap(cli.api_url.clone())?;

    match cli.command {
        Commands::Login {
            email,
            password,
            redirect,
        } => commands::auth::login(&runtime, &email, &password, redirect.as_deref()).await?,
        Commands::Logout => commands::auth::logout(&runtime),
        Commands::Register {
            name,
            email,
            phone,
            password,
            confirm,
            provider,
            accept_terms,
        } => {
            let form = RegistrationForm {
                name,
                email,
                phone: phone.unwrap_or_default(),
                confirm_password: confirm.unwrap_or_else(|| password.clone()),
                password,
                accept_terms,
                register_as_provider: provider,
            };
            commands::auth::register(&runtime, &form).await?
        }
        Commands::Whoami => commands::auth::whoami(&runtime).await?,
        Commands::Categories => commands::catalog::categories(&runtime).await?,
        Commands::Book(args) => commands::book::run(&runtime, args).await?,
        Commands::Bookings { filter } => commands::bookings::list(&runtime, filter).await?,
        Commands::Booking { action } => match action {
            BookingAction::Show { id } => commands::bookings::show(&runtime, &id).await?,
            BookingAction::Cancel { id } => commands::bookings::cancel(&runtime, &id).await?,
            BookingAction::Messages { id } => commands::bookings::messages(&runtime, &id).await?,
            BookingAction::Send { id, text } => {
                commands::bookings::send(&runtime, &id, &text).await?
            }
        },
        Commands::Provider { action } => match action {
            ProviderAction::Requests { tab } => commands::provider::requests(&runtime, tab).await?,
            ProviderAction::Accept { id } => commands::provider::accept(&runtime, &id).await?,
            ProviderAction::Decline { id, reason } => {
                commands::provider::decline(&runtime, &id, reason.as_deref()).await?
            }
            ProviderAction::Complete { id } => commands::provider::complete(&runtime, &id).await?,
            ProviderAction::Profile(args) => commands::provider::profile(&runtime, args).await?,
            ProviderAction::Onboard(args) => commands::provider::onboard(&runtime, args).await?,
        },
        Commands::Password { action } => match action {
            PasswordAction::Forgot { email } => {
                commands::auth::forgot_password(&runtime, &email).await?
            }
            PasswordAction::Reset {
                token,
                password,
                confirm,
            } => commands::auth::reset_password(&runtime, &token, &password, &confirm).await?,
        },
        Commands::VerifyEmail { token, resend } => {
            commands::auth::verify_email(&runtime, token.as_deref(), resend.as_deref()).await?
        }
        Commands::Admin { action } => match action {
            AdminAction::Providers => commands::admin::providers(&runtime).await?,
            AdminAction::Verify { id, revoke, notes } => {
                commands::admin::verify(&runtime, &id, !revoke, notes.as_deref()).await?
            }
            AdminAction::Bookings { page, size } => {
                commands::admin::bookings(&runtime, page, size).await?
            }
        },
    }

    Ok(())
}
