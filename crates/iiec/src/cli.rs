//! Clap derive structures for the `iiec` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use iiec_core::{EntityId, ProjectStatus};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// iiec -- admin console for the IIEC website backend
#[derive(Debug, Parser)]
#[command(
    name = "iiec",
    version,
    about = "Manage IIEC projects, events, and products from the command line",
    long_about = "Admin client for the IIEC website backend.\n\n\
        Log in once with `iiec auth login`; the session token is kept per\n\
        profile in a file or the system keyring.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config profile to use
    #[arg(long, short = 'p', env = "IIEC_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend URL (overrides profile)
    #[arg(long, short = 'u', env = "IIEC_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "IIEC_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "IIEC_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in, log out, and inspect the session
    Auth(AuthArgs),

    /// Manage projects
    #[command(alias = "proj")]
    Projects(ProjectsArgs),

    /// Manage the sections of a project
    #[command(alias = "sec")]
    Sections(SectionsArgs),

    /// Manage events
    #[command(alias = "ev")]
    Events(EventsArgs),

    /// Manage store products
    #[command(alias = "prod")]
    Products(ProductsArgs),

    /// Place and review store orders
    Orders(OrdersArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  AUTH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Log in and store the session token
    Login {
        /// Admin email (defaults to the profile's email)
        #[arg(long, short = 'e')]
        email: Option<String>,

        /// Read the password from this environment variable instead of prompting
        #[arg(long)]
        password_env: Option<String>,
    },

    /// Drop the stored session token
    Logout,

    /// Verify the stored token and show the logged-in user
    Whoami,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PROJECTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ProjectsArgs {
    #[command(subcommand)]
    pub command: ProjectsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProjectsCommand {
    /// List projects
    #[command(alias = "ls")]
    List,

    /// Show a project with its sections
    Get {
        /// Project ID
        id: EntityId,
    },

    /// Create a project
    Create(ProjectFields),

    /// Update a project (unset flags keep their current values)
    Update {
        /// Project ID
        id: EntityId,

        #[command(flatten)]
        fields: ProjectFields,
    },

    /// Delete a project
    #[command(alias = "rm")]
    Delete {
        /// Project ID
        id: EntityId,
    },
}

#[derive(Debug, Args)]
pub struct ProjectFields {
    /// Project name
    #[arg(long)]
    pub name: Option<String>,

    /// Short description
    #[arg(long)]
    pub description: Option<String>,

    /// Longer overview text
    #[arg(long)]
    pub overview: Option<String>,

    /// Main image URL
    #[arg(long)]
    pub image_url: Option<String>,

    /// Status: active, inactive, or draft
    #[arg(long)]
    pub status: Option<ProjectStatus>,

    /// Load the draft from a JSON file (flags override its fields)
    #[arg(long, short = 'F')]
    pub from_file: Option<PathBuf>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SECTIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SectionsArgs {
    #[command(subcommand)]
    pub command: SectionsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SectionsCommand {
    /// List the sections of a project
    #[command(alias = "ls")]
    List {
        /// Project ID
        project: EntityId,
    },

    /// Show one section
    Get {
        /// Section ID
        id: EntityId,
    },

    /// Add a section to a project
    Create {
        /// Project ID
        project: EntityId,

        #[command(flatten)]
        fields: SectionFields,
    },

    /// Update a section (unset flags keep their current values)
    Update {
        /// Project ID
        project: EntityId,

        /// Section ID
        id: EntityId,

        #[command(flatten)]
        fields: SectionFields,
    },

    /// Delete a section
    #[command(alias = "rm")]
    Delete {
        /// Project ID
        project: EntityId,

        /// Section ID
        id: EntityId,
    },
}

#[derive(Debug, Args)]
pub struct SectionFields {
    /// Section title
    #[arg(long)]
    pub title: Option<String>,

    /// Short description
    #[arg(long)]
    pub description: Option<String>,

    /// Detailed body text
    #[arg(long)]
    pub details: Option<String>,

    /// Image URL
    #[arg(long)]
    pub image_url: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  EVENTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct EventsArgs {
    #[command(subcommand)]
    pub command: EventsCommand,
}

#[derive(Debug, Subcommand)]
pub enum EventsCommand {
    /// List events
    #[command(alias = "ls")]
    List {
        /// Only events on or after today, soonest first
        #[arg(long, conflicts_with = "past")]
        upcoming: bool,

        /// Only events before today, most recent first
        #[arg(long)]
        past: bool,

        /// Max upcoming events to show
        #[arg(long, short = 'l', default_value = "3")]
        limit: usize,
    },

    /// Create an event
    Create(EventFields),

    /// Update an event (unset flags keep their current values)
    Update {
        /// Event ID
        id: EntityId,

        #[command(flatten)]
        fields: EventFields,
    },

    /// Delete an event
    #[command(alias = "rm")]
    Delete {
        /// Event ID
        id: EntityId,
    },
}

#[derive(Debug, Args)]
pub struct EventFields {
    /// Event title
    #[arg(long)]
    pub title: Option<String>,

    /// Description
    #[arg(long)]
    pub description: Option<String>,

    /// Date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,

    /// Time of day, free text
    #[arg(long)]
    pub time: Option<String>,

    /// Venue
    #[arg(long)]
    pub location: Option<String>,

    /// Image URL
    #[arg(long)]
    pub image_url: Option<String>,

    /// Registration or info link
    #[arg(long)]
    pub url: Option<String>,

    /// Load the draft from a JSON file (flags override its fields)
    #[arg(long, short = 'F')]
    pub from_file: Option<PathBuf>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PRODUCTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ProductsArgs {
    #[command(subcommand)]
    pub command: ProductsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProductsCommand {
    /// List products
    #[command(alias = "ls")]
    List,

    /// Create a product
    Create(ProductFields),

    /// Update a product (unset flags keep their current values)
    Update {
        /// Product ID
        id: EntityId,

        #[command(flatten)]
        fields: ProductFields,
    },

    /// Delete a product
    #[command(alias = "rm")]
    Delete {
        /// Product ID
        id: EntityId,
    },
}

#[derive(Debug, Args)]
pub struct ProductFields {
    /// Product name
    #[arg(long)]
    pub name: Option<String>,

    /// Description
    #[arg(long)]
    pub description: Option<String>,

    /// Unit price
    #[arg(long)]
    pub price: Option<f64>,

    /// Whether the product is in stock
    #[arg(long, action = clap::ArgAction::Set)]
    pub in_stock: Option<bool>,

    /// Image URL
    #[arg(long)]
    pub image_url: Option<String>,

    /// Load the draft from a JSON file (flags override its fields)
    #[arg(long, short = 'F')]
    pub from_file: Option<PathBuf>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ORDERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct OrdersArgs {
    #[command(subcommand)]
    pub command: OrdersCommand,
}

#[derive(Debug, Subcommand)]
pub enum OrdersCommand {
    /// List recorded orders
    #[command(alias = "ls")]
    List,

    /// Place an order (no login needed)
    Place {
        /// Product title
        #[arg(long)]
        product: String,

        /// Unit price
        #[arg(long)]
        price: f64,

        /// Quantity
        #[arg(long, default_value = "1")]
        quantity: u32,

        /// Customer's full name
        #[arg(long)]
        name: String,

        /// Customer's email
        #[arg(long)]
        email: String,

        /// Customer's phone or other contact
        #[arg(long)]
        contact: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Set a value on the active profile
    Set {
        /// Key: api_url, email, token_store, write_policy, insecure, timeout
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
