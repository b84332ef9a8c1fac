//! Clap derive structures for the `rollsync` CLI.
//!
//! Every roster command also answers to its fleet name: `drivers` for
//! `people`, `routes` for `subjects`, `telemetry` for `events`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// rollsync -- keep a local view of the roster service in sync
#[derive(Debug, Parser)]
#[command(
    name = "rollsync",
    version,
    about = "Sync and manage roster records from the command line",
    long_about = "Client for the roster record-keeping service.\n\n\
        Reads go to the service while a session is held and fall back to\n\
        the locally stored collections otherwise. Writes always go to the\n\
        service and are confirmed by a full reload.",
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
    /// Service profile to use
    #[arg(long, short = 'p', env = "ROLLSYNC_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Service base URL (overrides profile)
    #[arg(long, short = 'u', env = "ROLLSYNC_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Directory holding the session and the fallback collections
    #[arg(long, env = "ROLLSYNC_STORE_DIR", global = true)]
    pub store_dir: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "ROLLSYNC_OUTPUT",
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

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "ROLLSYNC_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "ROLLSYNC_TIMEOUT", global = true)]
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
    /// Sign in and store the session credential
    Login(LoginArgs),

    /// Register a record-keeper account
    #[command(alias = "fleet-signup")]
    Signup(SignupArgs),

    /// Forget the stored session
    Logout,

    /// Reload people and subjects and report what was loaded
    Reload,

    /// Dashboard counts (people, subjects, events recorded today)
    #[command(alias = "summary")]
    Status,

    /// Manage people
    #[command(alias = "drivers", alias = "ppl")]
    People(PeopleArgs),

    /// Manage subjects
    #[command(alias = "routes", alias = "subj")]
    Subjects(SubjectsArgs),

    /// Record and query status events
    #[command(alias = "telemetry", alias = "ev")]
    Events(EventsArgs),

    /// Inspect or seed the local fallback store
    Store(StoreArgs),

    /// Manage configuration profiles
    #[command(alias = "cfg")]
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SESSION
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Role {
    /// Record keeper (fleet manager)
    #[value(alias = "teacher", alias = "fleet")]
    Primary,
    /// Enrolled person (driver)
    #[value(alias = "student", alias = "driver")]
    Secondary,
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Which kind of account to sign in with
    #[arg(long, short = 'r', value_enum, default_value = "primary")]
    pub role: Role,

    /// Account email
    #[arg(long, short = 'e')]
    pub email: String,

    /// Person identifier (required for the secondary role)
    #[arg(long, short = 'i')]
    pub identifier: Option<String>,

    /// Password (prompted when omitted)
    #[arg(long, env = "ROLLSYNC_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Debug, Args)]
pub struct SignupArgs {
    /// Staff identifier
    #[arg(long, short = 'i')]
    pub identifier: String,

    #[arg(long)]
    pub first_name: String,

    #[arg(long)]
    pub last_name: String,

    #[arg(long, short = 'e')]
    pub email: String,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub department: Option<String>,

    /// Password (prompted when omitted)
    #[arg(long, env = "ROLLSYNC_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PEOPLE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct PeopleArgs {
    #[command(subcommand)]
    pub command: PeopleCommand,
}

#[derive(Debug, Subcommand)]
pub enum PeopleCommand {
    /// List people
    #[command(alias = "ls")]
    List,

    /// Get one person from the service
    Get {
        /// Person ID
        id: String,
    },

    /// Enrol a person
    Add(PersonFields),

    /// Update a person
    Update {
        /// Person ID
        id: String,

        #[command(flatten)]
        fields: PersonFields,
    },

    /// Remove a person
    #[command(alias = "rm")]
    Remove {
        /// Person ID
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct PersonFields {
    /// Display name
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Roll number / driver number (generated when omitted on add)
    #[arg(long, short = 'i', alias = "driver-id")]
    pub identifier: Option<String>,

    #[arg(long, short = 'e')]
    pub email: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub department: Option<String>,

    /// Semester / level
    #[arg(long, alias = "semester")]
    pub level: Option<u32>,

    /// Initial password for the person's own account
    #[arg(long)]
    pub password: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SUBJECTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SubjectsArgs {
    #[command(subcommand)]
    pub command: SubjectsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SubjectsCommand {
    /// List subjects
    #[command(alias = "ls")]
    List,

    /// Get one subject from the service
    Get {
        /// Subject ID
        id: String,
    },

    /// Create a subject
    Add(SubjectFields),

    /// Update a subject
    Update {
        /// Subject ID
        id: String,

        #[command(flatten)]
        fields: SubjectFields,
    },

    /// Remove a subject
    #[command(alias = "rm")]
    Remove {
        /// Subject ID
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct SubjectFields {
    /// Subject code / route code
    #[arg(long, short = 'c', alias = "route-code")]
    pub code: Option<String>,

    /// Subject name / route name
    #[arg(long, short = 'n', alias = "route-name")]
    pub name: Option<String>,

    #[arg(long)]
    pub credits: Option<u32>,

    #[arg(long)]
    pub department: Option<String>,

    /// Owning record keeper (teacher / manager ID)
    #[arg(long, alias = "manager")]
    pub owner: Option<String>,
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
    /// Record one status event
    #[command(alias = "mark")]
    Record {
        /// Person (driver) ID
        #[arg(long, alias = "driver")]
        person: String,

        /// Subject (route) ID
        #[arg(long, alias = "route")]
        subject: String,

        /// present | absent | late (or on-duty | off-duty | delayed)
        #[arg(long, short = 's')]
        status: String,

        /// Event date, YYYY-MM-DD (defaults to today)
        #[arg(long, short = 'd')]
        date: Option<String>,

        /// Who recorded it
        #[arg(long)]
        by: Option<String>,
    },

    /// Record a batch of events from a JSON array file
    Bulk {
        /// JSON file of event drafts
        #[arg(long, short = 'f')]
        file: PathBuf,
    },

    /// A person's event history
    History {
        /// Person (driver) ID
        person: String,

        /// Only events for this subject (route)
        #[arg(long, alias = "route")]
        subject: Option<String>,
    },

    /// Present / absent totals for a person
    Stats {
        /// Person (driver) ID; omit with --remote for all people
        person: Option<String>,

        /// Only events for this subject (route)
        #[arg(long, alias = "route")]
        subject: Option<String>,

        /// Ask the service for its aggregate instead of tallying history
        #[arg(long)]
        remote: bool,
    },

    /// Events recorded for one subject (route)
    Subject {
        /// Subject ID
        id: String,
    },

    /// Events recorded on one day
    On {
        /// Date, YYYY-MM-DD
        date: String,
    },

    /// Remove an event
    #[command(alias = "rm")]
    Remove {
        /// Event ID
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  STORE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct StoreArgs {
    #[command(subcommand)]
    pub command: StoreCommand,
}

#[derive(Debug, Subcommand)]
pub enum StoreCommand {
    /// Show the store location, session state, and stored collection sizes
    Info,

    /// Replace a fallback collection with the records in a JSON array file
    Seed {
        /// Which collection to replace
        #[arg(value_enum)]
        collection: Collection,

        /// JSON file holding an array of records
        #[arg(long, short = 'f')]
        file: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Collection {
    #[value(alias = "drivers")]
    People,
    #[value(alias = "routes")]
    Subjects,
    #[value(alias = "telemetry")]
    Events,
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
    /// Create or replace a profile
    Init {
        /// Service base URL
        #[arg(long)]
        base_url: String,

        /// Profile name
        #[arg(long, default_value = "default")]
        name: String,

        /// Store directory for this profile
        #[arg(long)]
        store_dir: Option<PathBuf>,

        /// Make this the default profile
        #[arg(long)]
        make_default: bool,
    },

    /// Show the effective configuration
    Show,

    /// Print the config file path
    Path,

    /// List profile names
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name
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
