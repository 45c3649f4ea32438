//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use worksite_core::util::{parse_date, parse_month};
use worksite_lib::{ApiMode, ExportFormat, Location, ProjectStatus, Stage};

#[derive(Parser)]
#[command(name = "worksite")]
#[command(about = "Schedule and track installation jobs", long_about = None)]
pub(crate) struct Cli {
    /// Data source for this run (local, backend-test, backend-prod)
    #[arg(long, global = true)]
    pub mode: Option<ApiMode>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Editable project fields shared by `create` and `update`.
#[derive(Args, Clone, Default)]
pub(crate) struct ProjectFieldArgs {
    /// Project name
    #[arg(long)]
    pub name: Option<String>,

    /// Site address
    #[arg(long)]
    pub address: Option<String>,

    /// Client name
    #[arg(long)]
    pub client: Option<String>,

    /// Client phone number
    #[arg(long)]
    pub phone: Option<String>,

    /// Sales person responsible for the job
    #[arg(long)]
    pub sales: Option<String>,

    /// Lead installer
    #[arg(long)]
    pub installer: Option<String>,

    /// Other crew members
    #[arg(long)]
    pub team: Option<String>,

    /// First work day (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub start: Option<NaiveDate>,

    /// Last work day (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub end: Option<NaiveDate>,

    /// Status (not_started, in_progress, completed, final_payment_received)
    #[arg(long)]
    pub status: Option<ProjectStatus>,

    /// Today's task for the crew
    #[arg(long)]
    pub task: Option<String>,

    /// Progress note
    #[arg(long)]
    pub note: Option<String>,

    /// Work stages (e.g., install,glass)
    #[arg(long, value_delimiter = ',')]
    pub stages: Option<Vec<Stage>>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// List projects
    List {
        /// Search code, name, client and address
        #[arg(short, long)]
        q: Option<String>,

        /// Only projects with this status
        #[arg(long)]
        status: Option<ProjectStatus>,

        /// Only projects ending on or after this date
        #[arg(long, value_parser = parse_date)]
        start: Option<NaiveDate>,

        /// Only projects starting on or before this date
        #[arg(long, value_parser = parse_date)]
        end: Option<NaiveDate>,

        /// Include archived projects
        #[arg(long)]
        archived: bool,

        /// Page number, starting at 1
        #[arg(long)]
        page: Option<u32>,

        /// Projects per page
        #[arg(long)]
        page_size: Option<u32>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show one project
    Show {
        id: i64,

        /// Print JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Create a project
    Create {
        #[command(flatten)]
        fields: ProjectFieldArgs,
    },

    /// Change fields of a project
    Update {
        id: i64,

        #[command(flatten)]
        fields: ProjectFieldArgs,

        /// Note describing the change
        #[arg(long)]
        change_note: Option<String>,
    },

    /// Hide a project from default listings
    Archive { id: i64 },

    /// Restore an archived project
    Unarchive { id: i64 },

    /// Delete a project and its media
    Delete {
        id: i64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Manage project photos and videos
    Media {
        #[command(subcommand)]
        action: MediaAction,
    },

    /// Export the schedule as a spreadsheet or PDF
    Export {
        /// excel or pdf
        format: ExportFormat,

        /// Range start (defaults to the first of this month)
        #[arg(long, value_parser = parse_date)]
        start: Option<NaiveDate>,

        /// Range end (defaults to the last of this month)
        #[arg(long, value_parser = parse_date)]
        end: Option<NaiveDate>,

        /// Include archived projects
        #[arg(long)]
        archived: bool,

        /// Output file or directory (defaults to the current directory)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Show a month of jobs with the weather
    Calendar {
        /// Month to show (YYYY-MM, defaults to this month)
        #[arg(long, value_parser = parse_month)]
        month: Option<NaiveDate>,

        /// Weather location (auckland, wellington, christchurch)
        #[arg(long)]
        location: Option<Location>,

        /// Weather metrics to show (e.g., rain,temp,prob)
        #[arg(long)]
        weather: Option<String>,

        /// Skip the weather lookup
        #[arg(long)]
        no_weather: bool,
    },

    /// Fill the local store with demo projects
    Seed {
        /// Number of projects to top the store up to
        #[arg(long, default_value_t = 10)]
        count: usize,
    },

    /// Show or change the data source
    Mode {
        #[command(subcommand)]
        action: ModeAction,
    },

    /// Show settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Manage the local media cache
    MediaCache {
        #[command(subcommand)]
        action: MediaCacheAction,
    },

    /// Show counts for the local store
    Stats,
}

#[derive(Subcommand)]
pub(crate) enum MediaAction {
    /// List a project's media
    List { id: i64 },

    /// Upload files to a project
    Upload {
        id: i64,

        /// Files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Delete one media item
    Delete {
        id: i64,

        /// Media id
        media: String,
    },

    /// Delete every media item of a project
    Clear {
        id: i64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub(crate) enum ModeAction {
    /// Print the current mode and backend URL
    Show,

    /// Persist a new mode in the settings file
    Set { mode: ApiMode },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show effective settings and their file
    Show,

    /// Print the settings file path
    Path,
}

#[derive(Subcommand)]
pub(crate) enum MediaCacheAction {
    /// Resolve a media URL through the cache, downloading on a miss
    Fetch {
        /// Project id
        id: i64,

        /// Media URL as returned by the backend
        url: String,

        /// Access token for the media
        #[arg(long)]
        token: Option<String>,
    },

    /// Drop one cached file
    Remove {
        id: i64,

        url: String,

        #[arg(long)]
        token: String,
    },

    /// Remove every cached file
    Clear,
}
