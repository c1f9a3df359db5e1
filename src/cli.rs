use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "smartfood")]
#[command(about = "SmartFoodAI: food label analysis demo")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding the persisted state (overrides SMARTFOOD_DATA_DIR)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in. Any credentials are accepted.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and sign in
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign out and forget the session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Health profile
    Profile {
        #[command(subcommand)]
        action: ProfileCommands,
    },
    /// Analyze a food label image
    Analyze {
        /// Image file (jpg, png, webp, heic, gif)
        path: PathBuf,
        /// Simulated analysis time in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,
    },
    /// Past analyses, most recent first
    History {
        #[command(subcommand)]
        action: Option<HistoryCommands>,
    },
    /// Overview of the signed-in user's analyses
    Dashboard,
}

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Show the saved profile
    Show,
    /// Replace the saved profile
    Set {
        /// vegetarian, non-vegetarian or vegan
        #[arg(long)]
        diet: Option<String>,
        /// Allergy id, repeatable (e.g. nuts, milk, gluten)
        #[arg(long = "allergy")]
        allergies: Vec<String>,
        /// Condition id, repeatable (e.g. diabetes, hypertension)
        #[arg(long = "condition")]
        conditions: Vec<String>,
    },
    /// List the allergies, conditions and diets the form offers
    Options,
}

#[derive(Subcommand)]
pub enum HistoryCommands {
    /// List stored analyses
    List,
    /// Show one stored analysis
    Show { id: String },
}
