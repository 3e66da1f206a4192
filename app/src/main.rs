#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

mod command;

use clap::{Parser, Subcommand};
use command::{
    AppointmentsStrategy, BookInput, BookStrategy, CancelStrategy, CheckStrategy,
    CommandStrategy, DoctorsStrategy, HistoryInput, HistoryStrategy, InfoStrategy,
    InitStrategy, LoginInput, LoginStrategy, LogoutStrategy, RegisterInput, RegisterStrategy,
    SymptomsStrategy, VersionStrategy,
};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "symcheck")]
#[command(about = "Symptom checker with remedies, doctors and appointments", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration
    Init,
    /// Show configuration and store status
    Info,
    /// Show version
    Version,
    /// Create an account
    Register {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        email: Option<String>,

        /// Prompted for when omitted
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Log in and remember the session
    Login {
        #[arg(short, long)]
        username: String,

        /// Prompted for when omitted
        #[arg(short, long)]
        password: Option<String>,
    },
    /// End the current session
    Logout,
    /// List the symptoms known to the dataset
    Symptoms {
        /// Only show symptoms containing this text
        #[arg(short, long)]
        filter: Option<String>,
    },
    /// Match a comma separated symptom list
    Check {
        /// e.g. "fever, cough, headache"
        query: String,
    },
    /// Browse or edit your search history
    History {
        #[arg(short, long, default_value_t = 1)]
        page: u64,

        /// Delete one record
        #[arg(long, conflicts_with = "clear")]
        delete: Option<Uuid>,

        /// Delete every record
        #[arg(long)]
        clear: bool,
    },
    /// List doctors
    Doctors {
        #[arg(short, long)]
        specialty: Option<String>,
    },
    /// Book an appointment
    Book {
        #[arg(short, long)]
        doctor: i32,

        /// Local time, "YYYY-MM-DD HH:MM"
        #[arg(short, long)]
        at: String,

        #[arg(short, long)]
        reason: Option<String>,
    },
    /// List your appointments
    Appointments,
    /// Cancel an appointment
    Cancel { id: Uuid },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{default_level},sqlx=warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Init => InitStrategy.execute(()).await,
        Commands::Info => InfoStrategy.execute(()).await,
        Commands::Version => VersionStrategy.execute(()).await,
        Commands::Register {
            username,
            email,
            password,
        } => {
            RegisterStrategy
                .execute(RegisterInput {
                    username,
                    email,
                    password,
                })
                .await
        }
        Commands::Login { username, password } => {
            LoginStrategy
                .execute(LoginInput { username, password })
                .await
        }
        Commands::Logout => LogoutStrategy.execute(()).await,
        Commands::Symptoms { filter } => SymptomsStrategy.execute(filter).await,
        Commands::Check { query } => CheckStrategy.execute(query).await,
        Commands::History {
            page,
            delete,
            clear,
        } => {
            HistoryStrategy
                .execute(HistoryInput {
                    page,
                    delete,
                    clear,
                })
                .await
        }
        Commands::Doctors { specialty } => DoctorsStrategy.execute(specialty).await,
        Commands::Book { doctor, at, reason } => {
            BookStrategy
                .execute(BookInput {
                    doctor_id: doctor,
                    at,
                    reason,
                })
                .await
        }
        Commands::Appointments => AppointmentsStrategy.execute(()).await,
        Commands::Cancel { id } => CancelStrategy.execute(id).await,
    }
}
