use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use jobli::config::Config;
use jobli::demo::seed_demo_data;
use jobli::media::InMemoryObjectStore;
use jobli::state::AppState;

/// Jobli - Match job seekers with employers
#[derive(Parser, Debug)]
#[command(name = "jobli")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Seed sample employers, jobs and seekers before running the command
    #[arg(long, global = true, env = "JOBLI_DEMO")]
    demo: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Read job seeker profiles
    #[command(subcommand)]
    Seeker(SeekerCommand),

    /// Read work experience of a job seeker
    #[command(subcommand)]
    Experience(ExperienceCommand),

    /// Read screening answers of job seekers
    #[command(subcommand)]
    Answers(AnswersCommand),

    /// Read employers
    #[command(subcommand)]
    Employer(EmployerCommand),

    /// Read posted jobs
    #[command(subcommand)]
    Jobs(JobsCommand),

    /// Rank jobs or job seekers by screening answers
    #[command(subcommand)]
    Match(MatchCommand),
}

#[derive(Debug, Subcommand)]
enum SeekerCommand {
    /// Show a job seeker profile
    Get { seeker_id: String },
}

#[derive(Debug, Subcommand)]
enum ExperienceCommand {
    /// List all experience entries of a job seeker
    List { seeker_id: String },
    /// Show a single experience entry
    Get { seeker_id: String, experience_id: Uuid },
}

#[derive(Debug, Subcommand)]
enum AnswersCommand {
    /// Show the answers of a job seeker
    Get { seeker_id: String },
    /// List the answers of every job seeker
    List,
}

#[derive(Debug, Subcommand)]
enum EmployerCommand {
    /// List employers
    List {
        /// Only employers with this exact business name
        #[arg(long)]
        name: Option<String>,
        /// Only employers located in this city
        #[arg(long)]
        city: Option<String>,
    },
    /// Show an employer
    Get { employer_id: Uuid },
}

#[derive(Debug, Subcommand)]
enum JobsCommand {
    /// List jobs, optionally of a single employer
    List {
        #[arg(long)]
        employer: Option<Uuid>,
    },
    /// Show a job
    Get { job_id: Uuid },
}

#[derive(Debug, Subcommand)]
enum MatchCommand {
    /// Jobs ranked for a job seeker
    Jobs {
        #[arg(long)]
        seeker: String,
        #[command(flatten)]
        limit: Limit,
    },
    /// Job seekers ranked for a job or an explicit answer vector
    Seekers {
        /// Ten comma separated answers, e.g. true,false,...
        #[arg(long, value_delimiter = ',', conflicts_with = "job")]
        answers: Vec<bool>,
        /// Job to match against; requires --employer
        #[arg(long, requires = "employer")]
        job: Option<Uuid>,
        /// Employer owning the job
        #[arg(long)]
        employer: Option<Uuid>,
        #[command(flatten)]
        limit: Limit,
    },
}

#[derive(Debug, Clone, Args)]
struct Limit {
    /// Maximum number of results (default: MATCH_MAX_RESULTS)
    #[arg(long)]
    max: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jobli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();
    let objects = Arc::new(InMemoryObjectStore::new(config.media_bucket_name.clone()));
    let state = AppState::build(config, objects).await;

    if cli.demo {
        seed_demo_data(&state).await?;
    }

    if let Err(err) = run(&state, cli.command).await {
        tracing::error!(error = %err, "Command failed");
        return Err(err);
    }
    Ok(())
}

async fn run(state: &AppState, command: Commands) -> Result<()> {
    match command {
        Commands::Seeker(SeekerCommand::Get { seeker_id }) => {
            print(&state.seekers.get(&seeker_id).await?)
        }
        Commands::Experience(ExperienceCommand::List { seeker_id }) => {
            print(&state.experience.get_all(&seeker_id).await?)
        }
        Commands::Experience(ExperienceCommand::Get {
            seeker_id,
            experience_id,
        }) => print(&state.experience.get(&seeker_id, experience_id).await?),
        Commands::Answers(AnswersCommand::Get { seeker_id }) => {
            print(&state.answers.get(&seeker_id).await?)
        }
        Commands::Answers(AnswersCommand::List) => print(&state.answers.list_all().await?),
        Commands::Employer(EmployerCommand::List { name, city }) => print(
            &state
                .employers
                .search(name.as_deref(), city.as_deref())
                .await?,
        ),
        Commands::Employer(EmployerCommand::Get { employer_id }) => {
            print(&state.employers.get(employer_id).await?)
        }
        Commands::Jobs(JobsCommand::List { employer: None }) => {
            print(&state.jobs.list_all().await?)
        }
        Commands::Jobs(JobsCommand::List {
            employer: Some(employer_id),
        }) => print(&state.jobs.list_by_employer(employer_id).await?),
        Commands::Jobs(JobsCommand::Get { job_id }) => print(&state.jobs.get(job_id).await?),
        Commands::Match(MatchCommand::Jobs { seeker, limit }) => {
            print(&state.matching.jobs_for_seeker(&seeker, limit.max).await?)
        }
        Commands::Match(MatchCommand::Seekers {
            answers,
            job,
            employer,
            limit,
        }) => match (job, employer) {
            (Some(job_id), Some(employer_id)) => print(
                &state
                    .matching
                    .seekers_for_job(employer_id, job_id, limit.max)
                    .await?,
            ),
            _ if answers.is_empty() => bail!("Either --answers or --job is required"),
            _ => {
                let query: Vec<Option<bool>> = answers.into_iter().map(Some).collect();
                print(&state.matching.seekers_for_answers(&query, limit.max).await?)
            }
        },
    }
}

fn print<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
