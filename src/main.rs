//! MindMesh command-line front end.
//!
//! Usage:
//!   mindmesh session --background "..." --concerns "..." --goals "..." --sleep poor
//!   mindmesh session --profile profile.json --json
//!   mindmesh journal add "Today felt heavy"
//!   mindmesh journal list --limit 5
//!   mindmesh breathe box --live
//!   mindmesh relax --feeling "restless"
//!   mindmesh recommend --personal
//!   mindmesh safety --message "I can't switch off"

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use mindmesh::clients::{CompletionClient, OpenAiClient};
use mindmesh::config::{Config, FollowUpMode, load_dotenv, log_filter_from};
use mindmesh::journal::JournalStore;
use mindmesh::orchestrator::SessionOrchestrator;
use mindmesh::profile::{PhysicalActivity, SleepQuality, SocialSupport, UserProfile};
use mindmesh::prompts::AgentRole;
use mindmesh::tools::relaxation::{
    BREATHING_PATTERNS, BreathingPattern, DEFAULT_CYCLES, RELAXATION_EXERCISES, RelaxationExercise,
};
use mindmesh::tools::{journal, recommendations, relaxation, safety};

#[derive(Parser)]
#[command(name = "mindmesh")]
#[command(about = "MindMesh: AI mental-wellbeing assistant", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an assessment, a 4-week action plan and a 7-day follow-up
    Session(SessionArgs),
    /// Safe-space journal with AI reflections
    Journal {
        #[command(subcommand)]
        action: JournalCommand,
    },
    /// Guided breathing; lists the patterns when none is given
    Breathe {
        technique: Option<String>,
        #[arg(long, default_value_t = DEFAULT_CYCLES)]
        cycles: usize,
        /// Pace the phases in real time
        #[arg(long)]
        live: bool,
    },
    /// Mind-relaxation exercises, or an AI suggestion for how you feel
    Relax {
        exercise: Option<String>,
        #[arg(long)]
        feeling: Option<String>,
    },
    /// Wellbeing recommendations
    Recommend {
        /// Add one personalised AI suggestion
        #[arg(long)]
        personal: bool,
    },
    /// Crisis resources and grounding support
    Safety {
        /// Get a supportive AI reply to what you write
        #[arg(long)]
        message: Option<String>,
    },
}

#[derive(Subcommand)]
enum JournalCommand {
    /// Save an entry and print the AI reflection
    Add { text: String },
    /// Show past entries, newest first
    List {
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[derive(Args)]
struct SessionArgs {
    /// JSON file with the full profile; overrides the individual flags
    #[arg(long)]
    profile: Option<PathBuf>,
    #[arg(long, default_value = "")]
    background: String,
    #[arg(long, default_value = "")]
    concerns: String,
    #[arg(long, default_value = "")]
    goals: String,
    /// e.g. exercise, talking to friends, avoidance
    #[arg(long, default_value = "")]
    coping: String,
    #[arg(long, default_value = "Good")]
    sleep: SleepQuality,
    #[arg(long, default_value = "Daily")]
    activity: PhysicalActivity,
    #[arg(long, default_value = "Strong")]
    support: SocialSupport,
    /// Let the follow-up wait for and build on the action plan
    #[arg(long)]
    chained: bool,
    /// Print the full session record as JSON
    #[arg(long)]
    json: bool,
}

impl SessionArgs {
    fn into_profile(self) -> Result<UserProfile> {
        if let Some(path) = self.profile {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read profile {}", path.display()))?;
            return serde_json::from_str(&content)
                .with_context(|| format!("Invalid profile JSON in {}", path.display()));
        }
        Ok(UserProfile {
            background: self.background,
            concerns: self.concerns,
            goals: self.goals,
            coping_mechanisms: self.coping,
            sleep_quality: self.sleep,
            physical_activity: self.activity,
            social_support: self.support,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config loading logs its own warnings; the subscriber must exist first.
    load_dotenv();
    let filter = log_filter_from(&|key: &str| std::env::var(key).ok());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load().context("Failed to load configuration")?;

    let client: Arc<dyn CompletionClient> = Arc::new(OpenAiClient::new(
        config.runtime.openai_api_key.clone(),
        &config.completion,
    )?);

    match cli.command {
        Commands::Session(args) => run_session(&config, client, args).await,
        Commands::Journal { action } => run_journal(&config, client.as_ref(), action).await,
        Commands::Breathe {
            technique,
            cycles,
            live,
        } => breathe(technique.as_deref(), cycles, live).await,
        Commands::Relax { exercise, feeling } => {
            relax(client.as_ref(), exercise.as_deref(), feeling.as_deref()).await
        }
        Commands::Recommend { personal } => recommend(client.as_ref(), personal).await,
        Commands::Safety { message } => show_safety(client.as_ref(), message.as_deref()).await,
    }
}

async fn run_session(
    config: &Config,
    client: Arc<dyn CompletionClient>,
    args: SessionArgs,
) -> Result<()> {
    let as_json = args.json;
    let mut session_config = config.session.clone();
    if args.chained {
        session_config.follow_up_mode = FollowUpMode::Chained;
    }

    let profile = args.into_profile()?;
    let missing = profile.missing_required_fields();
    if !missing.is_empty() {
        bail!("Please fill all fields (missing: {})", missing.join(", "));
    }

    let orchestrator = SessionOrchestrator::new(client, session_config);
    let results = orchestrator.run_session(&profile).await;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    for role in AgentRole::ALL {
        println!("### {}", role.title());
        println!("{}\n", results.text(role).unwrap_or_default());
    }
    Ok(())
}

async fn run_journal(
    config: &Config,
    client: &dyn CompletionClient,
    action: JournalCommand,
) -> Result<()> {
    let store = JournalStore::new(&config.journal.data_dir, &config.journal.file_name);

    match action {
        JournalCommand::Add { text } => {
            let entry = journal::write_entry(client, &store, None, &text).await?;
            println!("Saved.\n\n{}", entry.ai_reflection);
        }
        JournalCommand::List { limit } => {
            let entries = store.recent(limit.unwrap_or(config.journal.recent_limit));
            if entries.is_empty() {
                println!("No journal entries yet.");
            }
            for entry in entries {
                println!("{}", entry.timestamp);
                println!("{}", entry.text);
                if let Some(sentiment) = entry.sentiment {
                    println!("Sentiment: {}", sentiment);
                }
                if !entry.ai_reflection.is_empty() {
                    println!("AI Reflection: {}", entry.ai_reflection);
                }
                println!();
            }
        }
    }
    Ok(())
}

async fn breathe(technique: Option<&str>, cycles: usize, live: bool) -> Result<()> {
    let Some(query) = technique else {
        println!("Breathing techniques:");
        for pattern in BREATHING_PATTERNS.iter() {
            println!("  {:<11} {}", pattern.slug, pattern.name);
        }
        return Ok(());
    };

    let pattern = BreathingPattern::find(query)
        .with_context(|| format!("Unknown breathing technique '{}'", query))?;

    println!("{} ({} cycles)", pattern.name, cycles);
    info!(
        "Breathing session: {} for {:?}",
        pattern.slug,
        pattern.total_duration(cycles)
    );
    for phase in pattern.phases(cycles) {
        println!("{}", phase);
        if live {
            tokio::time::sleep(phase.duration()).await;
        }
    }
    println!("Complete. Notice how your body feels now.");
    Ok(())
}

async fn relax(
    client: &dyn CompletionClient,
    exercise: Option<&str>,
    feeling: Option<&str>,
) -> Result<()> {
    if let Some(feeling) = feeling
        && let Some(suggestion) = relaxation::suggest_technique(client, feeling).await
    {
        println!("{}\n", suggestion);
    }

    match exercise {
        Some(query) => {
            let exercise = RelaxationExercise::find(query)
                .with_context(|| format!("Unknown exercise '{}'", query))?;
            print!("{}", exercise);
        }
        None if feeling.is_none() => {
            println!("Mind-relaxation exercises:");
            for exercise in RELAXATION_EXERCISES.iter() {
                println!("  {:<14} {}", exercise.slug, exercise.title);
            }
        }
        None => {}
    }
    Ok(())
}

async fn recommend(client: &dyn CompletionClient, personal: bool) -> Result<()> {
    println!("{}\n", recommendations::SNAPSHOT);
    for section in recommendations::SECTIONS.iter() {
        println!("{}", section.title);
        for item in section.items {
            println!("  - {}", item);
        }
        println!();
    }
    if personal {
        println!("{}", recommendations::daily_suggestion(client).await);
    }
    Ok(())
}

async fn show_safety(client: &dyn CompletionClient, message: Option<&str>) -> Result<()> {
    println!("{}\n", safety::DISCLAIMER);

    println!("Emergency & Crisis Support");
    for contact in safety::CRISIS_CONTACTS.iter() {
        println!("  {}: {}", contact.label, contact.detail);
        println!("    {}", contact.caption);
    }

    println!("\nWhen to Seek Extra Support");
    for sign in safety::WARNING_SIGNS.iter() {
        println!("  - {}", sign);
    }
    println!("\n{}\n", safety::ENCOURAGEMENT);

    println!("Grounding Resources");
    for resource in safety::GROUNDING_RESOURCES.iter() {
        println!("  - {}", resource);
    }

    if let Some(text) = message
        && let Some(reply) = safety::supportive_message(client, text).await
    {
        println!("\n{}", reply);
    }
    Ok(())
}
