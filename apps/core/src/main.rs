// Fitness Coach entry point
// Command-line form in front of the diet and gym plan models

use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::io;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use fitcoach_core::config::AppConfig;
use fitcoach_core::engine::{ModelKind, ModelLoader, Predictor, StrictMode};
use fitcoach_core::error::AppError;
use fitcoach_core::fs_manager::{DIET_MODEL_FILENAME, GYM_MODEL_FILENAME};
use fitcoach_core::interactive::PromptForm;
use fitcoach_core::models::{
    ActivityLevel, Allergy, Condition, Cuisine, DietaryRestriction, FitnessGoal, Gender, Severity,
    UserProfile,
};
use fitcoach_core::preflight::run_preflight_checks;
use fitcoach_core::recommender::{ModelSet, Recommender};
use fitcoach_core::report::Report;

#[derive(Parser)]
#[command(name = "fitcoach", version)]
#[command(about = "Fitness Coach: personalized workout and diet plans from your profile", long_about = None)]
struct Cli {
    /// Directory holding diet_model.pkl and gym_model.pkl (defaults to ./model next to the executable)
    #[arg(long, global = true, value_name = "DIR")]
    model_dir: Option<PathBuf>,

    /// Expected model columns left at their default: off, warn or fail
    #[arg(long, global = true, value_name = "MODE")]
    strict_features: Option<StrictMode>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Show input data, selections summary and error details
    #[arg(long, global = true, action = ArgAction::SetTrue)]
    debug: bool,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Get workout and diet recommendations (default)
    Recommend(RecommendArgs),
    /// Check model files and runtime environment
    Check,
    /// Show what a model expects and predicts
    Inspect {
        #[arg(value_enum)]
        model: ModelArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModelArg {
    Diet,
    Gym,
}

impl ModelArg {
    fn file(self) -> &'static str {
        match self {
            ModelArg::Diet => DIET_MODEL_FILENAME,
            ModelArg::Gym => GYM_MODEL_FILENAME,
        }
    }
}

#[derive(Args, Default)]
struct RecommendArgs {
    /// Prompt for each field on stdin
    #[arg(short, long, action = ArgAction::SetTrue)]
    interactive: bool,

    /// Age in years (10-100)
    #[arg(long)]
    age: Option<u32>,

    /// Weight in kg (30-200)
    #[arg(long)]
    weight: Option<f64>,

    #[arg(long, value_enum)]
    gender: Option<Gender>,

    /// Height in cm (100-250)
    #[arg(long)]
    height: Option<f64>,

    #[arg(long, value_enum)]
    goal: Option<FitnessGoal>,

    /// Medical conditions, comma separated
    #[arg(long = "condition", value_enum, value_delimiter = ',')]
    conditions: Vec<Condition>,

    #[arg(long, value_enum)]
    severity: Option<Severity>,

    #[arg(long, value_enum)]
    activity: Option<ActivityLevel>,

    /// Dietary restrictions, comma separated
    #[arg(long = "restriction", value_enum, value_delimiter = ',')]
    restrictions: Vec<DietaryRestriction>,

    /// Allergies, comma separated
    #[arg(long = "allergy", value_enum, value_delimiter = ',')]
    allergies: Vec<Allergy>,

    /// Preferred cuisines, comma separated
    #[arg(long = "cuisine", value_enum, value_delimiter = ',')]
    cuisines: Vec<Cuisine>,
}

impl RecommendArgs {
    /// Form defaults overlaid with whatever was passed on the command line.
    fn profile(&self) -> UserProfile {
        let mut profile = UserProfile::default();
        if let Some(age) = self.age {
            profile.age = age;
        }
        if let Some(weight) = self.weight {
            profile.weight_kg = weight;
        }
        if let Some(gender) = self.gender {
            profile.gender = gender;
        }
        if let Some(height) = self.height {
            profile.height_cm = height;
        }
        if let Some(goal) = self.goal {
            profile.fitness_goal = goal;
        }
        if let Some(severity) = self.severity {
            profile.severity = severity;
        }
        if let Some(activity) = self.activity {
            profile.activity_level = activity;
        }
        if !self.conditions.is_empty() {
            profile.conditions = self.conditions.clone();
        }
        if !self.restrictions.is_empty() {
            profile.dietary_restrictions = self.restrictions.clone();
        }
        if !self.allergies.is_empty() {
            profile.allergies = self.allergies.clone();
        }
        if !self.cuisines.is_empty() {
            profile.preferred_cuisine = self.cuisines.clone();
        }
        profile
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn print_report(report: &Report, format: OutputFormat, debug: bool) -> Result<(), AppError> {
    match format {
        OutputFormat::Text => print!("{}", report.render_text(debug)),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }
    Ok(())
}

fn run_recommend(
    args: &RecommendArgs,
    loader: &ModelLoader,
    config: &AppConfig,
    format: OutputFormat,
    debug: bool,
) -> anyhow::Result<()> {
    let recommender = Recommender::new(ModelSet::load(loader), Predictor::new(config.strict));
    let profile = args.profile();

    if !args.interactive {
        let report = recommender.submit(profile)?;
        print_report(&report, format, debug)?;
        return Ok(());
    }

    let stdin = io::stdin();
    let mut form = PromptForm::new(stdin.lock(), io::stdout());
    let mut defaults = profile;
    loop {
        let profile = form.fill(&defaults)?;
        match recommender.submit(profile.clone()) {
            Ok(report) => {
                print_report(&report, format, debug)?;
                defaults = profile;
            }
            // Rejected values are not offered again as defaults.
            Err(AppError::Validation(msg)) => println!("[error] {}", msg),
            Err(e) => return Err(e.into()),
        }
        if !form.confirm("Submit another profile?")? {
            break;
        }
    }
    Ok(())
}

fn run_check(loader: &ModelLoader, format: OutputFormat) -> anyhow::Result<()> {
    let report = run_preflight_checks(loader);
    match format {
        OutputFormat::Text => println!("{}", report.render_text()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

fn run_inspect(loader: &ModelLoader, model: ModelArg, format: OutputFormat) -> anyhow::Result<()> {
    let bundle = loader
        .load(model.file())
        .with_context(|| format!("Cannot inspect {}", model.file()))?;
    let kind: ModelKind = bundle.kind();

    match format {
        OutputFormat::Text => {
            println!("Model: {}", bundle.name());
            println!("Feature mapping: {}", kind);
            println!("Estimator: {}", bundle.estimator().describe());
            println!("Classes: {}", bundle.labels().classes().join(", "));
            println!("Feature columns ({}):", bundle.feature_columns().len());
            for column in bundle.feature_columns() {
                println!("  {}", column);
            }
        }
        OutputFormat::Json => {
            let value = serde_json::json!({
                "model": bundle.name(),
                "feature_mapping": kind,
                "estimator": bundle.estimator().describe(),
                "classes": bundle.labels().classes(),
                "feature_columns": bundle.feature_columns(),
                "rules": kind.rules(),
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    // Missing .env is fine
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = AppConfig::from_env()?.with_overrides(cli.model_dir.clone(), cli.strict_features);
    debug!("Configuration: {:?}", config);

    let loader = ModelLoader::new(&config.model_dir);

    match cli.command {
        Some(Command::Check) => run_check(&loader, cli.format),
        Some(Command::Inspect { model }) => run_inspect(&loader, model, cli.format),
        Some(Command::Recommend(ref args)) => {
            run_recommend(args, &loader, &config, cli.format, cli.debug)
        }
        None => run_recommend(&RecommendArgs::default(), &loader, &config, cli.format, cli.debug),
    }
}
