use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use sme_health_core::{
    compose, render_view, session::upload, AnalysisSession, BackendApi, BackendSettings, HttpBackend, Locale,
    OutputFormat, ReportPolicy, UploadCoordinator, UploadOutcome,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "sme-health",
    author,
    version,
    about = "SME Financial Health Platform client"
)]
struct Cli {
    /// Optional TOML config file (keys base_url, timeout_secs, report_all_locales)
    #[arg(long = "config", value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Backend base URL, overriding config file and environment
    #[arg(long = "backend-url", value_name = "URL", global = true)]
    backend_url: Option<String>,

    /// Interface language: en, hi or ta (unknown codes fall back to en)
    #[arg(
        long = "language",
        value_name = "CODE",
        default_value = "en",
        global = true
    )]
    language: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Upload a financial document (.csv/.xlsx advised)
    Upload {
        file: PathBuf,
        /// Fetch the analysis right after the upload completes
        #[arg(long)]
        analyze: bool,
    },
    /// Fetch and display the financial-health assessment
    Analyze {
        /// Company to analyze
        #[arg(long = "company", value_name = "ID", default_value_t = 1)]
        company: i64,
        /// Emit the view as JSON instead of human-readable text
        #[arg(long)]
        json: bool,
    },
    /// Download the rendered report document for a company
    Report {
        #[arg(long = "company", value_name = "ID", default_value_t = 1)]
        company: i64,
        /// Output path (default financial_report_<ID>.pdf)
        #[arg(long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Wipe all backend data (asks for confirmation)
    Reset {
        /// Skip the interactive confirmation
        #[arg(long)]
        yes: bool,
    },
    /// Print the UI string table for the selected language
    Strings {
        /// Emit the table as JSON instead of an aligned listing
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let locale = Locale::parse(&cli.language);
    let settings = load_settings(&cli)?;
    match cli.command {
        Commands::Upload { ref file, analyze } => {
            run_upload(&settings, locale, file, analyze).await?
        }
        Commands::Analyze { company, json } => {
            run_analyze(&settings, locale, company, json).await?
        }
        Commands::Report { company, ref out } => {
            run_report(&settings, locale, company, out.as_deref()).await?
        }
        Commands::Reset { yes } => run_reset(&settings, yes).await?,
        Commands::Strings { json } => run_strings(locale, json)?,
    }
    Ok(())
}

/// Settings come from the environment, overridden by the config file when
/// one is given, overridden in turn by explicit flags.
fn load_settings(cli: &Cli) -> Result<BackendSettings> {
    let mut settings = match &cli.config {
        Some(path) => {
            let raw = config::Config::builder()
                .add_source(config::Environment::with_prefix("SME_HEALTH").try_parsing(true))
                .add_source(config::File::from(path.clone()))
                .build()
                .with_context(|| format!("failed to load config from {}", path.display()))?;
            raw.try_deserialize::<BackendSettings>()
                .with_context(|| format!("invalid config file {}", path.display()))?
        }
        None => BackendSettings::from_env(),
    };
    if let Some(url) = &cli.backend_url {
        settings.base_url = url.clone();
    }
    Ok(settings)
}

async fn run_upload(
    settings: &BackendSettings,
    locale: Locale,
    file: &Path,
    auto_analyze: bool,
) -> Result<()> {
    let table = locale.resolve();
    let api = HttpBackend::new(settings)?;
    let policy = ReportPolicy::from_settings(settings);

    if !upload::has_advisory_extension(file) {
        println!("note: expected a .csv or .xlsx document; uploading anyway");
    }

    let mut coordinator = UploadCoordinator::new();
    coordinator.select_file(file);
    let outcome = coordinator.submit(&api, table).await?;
    if let Some(status) = coordinator.status() {
        println!("{status}");
    }
    let Some(outcome) = outcome else {
        bail!("upload did not complete; see status above");
    };

    let mut session = AnalysisSession::with_locale(locale);
    session.apply_upload(outcome.result());

    match outcome {
        UploadOutcome::AutoLoaded(_) => {
            // Short-circuit: the assessment arrived with the upload response.
            let view = compose(&session, table, &policy);
            print!("{}", render_view(&view, OutputFormat::Human)?);
        }
        UploadOutcome::Fresh(_) | UploadOutcome::DuplicateAwaitingAnalysis(_) => {
            if auto_analyze {
                session.fetch_analysis(&api).await;
                let view = compose(&session, table, &policy);
                print!("{}", render_view(&view, OutputFormat::Human)?);
            } else {
                println!(
                    "Run `sme-health analyze --company {}` to load the assessment.",
                    session.company_id()
                );
            }
        }
    }
    Ok(())
}

async fn run_analyze(
    settings: &BackendSettings,
    locale: Locale,
    company: i64,
    json: bool,
) -> Result<()> {
    let table = locale.resolve();
    let api = HttpBackend::new(settings)?;
    let policy = ReportPolicy::from_settings(settings);

    let mut session = AnalysisSession::with_locale(locale);
    session.set_company_id(company);
    session.fetch_analysis(&api).await;

    let format = if json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };
    let view = compose(&session, table, &policy);
    print!("{}", render_view(&view, format)?);
    if json {
        println!();
    }
    Ok(())
}

async fn run_report(
    settings: &BackendSettings,
    locale: Locale,
    company: i64,
    out: Option<&Path>,
) -> Result<()> {
    let policy = ReportPolicy::from_settings(settings);
    if !policy.allows(locale) {
        bail!(
            "report downloads are available in English only; set SME_HEALTH_REPORT_ALL_LOCALES=true to widen the offer"
        );
    }

    let api = HttpBackend::new(settings)?;
    let bytes = sme_health_core::request_report(&api, company)
        .await
        .with_context(|| format!("could not download the report for company {company}"))?;

    let default_path = PathBuf::from(format!("financial_report_{company}.pdf"));
    let path = out.unwrap_or(&default_path);
    tokio::fs::write(path, &bytes)
        .await
        .with_context(|| format!("failed to write report to {}", path.display()))?;
    println!("Report saved to {} ({} bytes).", path.display(), bytes.len());
    Ok(())
}

async fn run_reset(settings: &BackendSettings, yes: bool) -> Result<()> {
    if !yes && !confirm_reset()? {
        println!("Reset aborted; no data was touched.");
        return Ok(());
    }

    let api = HttpBackend::new(settings)?;
    api.reset_db().await.context("backend reset failed")?;
    println!(
        "All backend data wiped. Sessions start over at company {}.",
        sme_health_core::DEFAULT_COMPANY_ID
    );
    Ok(())
}

fn confirm_reset() -> Result<bool> {
    print!("This wipes ALL uploaded documents and assessments. Type 'yes' to continue: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().eq_ignore_ascii_case("yes"))
}

fn run_strings(locale: Locale, json: bool) -> Result<()> {
    let table = locale.resolve();
    if json {
        let map: serde_json::Map<String, serde_json::Value> = table
            .entries()
            .iter()
            .map(|(key, value)| ((*key).to_string(), serde_json::Value::from(*value)))
            .collect();
        println!("{}", serde_json::to_string_pretty(&map)?);
        return Ok(());
    }

    println!("{} string(s) for locale `{locale}`", table.entries().len());
    for (key, value) in table.entries() {
        println!("- {key:<22} {value}");
    }
    Ok(())
}

fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tokio=warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .try_init();
}
