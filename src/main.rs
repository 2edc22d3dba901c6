use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use mathreel::batch;
use mathreel::config::Config;
use mathreel::generate::ReelRequest;
use mathreel::llm;
use mathreel::reel;
use mathreel::render::Renderer;
use mathreel::rlog;

/// Mathreel - generate and render vertical math animation reels
#[derive(Parser, Debug)]
#[command(name = "mathreel")]
#[command(version, about, long_about = None)]
#[command(
    after_help = "ENVIRONMENT:\n    GEMINI_API_KEY      API key for gemini-* models\n    OPENAI_API_KEY      API key for all other models\n    MATHREEL_DEBUG=1    Enable debug logging (alternative to --debug)"
)]
struct Cli {
    /// Enable debug logging (writes to ~/.mathreel/mathreel.log)
    #[arg(short = 'd', long)]
    debug: bool,

    /// Override the configured model
    #[arg(long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Generate and render a single reel
    Generate {
        /// Name of the math concept
        concept: String,

        /// What the animation should show
        description: String,

        /// Minimum length in seconds
        #[arg(long, default_value_t = 30)]
        length: u32,

        /// Output directory name (defaults to the normalized concept)
        #[arg(long)]
        output_name: Option<String>,

        /// Scene file whose visual style should be copied
        #[arg(long)]
        template: Option<PathBuf>,
    },

    /// Process a JSON batch file of reel requests
    Batch {
        /// Path to the JSON array of tasks
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    mathreel::log::init_with_debug(cli.debug);
    dotenvy::dotenv().ok();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            mathreel::log::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> mathreel::Result<()> {
    let mut config = Config::load()?;
    if let Some(model) = cli.model {
        config.model = Some(model);
    }
    config.ensure_dirs()?;

    // Fail fast, before any network call, when credentials or the render
    // engine are missing.
    let client = llm::client_for_model(config.effective_model())?;
    let renderer = Renderer::from_config(&config)?;
    rlog!(
        "startup: model={} renderer={}",
        config.effective_model(),
        renderer.binary().display()
    );

    match cli.command {
        Command::Generate {
            concept,
            description,
            length,
            output_name,
            template,
        } => {
            let request = ReelRequest {
                concept,
                description,
                length_secs: length,
                output_name,
                template,
            };
            let video = reel::create_reel(&config, client.as_ref(), &renderer, &request).await?;
            println!("{}", video.display());
            Ok(())
        }
        Command::Batch { file } => {
            let outcomes = batch::run_batch(&config, client.as_ref(), &renderer, &file).await?;
            for outcome in &outcomes {
                if !outcome.is_success() {
                    rlog!("unresolved task in ledger: {}", outcome.concept);
                }
            }
            Ok(())
        }
    }
}
