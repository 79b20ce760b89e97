use clap::Parser;
use quizmaster::core::config;
use quizmaster::tui;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "quizmaster", about = "AI-generated multiple choice quizzes in your terminal")]
struct Args {
    /// Start a quiz on this topic immediately, skipping the picker
    #[arg(short, long)]
    topic: Option<String>,

    /// Gemini model to try first, ahead of the configured fallback chain
    #[arg(short, long)]
    model: Option<String>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to quizmaster.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("quizmaster.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let loaded = match config::load_config() {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };
    let resolved = config::resolve(&loaded, args.model.as_deref());

    log::info!("Quizmaster starting up, model chain: {:?}", resolved.models);

    tui::run(resolved, args.topic)
}
