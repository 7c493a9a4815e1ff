use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::cli::args::GenerateCliArgs;
use crate::completion::OpenAiBackend;
use crate::config::Config;
use crate::minutes::{MinutesSynthesizer, SynthesisOptions};
use crate::vtt;

/// Parse the caption file, synthesize minutes, print them as JSON.
pub async fn handle_generate_command(args: GenerateCliArgs) -> Result<()> {
    let config = Config::load()?;

    let (transcript, speakers) = vtt::parse_vtt_file(&args.file)?;
    info!(
        "Parsed {} with {} speakers ({} chars of transcript)",
        args.file.display(),
        speakers.len(),
        transcript.len()
    );

    let mut options = SynthesisOptions::from_config(&config);
    if let Some(model) = args.model {
        options.model = model;
    }

    let backend = OpenAiBackend::new(
        config.openai.resolve_api_key(),
        config.openai.api_endpoint.clone(),
    );
    let synthesizer = MinutesSynthesizer::new(Arc::new(backend), options);

    let record = synthesizer
        .synthesize(&transcript, &speakers, args.duration_seconds)
        .await;

    let output = if args.pretty {
        serde_json::to_string_pretty(&record)
    } else {
        serde_json::to_string(&record)
    }
    .context("Failed to serialize minutes record")?;

    println!("{output}");
    Ok(())
}
