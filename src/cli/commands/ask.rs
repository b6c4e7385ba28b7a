//! Ask command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::{ChatModel, Settings};
use crate::error::VidtalkError;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the ask command: load one video and answer one question.
pub async fn run_ask(
    url: &str,
    question: &str,
    model: Option<String>,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Chat, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'vidtalk doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let mut orchestrator = Orchestrator::new(&settings)?;
    if let Some(name) = model {
        let model: ChatModel = name.parse().map_err(|e: String| VidtalkError::InvalidInput(e))?;
        orchestrator.set_model(model);
    }

    let spinner = Output::spinner("Extracting content...");
    let loaded = orchestrator.load(url).await;
    spinner.finish_and_clear();

    if let Err(e) = loaded {
        Output::failure(&e);
        return Err(e.into());
    }

    let spinner = Output::spinner("Thinking...");
    let answered = orchestrator.ask(question).await.map(|turn| turn.answer().to_string());
    spinner.finish_and_clear();

    match answered {
        Ok(answer) => {
            println!("\n{}\n", answer);
            Ok(())
        }
        Err(e) => {
            Output::failure(&e);
            Err(e.into())
        }
    }
}
