//! Fetch command: print the extracted content of a video.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the fetch command.
pub async fn run_fetch(url: &str, output: Option<String>, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Fetch, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'vidtalk doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let mut orchestrator = Orchestrator::new(&settings)?;

    let spinner = Output::spinner("Extracting content...");
    let result = orchestrator.load(url).await;
    spinner.finish_and_clear();

    let origin = match result {
        Ok(origin) => origin,
        Err(e) => {
            Output::failure(&e);
            return Err(e.into());
        }
    };

    let content = orchestrator.content();
    match output {
        Some(path) => {
            let path = Settings::expand_path(&path);
            std::fs::write(&path, content.as_str())?;
            Output::success(&format!(
                "Wrote {} words from {} to {}",
                content.word_count(),
                origin,
                path.display()
            ));
        }
        None => println!("{}", content),
    }

    Ok(())
}
