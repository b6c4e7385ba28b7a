//! Interactive chat session.
//!
//! Reads one line at a time, runs the matching action to completion and
//! re-renders what changed.

use crate::cli::output::content_preview;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::{ChatModel, Settings};
use crate::error::VidtalkError;
use crate::orchestrator::Orchestrator;
use crate::session::SessionState;
use anyhow::Result;
use console::style;
use std::io::{self, BufRead, Write};

/// Fixed suggestion shortcuts: (label, question sent to the model).
pub const SUGGESTED_QUESTIONS: [(&str, &str); 3] = [
    (
        "Explain the content in simple terms",
        "Explain the content in this video in simple terms",
    ),
    ("Give me a summary", "Give me a summary"),
    ("Give me real-life examples", "Give me real-life examples"),
];

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Load(String),
    Ask(String),
    /// List suggestions, or ask the n-th one (1-based).
    Suggest(Option<usize>),
    Transcript,
    History,
    Model(Option<String>),
    Reset,
    Refresh,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

/// Parse a line of user input.
pub fn parse_command(line: &str) -> ChatCommand {
    let line = line.trim();

    if line.is_empty() {
        return ChatCommand::Empty;
    }
    if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
        return ChatCommand::Quit;
    }

    let Some(command) = line.strip_prefix('/') else {
        return ChatCommand::Ask(line.to_string());
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, Some(arg.trim()).filter(|a| !a.is_empty())),
        None => (command, None),
    };

    match name.to_lowercase().as_str() {
        "load" => match arg {
            Some(url) => ChatCommand::Load(url.to_string()),
            None => ChatCommand::Unknown("/load needs a URL".to_string()),
        },
        "suggest" | "s" => match arg.map(str::parse::<usize>) {
            None => ChatCommand::Suggest(None),
            Some(Ok(n)) if (1..=SUGGESTED_QUESTIONS.len()).contains(&n) => {
                ChatCommand::Suggest(Some(n))
            }
            Some(_) => ChatCommand::Unknown(format!(
                "/suggest takes a number from 1 to {}",
                SUGGESTED_QUESTIONS.len()
            )),
        },
        "transcript" => ChatCommand::Transcript,
        "history" => ChatCommand::History,
        "model" => ChatCommand::Model(arg.map(str::to_string)),
        "reset" | "clear" => ChatCommand::Reset,
        "refresh" => ChatCommand::Refresh,
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" => ChatCommand::Quit,
        other => ChatCommand::Unknown(format!("Unknown command: /{}", other)),
    }
}

/// Run the interactive chat command.
pub async fn run_chat(
    url: Option<String>,
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

    println!("\n{}", style("vidtalk").bold().cyan());
    println!(
        "{}\n",
        style("Paste a video URL with /load <url>, then ask anything. /help lists commands.").dim()
    );

    if let Some(url) = url {
        load(&mut orchestrator, &url).await;
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("You:").green().bold());
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            println!();
            break;
        }

        match parse_command(&input) {
            ChatCommand::Empty => continue,
            ChatCommand::Quit => {
                Output::info("Goodbye!");
                break;
            }
            ChatCommand::Load(url) => load(&mut orchestrator, &url).await,
            ChatCommand::Ask(question) => ask(&mut orchestrator, &question).await,
            ChatCommand::Suggest(None) => render_suggestions(),
            ChatCommand::Suggest(Some(n)) => {
                let (_, question) = SUGGESTED_QUESTIONS[n - 1];
                Output::user_message(question);
                ask(&mut orchestrator, question).await;
            }
            ChatCommand::Transcript => render_transcript(orchestrator.session()),
            ChatCommand::History => render_history(orchestrator.session()),
            ChatCommand::Model(None) => render_models(orchestrator.session().model()),
            ChatCommand::Model(Some(name)) => match name.parse::<ChatModel>() {
                Ok(model) => {
                    orchestrator.set_model(model);
                    Output::success(&format!("Using {}", model));
                }
                Err(e) => Output::error(&e),
            },
            ChatCommand::Reset => {
                orchestrator.reset();
                Output::info("Conversation history cleared.");
            }
            ChatCommand::Refresh => {
                let spinner = Output::spinner("Extracting content...");
                let result = orchestrator.reload().await;
                spinner.finish_and_clear();
                match result {
                    Ok(origin) => render_loaded(orchestrator.session(), &origin.to_string()),
                    Err(e) => Output::failure(&e),
                }
            }
            ChatCommand::Help => render_help(),
            ChatCommand::Unknown(msg) => Output::warning(&msg),
        }
    }

    Ok(())
}

async fn load(orchestrator: &mut Orchestrator, url: &str) {
    let spinner = Output::spinner("Extracting content...");
    let result = orchestrator.load(url).await;
    spinner.finish_and_clear();

    match result {
        Ok(origin) => render_loaded(orchestrator.session(), &origin.to_string()),
        Err(e) => Output::failure(&e),
    }
}

async fn ask(orchestrator: &mut Orchestrator, question: &str) {
    if !orchestrator.session().has_content() {
        Output::warning("No video loaded; the answer won't be based on any video.");
    }

    let spinner = Output::spinner("Thinking...");
    let result = orchestrator.ask(question).await;
    spinner.finish_and_clear();

    match result {
        Ok(turn) => Output::assistant_message(turn.answer()),
        Err(e) => Output::failure(&e),
    }
}

fn render_loaded(session: &SessionState, origin: &str) {
    Output::success("Video content loaded successfully!");
    if let Some(reference) = session.reference() {
        Output::kv("Video", reference);
    }
    Output::kv("Source", origin);
    Output::kv("Words", &session.content().word_count().to_string());
    Output::kv("Preview", &content_preview(session.content().as_str(), 160));
    println!();
    render_suggestions();
}

fn render_transcript(session: &SessionState) {
    if !session.has_content() {
        Output::info("No video loaded yet.");
        return;
    }
    Output::header("Video Transcript");
    println!("{}\n", session.content());
}

fn render_history(session: &SessionState) {
    let history = session.history();
    if history.is_empty() {
        Output::info("No questions asked yet.");
        return;
    }

    Output::header("Chat with your video");
    for turn in history {
        println!(
            "\n{} {} {}",
            style(turn.asked_at().format("%H:%M").to_string()).dim(),
            style("You:").green().bold(),
            turn.question()
        );
        Output::assistant_message(turn.answer());
    }
}

fn render_suggestions() {
    println!("{}", style("Suggested questions").bold());
    for (i, (label, _)) in SUGGESTED_QUESTIONS.iter().enumerate() {
        Output::list_item(&format!("/suggest {}  {}", i + 1, label));
    }
    println!();
}

fn render_models(current: ChatModel) {
    for model in ChatModel::ALL {
        let marker = if model == current { "*" } else { " " };
        println!("  {} {}", style(marker).cyan(), model);
    }
}

fn render_help() {
    Output::header("Commands");
    Output::kv("/load <url>", "extract a video's content");
    Output::kv("<question>", "ask about the loaded video");
    Output::kv("/suggest [n]", "list or ask a suggested question");
    Output::kv("/transcript", "show the extracted content");
    Output::kv("/history", "show the conversation");
    Output::kv("/model [name]", "show or switch the chat model");
    Output::kv("/reset", "clear the conversation");
    Output::kv("/refresh", "re-extract the current video");
    Output::kv("exit", "quit");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_a_question() {
        assert_eq!(
            parse_command("  What is X? \n"),
            ChatCommand::Ask("What is X?".to_string())
        );
        assert_eq!(parse_command("   "), ChatCommand::Empty);
        assert_eq!(parse_command("EXIT"), ChatCommand::Quit);
    }

    #[test]
    fn test_load_command() {
        assert_eq!(
            parse_command("/load https://www.youtube.com/watch?v=abc"),
            ChatCommand::Load("https://www.youtube.com/watch?v=abc".to_string())
        );
        assert!(matches!(parse_command("/load"), ChatCommand::Unknown(_)));
    }

    #[test]
    fn test_suggest_command() {
        assert_eq!(parse_command("/suggest"), ChatCommand::Suggest(None));
        assert_eq!(parse_command("/suggest 2"), ChatCommand::Suggest(Some(2)));
        assert_eq!(parse_command("/s 3"), ChatCommand::Suggest(Some(3)));
        assert!(matches!(parse_command("/suggest 0"), ChatCommand::Unknown(_)));
        assert!(matches!(parse_command("/suggest 4"), ChatCommand::Unknown(_)));
        assert!(matches!(parse_command("/suggest two"), ChatCommand::Unknown(_)));
    }

    #[test]
    fn test_other_commands() {
        assert_eq!(parse_command("/reset"), ChatCommand::Reset);
        assert_eq!(parse_command("/clear"), ChatCommand::Reset);
        assert_eq!(parse_command("/Transcript"), ChatCommand::Transcript);
        assert_eq!(parse_command("/history"), ChatCommand::History);
        assert_eq!(parse_command("/refresh"), ChatCommand::Refresh);
        assert_eq!(parse_command("/model"), ChatCommand::Model(None));
        assert_eq!(
            parse_command("/model gpt-4o-mini"),
            ChatCommand::Model(Some("gpt-4o-mini".to_string()))
        );
        assert!(matches!(parse_command("/bogus"), ChatCommand::Unknown(_)));
    }

    #[test]
    fn test_suggestions_are_fixed() {
        assert_eq!(SUGGESTED_QUESTIONS[1].1, "Give me a summary");
        assert_eq!(
            SUGGESTED_QUESTIONS[0].1,
            "Explain the content in this video in simple terms"
        );
    }
}
