//! Doctor command - verify system requirements and configuration.

use crate::cli::Output;
use crate::config::Settings;
use console::style;
use std::path::Path;
use std::process::Command;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
///
/// Returns an error when any check failed so the process exits non-zero.
pub fn run_doctor(settings: &Settings, config_path: &Path) -> anyhow::Result<()> {
    Output::header("vidtalk doctor");
    println!();

    let mut checks = Vec::new();

    println!("{}", style("External Tools").bold());
    let tools = [
        check_tool("yt-dlp", "--version", install_hint_ytdlp()),
        check_tool("ffmpeg", "-version", install_hint_ffmpeg()),
        check_tool("ffprobe", "-version", install_hint_ffmpeg()),
    ];
    for check in tools {
        check.print();
        checks.push(check);
    }
    println!();

    println!("{}", style("API Configuration").bold());
    let api_check = check_api_key(settings.api_key().as_deref());
    api_check.print();
    checks.push(api_check);
    println!();

    println!("{}", style("Scratch Space").bold());
    let dir_check = check_scratch_dir(settings);
    dir_check.print();
    checks.push(dir_check);
    println!();

    println!("{}", style("Configuration").bold());
    let config_check = check_config_file(config_path);
    config_check.print();
    checks.push(config_check);
    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using vidtalk.",
            errors
        ));
        anyhow::bail!("{} doctor check(s) failed", errors);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! vidtalk is ready to use.");
    }

    Ok(())
}

/// Check if an external tool is available.
fn check_tool(name: &str, version_arg: &str, hint: &str) -> CheckResult {
    match Command::new(name).arg(version_arg).output() {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .unwrap_or("installed")
                .trim()
                .to_string();

            let version_display = if version.chars().count() > 50 {
                format!("{}...", version.chars().take(50).collect::<String>())
            } else {
                version
            };

            CheckResult::ok(name, &version_display)
        }
        Ok(_) => CheckResult::error(name, "installed but not working", hint),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            CheckResult::error(name, "not found", hint)
        }
        Err(e) => CheckResult::error(name, &format!("error: {}", e), hint),
    }
}

/// Check the resolved OpenAI API key.
fn check_api_key(key: Option<&str>) -> CheckResult {
    match key {
        Some(key) if key.starts_with("sk-") && key.len() > 20 => {
            let masked = format!("{}...{}", &key[..7], &key[key.len() - 4..]);
            CheckResult::ok("OpenAI API key", &format!("configured ({})", masked))
        }
        Some(_) => CheckResult::warning(
            "OpenAI API key",
            "set but format looks unusual",
            "Expected format: sk-... (OpenAI API key)",
        ),
        None => CheckResult::error(
            "OpenAI API key",
            "not set",
            "Set with: export OPENAI_API_KEY='sk-...' (or add it to a .env file)",
        ),
    }
}

/// Check that the scratch directory can be created and written.
fn check_scratch_dir(settings: &Settings) -> CheckResult {
    let dir = settings.temp_dir();
    let probe = std::fs::create_dir_all(&dir).and_then(|_| tempfile::tempdir_in(&dir));

    match probe {
        Ok(_) => CheckResult::ok("Scratch directory", &format!("{}", dir.display())),
        Err(e) => CheckResult::error(
            "Scratch directory",
            &format!("{} is not writable: {}", dir.display(), e),
            "Set [general] temp_dir in the config file",
        ),
    }
}

/// Check if config file exists.
fn check_config_file(config_path: &Path) -> CheckResult {
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: vidtalk config edit",
        )
    }
}

/// Platform-specific install hint for yt-dlp.
fn install_hint_ytdlp() -> &'static str {
    if cfg!(target_os = "macos") {
        "Install with: brew install yt-dlp"
    } else if cfg!(target_os = "linux") {
        "Install with: pip install yt-dlp (or your package manager)"
    } else {
        "Install from: https://github.com/yt-dlp/yt-dlp"
    }
}

/// Platform-specific install hint for ffmpeg.
fn install_hint_ffmpeg() -> &'static str {
    if cfg!(target_os = "macos") {
        "Install with: brew install ffmpeg"
    } else if cfg!(target_os = "linux") {
        "Install with: sudo apt install ffmpeg (or your package manager)"
    } else {
        "Install from: https://ffmpeg.org/download.html"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_error() {
        let result = CheckResult::error("test", "failed", "fix it");
        assert_eq!(result.status, CheckStatus::Error);
        assert_eq!(result.hint, Some("fix it".to_string()));
    }

    #[test]
    fn test_api_key_masking() {
        let result = check_api_key(Some("sk-proj-abcdefghijklmnop1234"));
        assert_eq!(result.status, CheckStatus::Ok);
        assert!(result.message.contains("sk-proj...1234"));
        assert!(!result.message.contains("abcdefgh"));

        assert_eq!(check_api_key(Some("token")).status, CheckStatus::Warning);
        assert_eq!(check_api_key(None).status, CheckStatus::Error);
    }

    #[test]
    fn test_missing_tool() {
        let result = check_tool("vidtalk-definitely-not-installed", "--version", "hint");
        assert_eq!(result.status, CheckStatus::Error);
        assert_eq!(result.message, "not found");
    }

    #[test]
    fn test_scratch_dir_writable() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.general.temp_dir = dir.path().join("scratch").to_string_lossy().into_owned();
        assert_eq!(check_scratch_dir(&settings).status, CheckStatus::Ok);
    }

    #[test]
    fn test_config_file_check_uses_given_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.toml");
        assert_eq!(check_config_file(&path).status, CheckStatus::Warning);

        std::fs::write(&path, "").unwrap();
        let result = check_config_file(&path);
        assert_eq!(result.status, CheckStatus::Ok);
        assert!(result.message.contains("x.toml"));
    }

    #[test]
    fn test_scratch_dir_unusable_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();

        let mut settings = Settings::default();
        settings.general.temp_dir = blocker.join("scratch").to_string_lossy().into_owned();
        assert_eq!(check_scratch_dir(&settings).status, CheckStatus::Error);
    }
}
