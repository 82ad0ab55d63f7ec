use anyhow::Context;
use clap::Parser;
use std::{
    io::{BufRead, Write},
    path::PathBuf,
    process::ExitCode,
};

use crate::catalog::api::ApiClient;
use crate::config::{self, Credentials};
use crate::http;
use crate::pipeline::{self, RunReport};
use crate::storage::session_store::SessionStore;

#[derive(Parser)]
#[command(name = "radioplaylist")]
#[command(version)]
#[command(about = "Compose a streaming playlist from radio station track listings")]
pub struct Cli {
    /// Url of the station's playlist page, or path to a JSON track list
    #[arg(long)]
    pub url: String,

    /// Name of the playlist to be created
    #[arg(long)]
    pub playlist: String,

    /// Account the playlist is created for
    #[arg(long)]
    pub username: String,

    /// Path to the config TOML file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Where the authorized session is kept between runs
    #[arg(long)]
    pub session: Option<PathBuf>,

    /// Forget the stored session and authorize again
    #[arg(long)]
    pub reauth: bool,
}

/// Entrypoint for CLI
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    match execute(&cli) {
        Ok(report) if report.succeeded() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn execute(cli: &Cli) -> anyhow::Result<RunReport> {
    let cfg = match &cli.config {
        Some(path) => config::Config::load(&path.to_string_lossy())?,
        None => config::Config::default(),
    };
    let credentials = Credentials::from_env()?;

    let store = SessionStore::new(cli.session.clone().unwrap_or(cfg.session.path.clone()));
    if cli.reauth {
        store.delete().context("Failed to remove stored session")?;
    }

    let agent = http::client::agent(&cfg.http);
    let api = ApiClient::new(agent.clone(), cfg.api.clone());
    let mut session = pipeline::open_session(&store, api, credentials, prompt_redirect_url)?;

    let mut stdout = std::io::stdout().lock();
    let report = pipeline::run_and_save(
        &store,
        &mut session,
        &cli.url,
        &agent,
        &cli.playlist,
        &cli.username,
        &mut stdout,
    )?;
    Ok(report)
}

/// Shows the authorize url and waits for the pasted redirect url
fn prompt_redirect_url(authorize_url: &str) -> std::io::Result<String> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "Follow authorisation url:\n {authorize_url}")?;
    write!(
        stdout,
        "Log in and accept permissions, then you'll be redirected to a localhost url. \
         Copy the address and paste it here: "
    )?;
    stdout.flush()?;

    let mut redirect_url = String::new();
    std::io::stdin().lock().read_line(&mut redirect_url)?;
    Ok(redirect_url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_required_arguments() {
        let cli = Cli::try_parse_from([
            "radioplaylist",
            "--url",
            "https://radiokampus.fm/playlista.php",
            "--playlist",
            "Kampus",
            "--username",
            "alice",
            "--reauth",
        ])
        .unwrap();

        assert_eq!(cli.url, "https://radiokampus.fm/playlista.php");
        assert_eq!(cli.playlist, "Kampus");
        assert_eq!(cli.username, "alice");
        assert!(cli.reauth);
        assert_eq!(cli.config, None);
        assert_eq!(cli.session, None);
    }

    #[test]
    fn missing_playlist_name_is_rejected() {
        assert!(Cli::try_parse_from(["radioplaylist", "--url", "a.json", "--username", "u"]).is_err());
    }
}
