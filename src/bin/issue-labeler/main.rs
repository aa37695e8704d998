use std::process::ExitCode;

use issue_labeler::{
    Config, EventPayload, GitHub, Outcome, actions, label_issue, parse_args, resolve_token,
};

fn handle_clap_help_version(clap_err: &clap::Error) -> ! {
    use clap::error::ErrorKind;
    match clap_err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            print!("{clap_err}");
            std::process::exit(0);
        }
        _ => {
            eprint!("{clap_err}");
            std::process::exit(2);
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

async fn run(config: &Config) -> anyhow::Result<Outcome> {
    let payload = EventPayload::load(config.event_path.as_deref())?;

    let forge = GitHub::new(
        resolve_token(config.repo_token.as_deref()),
        config.api_url.as_str(),
    );

    label_issue(config, &payload, &forge).await
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    init_tracing();

    let mut stdout = std::io::stdout();

    let config = match parse_args(std::env::args_os()) {
        Ok(config) => config,
        Err(err) => {
            if let Some(clap_err) = err.downcast_ref::<clap::Error>() {
                handle_clap_help_version(clap_err);
            }
            actions::report_failure(&mut stdout, &err)?;
            return Ok(ExitCode::FAILURE);
        }
    };

    match run(&config).await {
        Ok(outcome) => {
            actions::info(&mut stdout, &outcome.to_string())?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            actions::report_failure(&mut stdout, &err)?;
            Ok(ExitCode::FAILURE)
        }
    }
}
