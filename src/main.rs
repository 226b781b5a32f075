use clap::Parser;
use excuse_gen::app::{self, commands, interactive};
use excuse_gen::config::{self, resolve_history_dir, RequestArgs};
use excuse_gen::utils::logger;
use excuse_gen::utils::validation::{validate_positive_number, Validate};
use excuse_gen::{CliConfig, Command, ExcuseError, JsonlHistoryStore, TomlConfig};
use std::io::Write;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = run(cli).await {
        tracing::error!(
            "Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::debug!("Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        std::process::exit(e.severity().exit_code());
    }
}

async fn run(cli: CliConfig) -> Result<(), ExcuseError> {
    let file = config::load_optional(cli.config.as_deref())?;
    if let Some(file) = &file {
        file.validate()?;
        tracing::debug!("Configuration validated");
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Command::Generate(args) => {
            let request = prepare(args, file.as_ref())?;
            let mut session = app::build_session(&request, file.as_ref())?;
            commands::generate(&mut session, &request, &mut out).await?;
        }
        Command::Rephrase(args) => {
            let request = prepare(args, file.as_ref())?;
            let mut session = app::build_session(&request, file.as_ref())?;
            commands::rephrase(&mut session, &request, &mut out).await?;
        }
        Command::History(args) => {
            if let Some(limit) = args.limit {
                validate_positive_number("limit", limit, 1)?;
            }
            let dir = resolve_history_dir(args.history_dir.as_deref(), file.as_ref());
            tracing::debug!("Reading history from {}", dir.display());
            let store = JsonlHistoryStore::new(dir);
            commands::history(&store, args.limit, &mut out).await?;
        }
        Command::Tips => commands::tips(&mut out)?,
        Command::Interactive(args) => {
            let request = prepare(args, file.as_ref())?;
            let mut session = app::build_session(&request, file.as_ref())?;
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            interactive::run(&mut session, request, stdin, &mut out).await?;
        }
    }

    out.flush()?;
    Ok(())
}

fn prepare(
    args: &RequestArgs,
    file: Option<&TomlConfig>,
) -> Result<excuse_gen::ExcuseRequest, ExcuseError> {
    let request = args.resolve(file);
    request.validate()?;
    if request.persist_history {
        if let Some(dir) = &request.history_dir {
            tracing::info!("History will be saved to {}", dir.display());
        }
    }
    Ok(request)
}
