use std::{path::PathBuf, str::FromStr};

use anyhow::Result;
use dotenvy::dotenv;
use reedline::Signal;
use tracing::{debug, Level};

use shelfadmin::config::Config;

mod command_parser;
mod forms;
mod prompt;
mod repl;
mod session;

use session::{Flow, Session};

fn init_logging(level: &str) {
    let level = Level::from_str(level).unwrap_or(Level::WARN);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

async fn run_repl(session: &mut Session) -> Result<()> {
    let prompt = prompt::ShelfPrompt::new(&session.config().api);
    let mut repl = repl::Repl::new(
        command_parser::generate_completions(),
        &session.config().history_location(),
        prompt,
    )?;
    loop {
        match repl.read_line()? {
            Signal::Success(buffer) => match session.handle_line(&buffer).await {
                Ok(Flow::Continue) => (),
                Ok(Flow::Exit) => break,
                Err(e) => println!("Error: {}", e),
            },
            Signal::CtrlD | Signal::CtrlC => {
                println!("\nAborted!");
                break;
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine.
    let _ = dotenv();

    let args = command_parser::arg_parser_cli().get_matches();
    let config = Config::read_config(args.get_one::<PathBuf>("config").map(PathBuf::as_path))?;
    init_logging(&config.log_level);
    debug!("Using catalog at {}", config.api.base_url);

    let mut session = Session::new(config)?;

    if let Some(("repl", _)) = args.subcommand() {
        run_repl(&mut session).await?;
    } else {
        session.dispatch(&args).await?;
    }

    Ok(())
}
