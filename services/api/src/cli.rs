use crate::demo::{run_assess, run_batch, run_demo, AssessArgs, BatchArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use credit_risk::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Fuzzy Credit Risk",
    about = "Score client credit risk with fuzzy inference, over HTTP or from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Assess a single client profile
    Assess(AssessArgs),
    /// Assess every client in a CSV roster
    Batch(BatchArgs),
    /// Assess the reference clients and extreme cases and print a report
    Demo,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Assess(args) => run_assess(args),
        Command::Batch(args) => run_batch(args),
        Command::Demo => run_demo(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["credit-risk-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn assess_flags_parse() {
        let cli = Cli::try_parse_from([
            "credit-risk-api",
            "assess",
            "--name",
            "Ana",
            "--income",
            "12000",
            "--history-score",
            "9",
            "--age",
            "35",
            "--tenure-years",
            "8",
            "--debt-ratio",
            "20",
            "--json",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Assess(args)) => {
                assert_eq!(args.name, "Ana");
                assert_eq!(args.income, 12_000.0);
                assert!(args.json);
            }
            other => panic!("expected assess, got {other:?}"),
        }
    }

    #[test]
    fn batch_requires_a_roster() {
        assert!(Cli::try_parse_from(["credit-risk-api", "batch"]).is_err());
    }
}
