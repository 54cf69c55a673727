use crate::demo::{run_demo, run_validate, DemoArgs, ValidateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use lease_intake::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Truck Lease Intake",
    about = "Run and exercise the truck lease intake validation service",
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
    /// Walk a sample applicant through both intake steps
    Demo(DemoArgs),
    /// Validate a single step payload read from a JSON file
    Validate(ValidateArgs),
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
        Command::Demo(args) => run_demo(args),
        Command::Validate(args) => run_validate(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::StepArg;

    #[test]
    fn validate_command_parses_step_and_path() {
        let cli = Cli::try_parse_from([
            "lease-intake-api",
            "validate",
            "--step",
            "vehicle",
            "payload.json",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Validate(args)) => {
                assert_eq!(args.step, StepArg::Vehicle);
                assert_eq!(args.path.to_string_lossy(), "payload.json");
                assert!(args.today.is_none());
            }
            other => panic!("expected validate command, got {other:?}"),
        }
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["lease-intake-api"]).expect("arguments parse");
        assert!(cli.command.is_none());
    }

    #[test]
    fn demo_accepts_pinned_date() {
        let cli = Cli::try_parse_from(["lease-intake-api", "demo", "--today", "2025-01-15"])
            .expect("arguments parse");
        match cli.command {
            Some(Command::Demo(args)) => {
                assert_eq!(args.today, chrono::NaiveDate::from_ymd_opt(2025, 1, 15));
            }
            other => panic!("expected demo command, got {other:?}"),
        }
    }
}
