use anyhow::Result;
use canary_cli::OutputFormat;
use canary_cli::commands::{self, config::ConfigArgs, run::BrowserArgs};
use canary_core::Scenario;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "canary")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Smoke checks for web front-ends driven through a real browser",
    long_about = "Canary opens your application's home page in Chrome, waits for it to settle, \
                  and checks that it has a title and renders its root element."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "pretty")]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Run smoke scenarios against a web application
    Run {
        #[command(flatten)]
        config: ConfigArgs,

        #[command(flatten)]
        browser: BrowserArgs,

        /// Scenario to run (repeatable; default: all)
        #[arg(short, long = "scenario", value_name = "NAME")]
        scenarios: Vec<Scenario>,

        /// Also write the JSON report to this file
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,
    },

    /// List available scenarios
    Scenarios,

    /// Print the effective configuration as JSON
    Config {
        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Generate shell completion scripts
    #[command(after_help = "SUPPORTED SHELLS:\n  \
        bash, zsh, fish, powershell, elvish\n\n\
        INSTALLATION:\n  \
        bash:  canary completion --shell bash >> ~/.bashrc\n  \
        zsh:   canary completion --shell zsh > ~/.zfunc/_canary\n  \
        fish:  canary completion --shell fish > ~/.config/fish/completions/canary.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(short, long, value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match cli.command {
        Commands::Run {
            config,
            browser,
            scenarios,
            report,
        } => {
            let config = config.resolve()?;
            commands::run::execute(
                config,
                browser.launch_options(),
                scenarios,
                report.as_deref(),
                cli.format,
            )
        }
        Commands::Scenarios => commands::scenarios::execute(cli.format),
        Commands::Config { config } => commands::config::execute(&config),
        Commands::Completion { shell } => commands::completion::execute(shell, &mut Cli::command()),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("canary=debug,canary_cli=debug,canary_core=debug,canary_browser=debug")
    } else {
        EnvFilter::new("canary=info,canary_cli=info,canary_core=warn,canary_browser=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
