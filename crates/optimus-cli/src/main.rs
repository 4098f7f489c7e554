use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use optimus_cli::config::{BridgeConfig, default_state_dir, parse_bridge_url};
use optimus_cli::{OutputFormat, Severity, commands};
use optimus_client::{DEFAULT_BRIDGE_URL, DEFAULT_TIMEOUT_SECS};
use std::path::PathBuf;
use std::process::ExitCode;
use url::Url;

#[derive(Parser)]
#[command(name = "optimus")]
#[command(author, version)]
#[command(
    about = "Call Spark History Server tools and render their results",
    long_about = "Optimus invokes Spark History Server MCP tools through the HTTP bridge, \
                  recognizes the shape of each result and renders it as the matching view: \
                  application tables, job timelines, bottleneck lists, configuration diffs \
                  and performance scorecards."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Pretty)]
    format: OutputFormat,

    /// Base URL of the tool bridge
    #[arg(
        long,
        global = true,
        env = "OPTIMUS_BRIDGE_URL",
        default_value = DEFAULT_BRIDGE_URL,
        value_parser = parse_bridge_url
    )]
    bridge_url: Url,

    /// Seconds to wait for a tool call
    #[arg(
        long,
        global = true,
        env = "OPTIMUS_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS
    )]
    timeout: u64,

    /// Directory holding the selected application (default: ~/.optimus)
    #[arg(long, global = true, env = "OPTIMUS_STATE_DIR")]
    state_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Invoke a tool through the bridge and render its result
    Call {
        /// Tool name, e.g. list_applications
        #[arg(value_name = "TOOL")]
        tool: String,

        /// Tool arguments as KEY=VALUE; app_id defaults to the selected application
        #[arg(value_name = "KEY=VALUE")]
        args: Vec<String>,

        /// Only show bottlenecks of this severity
        #[arg(long, value_enum)]
        severity: Option<Severity>,

        /// Select the application in row N of the result (numbered from 1)
        #[arg(long, value_name = "N")]
        select: Option<usize>,
    },

    /// Render a saved tool result without calling the bridge
    Render {
        /// Tool that produced the result
        #[arg(value_name = "TOOL")]
        tool: String,

        /// JSON payload file; reads stdin when omitted or "-"
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Only show bottlenecks of this severity
        #[arg(long, value_enum)]
        severity: Option<Severity>,
    },

    /// List the tools and the view each one renders with
    Tools {
        /// Ask the bridge which tools it serves
        #[arg(long)]
        remote: bool,
    },

    /// Check that the bridge is reachable and connected
    Status,

    /// Show, set or clear the selected application
    Select {
        /// Application id to select
        #[arg(value_name = "APP_ID", conflicts_with = "clear")]
        app_id: Option<String>,

        /// Forget the selected application
        #[arg(long)]
        clear: bool,
    },

    /// Generate shell completion scripts
    #[command(long_about = "Generate shell completion scripts for optimus.

SUPPORTED SHELLS:
    bash, zsh, fish, powershell, elvish

INSTALLATION:
    Bash:
        optimus completion --shell bash > ~/.local/share/bash-completion/completions/optimus
        # or add to ~/.bashrc:
        eval \"$(optimus completion --shell bash)\"

    Zsh:
        optimus completion --shell zsh > \"${fpath[1]}/_optimus\"
        # or add to ~/.zshrc:
        eval \"$(optimus completion --shell zsh)\"

    Fish:
        optimus completion --shell fish > ~/.config/fish/completions/optimus.fish

    PowerShell:
        optimus completion --shell powershell >> $PROFILE")]
    Completion {
        /// Shell to generate completions for
        #[arg(long, value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let state_dir = match cli.state_dir {
        Some(dir) => dir,
        None => default_state_dir()?,
    };
    let bridge = BridgeConfig::new(cli.bridge_url, cli.timeout);

    let done = match cli.command {
        Commands::Call {
            tool,
            args,
            severity,
            select,
        } => commands::call::execute(
            &tool,
            &args,
            severity,
            select,
            &bridge,
            &state_dir,
            cli.format,
        )?,
        Commands::Render {
            tool,
            file,
            severity,
        } => {
            commands::render::execute(&tool, file.as_deref(), severity, &state_dir, cli.format)?;
            ExitCode::SUCCESS
        }
        Commands::Tools { remote } => {
            commands::tools::execute(remote, &bridge, cli.format)?;
            ExitCode::SUCCESS
        }
        Commands::Status => {
            commands::status::execute(&bridge, cli.format)?;
            ExitCode::SUCCESS
        }
        Commands::Select { app_id, clear } => {
            commands::select::execute(app_id.as_deref(), clear, &state_dir, cli.format)?;
            ExitCode::SUCCESS
        }
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            commands::completion::execute(shell, &mut cmd)?;
            ExitCode::SUCCESS
        }
    };

    Ok(done)
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("optimus=debug,optimus_cli=debug,optimus_core=debug,optimus_client=debug")
    } else {
        EnvFilter::new("optimus=info,optimus_cli=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}
