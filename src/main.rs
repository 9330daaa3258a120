use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use test_debug_launcher::dap::StdioDebugService;
use test_debug_launcher::host::local::{EnvFileResolver, FixedInterpreter, LocalFileSystem, StaticWorkspace};
use test_debug_launcher::host::{HostServices, WorkspaceFolder};
use test_debug_launcher::settings::SETTINGS_ENV_VAR;
use test_debug_launcher::{logging, DebugLauncher, LaunchOptions, LaunchOutcome, LauncherSettings, TestFramework};
use tokio_util::sync::CancellationToken;

/// Resolve and launch debug sessions for test runs.
#[derive(Debug, Parser)]
#[command(name = "test-debug-launcher", version, about)]
struct Cli {
    /// Path to a TOML settings file. Falls back to `TEST_DEBUG_LAUNCHER_CONFIG`.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the merged debug configuration as JSON.
    Resolve(RunArgs),
    /// Send a DAP launch request on stdout and wait for the session to terminate.
    Launch(RunArgs),
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Working directory of the test run.
    #[arg(long, default_value = ".")]
    cwd: PathBuf,

    /// Test framework: `unittest` or `pytest`.
    #[arg(long)]
    framework: TestFramework,

    /// Test process arguments as a single shell-quoted string.
    #[arg(long, default_value = "")]
    args: String,

    /// Workspace folder; repeat for multi-root workspaces. Defaults to `--cwd`.
    #[arg(long = "workspace")]
    workspaces: Vec<PathBuf>,

    /// Interpreter used when launch.json does not name one.
    #[arg(long)]
    python: Option<String>,
}

impl RunArgs {
    fn launch_options(&self) -> anyhow::Result<LaunchOptions> {
        let args = shlex::split(&self.args)
            .ok_or_else(|| anyhow::anyhow!("unbalanced quotes in --args: {}", self.args))?;
        Ok(LaunchOptions::new(self.cwd.clone(), args, self.framework))
    }

    fn workspace(&self) -> StaticWorkspace {
        let folders = if self.workspaces.is_empty() {
            vec![WorkspaceFolder::new(self.cwd.clone())]
        } else {
            self.workspaces.iter().cloned().map(WorkspaceFolder::new).collect()
        };
        StaticWorkspace::new(folders)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(cli.config);
    logging::init(&settings.logging);

    match cli.command {
        Command::Resolve(run) => {
            let launcher = DebugLauncher::new(host_services(&run), settings);
            let config = launcher.resolve_configuration(&run.launch_options()?).await?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Command::Launch(run) => {
            let launcher = DebugLauncher::new(host_services(&run), settings);

            let cancel = CancellationToken::new();
            let on_ctrl_c = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    on_ctrl_c.cancel();
                }
            });

            let options = run.launch_options()?.with_cancel(cancel);
            match launcher.launch_debugger(&options).await? {
                LaunchOutcome::Cancelled => tracing::info!("launch cancelled"),
                LaunchOutcome::Terminated => tracing::info!("debug session finished"),
            }
        }
    }

    Ok(())
}

/// Local host: folders from the command line, DAP frames on stdin/stdout.
fn host_services(run: &RunArgs) -> HostServices {
    HostServices {
        workspace: Arc::new(run.workspace()),
        fs: Arc::new(LocalFileSystem),
        interpreters: Arc::new(FixedInterpreter(run.python.clone())),
        environment: Arc::new(EnvFileResolver),
        debug: Arc::new(StdioDebugService::stdio(tokio::io::stdout())),
    }
}

fn load_settings(cli_path: Option<PathBuf>) -> LauncherSettings {
    let path = cli_path.or_else(|| std::env::var_os(SETTINGS_ENV_VAR).map(PathBuf::from));
    let Some(path) = path else {
        return LauncherSettings::default();
    };

    match LauncherSettings::load_from_path(&path) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!(
                "test-debug-launcher: failed to load settings from {}: {err}; continuing with defaults",
                path.display()
            );
            LauncherSettings::default()
        }
    }
}
