use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use archroot_core::{
    ArchiveRef, BuildCacheLayout, Environment, ExecBootstrap, ProcessEnv, ZipApp,
    ENVIRONMENT_MEMBER,
};
use archroot_resolver::{bootstrap_root, launch, plan_root_on, Platform, RootBases, RootPlan};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "ARCHROOT_LOG";
const FALLBACK_LOG_ENV: &str = "RUST_LOG";

#[derive(Parser, Debug)]
#[command(name = "archroot")]
#[command(about = "Pick the extraction root for a self-contained archive", long_about = None)]
struct Cli {
    #[arg(long, global = true)]
    system_base: Option<PathBuf>,
    #[arg(long, global = true)]
    user_base: Option<PathBuf>,
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the root the archive would extract into.
    Resolve { archive: PathBuf },
    /// Show how the root was chosen.
    Explain { archive: PathBuf },
    /// Publish the root and run the archive.
    Run {
        #[arg(long)]
        interpreter: Option<PathBuf>,
        archive: PathBuf,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<OsString>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = ProcessEnv::from_process();
    init_tracing(&log_directive(cli.verbose, &config));

    let bases = resolve_bases(&cli, &config);

    match cli.command {
        Commands::Resolve { archive } => {
            let archive = ZipApp::open(archive)?;
            let mut preview = config.clone();
            let decision = bootstrap_root(&archive, &mut preview, &bases, &BuildCacheLayout)?;
            println!("{}", decision.path().display());
        }
        Commands::Explain { archive } => {
            let archive = ZipApp::open(archive)?;
            let raw = archive.read(ENVIRONMENT_MEMBER)?;
            let env = Environment::from_json(&raw)
                .with_context(|| format!("invalid {ENVIRONMENT_MEMBER} in archive"))?;
            let explicit = env.effective_root(&config);
            let plan = plan_root_on(
                Platform::current(),
                &archive,
                &env.build_id,
                &bases,
                &BuildCacheLayout,
            );
            // an explicit root makes the computed plan informational only
            let plan = match (plan, &explicit) {
                (Ok(plan), _) => Some(plan),
                (Err(err), Some(_)) => {
                    tracing::debug!(error = %err, "skipping computed root");
                    None
                }
                (Err(err), None) => return Err(err),
            };
            let lines = format_explain_lines(
                archive.filename(),
                &env,
                &bases,
                plan.as_ref(),
                explicit.as_deref(),
            );
            for line in lines {
                println!("{line}");
            }
        }
        Commands::Run {
            interpreter,
            archive,
            args,
        } => {
            let archive = ZipApp::open(archive)?;
            let mut bootstrap = ExecBootstrap::new(args);
            if let Some(interpreter) = interpreter {
                bootstrap = bootstrap.with_interpreter(interpreter);
            }
            let code = launch(&archive, &bootstrap, &mut config, &bases, &BuildCacheLayout)?;
            std::process::exit(code);
        }
    }

    Ok(())
}

fn log_directive(verbose: bool, config: &ProcessEnv) -> String {
    if verbose {
        return "debug".to_string();
    }
    [LOG_ENV, FALLBACK_LOG_ENV]
        .into_iter()
        .find_map(|key| config.get_non_empty(key)?.to_str())
        .unwrap_or("warn")
        .to_string()
}

fn init_tracing(directive: &str) {
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn resolve_bases(cli: &Cli, config: &ProcessEnv) -> RootBases {
    let mut bases = RootBases::from_env(config);
    if let Some(user_base) = &cli.user_base {
        bases.user_base = Some(user_base.clone());
    }
    if let Some(system_base) = &cli.system_base {
        bases.system_base = system_base.clone();
    }
    tracing::debug!(
        system_base = %bases.system_base.display(),
        user_base = ?bases.user_base,
        "resolved cache bases"
    );
    bases
}

fn display_user_base(bases: &RootBases) -> String {
    bases
        .user_base
        .as_deref()
        .map_or_else(|| "unset".to_string(), |base| base.display().to_string())
}

fn format_explain_lines(
    archive: &Path,
    env: &Environment,
    bases: &RootBases,
    plan: Option<&RootPlan>,
    explicit: Option<&Path>,
) -> Vec<String> {
    let archive = plan.map_or(archive, |plan| plan.archive_path.as_path());
    let mut lines = vec![
        format!("archive: {}", archive.display()),
        format!("build_id: {}", env.build_id),
    ];
    if let Some(plan) = plan {
        lines.push(format!("platform: {}", plan.platform.as_str()));
        lines.push(format!("location: {}", plan.class.as_str()));
    }
    lines.push(format!("system_base: {}", bases.system_base.display()));
    lines.push(format!("user_base: {}", display_user_base(bases)));

    match plan.map(|plan| &plan.system) {
        Some(Some(candidate)) => {
            lines.push(format!("system_cache: {}", candidate.cache.display()));
            lines.push(format!(
                "system_cache_populated: {}",
                candidate.site_packages_present
            ));
            lines.push(format!("system_cache_writeable: {}", candidate.cache_writeable));
        }
        Some(None) => lines.push("system_cache: skipped".to_string()),
        None => {}
    }

    match (explicit, plan) {
        (Some(root), _) => lines.push(format!("root: {} (explicit)", root.display())),
        (None, Some(plan)) => lines.push(format!(
            "root: {} ({})",
            plan.resolved.path.display(),
            plan.resolved.tier.as_str()
        )),
        (None, None) => lines.push("root: unresolved".to_string()),
    }
    lines
}
