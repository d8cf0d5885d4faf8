//! Command implementations for hydrabot.
//!
//! Routes CLI commands to their handlers. Settings go to stdout; warnings and
//! errors go to stderr.

use crate::cli::{CheckArgs, Command, OutputFormat, ResolveArgs};
use hydrabot::config::Configuration;
use hydrabot::error::{HydrabotError, Result};
use hydrabot::events::{EventContext, PullRequestRef};
use hydrabot::git::{get_repo_root, run_git};
use hydrabot::host::GitHost;
use hydrabot::resolver::Resolver;
use tracing::debug;

/// Dispatch a command to its implementation.
pub async fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Check(args) => cmd_check(args),
        Command::Resolve(args) => cmd_resolve(args).await,
    }
}

fn cmd_check(args: CheckArgs) -> Result<()> {
    let text = std::fs::read_to_string(&args.file).map_err(|e| {
        HydrabotError::UserError(format!("cannot read {}: {}", args.file.display(), e))
    })?;

    let configuration = Configuration::from_text(&text);
    print!("{}", render(&configuration, args.format)?);
    ensure_valid(&configuration)
}

async fn cmd_resolve(args: ResolveArgs) -> Result<()> {
    let repo_root = get_repo_root(&args.repo).await?;
    debug!(repo = %repo_root.display(), "resolving against local repository");

    let mut ctx = EventContext::new(&args.event);
    if let Some(action) = &args.action {
        ctx = ctx.with_action(action);
    }

    let mut host = GitHost::new(&repo_root, &args.default_branch);
    if let (Some(number), Some(base), Some(head)) = (args.pull, &args.base, &args.head) {
        let head_sha = run_git(&repo_root, &["rev-parse", "--verify", head.as_str()])
            .await?
            .trimmed()
            .to_string();
        let mut pull_request = PullRequestRef::new(number, head_sha);
        pull_request.head_ref = Some(head.clone());

        host = host.with_pull(number, base.as_str(), head.as_str());
        ctx = ctx.with_pull_request(pull_request);
    }

    let configuration = Resolver::new(host).resolve(&ctx).await;
    print!("{}", render(&configuration, args.format)?);
    ensure_valid(&configuration)
}

/// Serialize resolved settings, reporting warnings to stderr.
///
/// Returns an empty string when the configuration carries errors.
fn render(configuration: &Configuration, format: OutputFormat) -> Result<String> {
    for warning in configuration.warnings() {
        eprintln!("warning: {}", warning);
    }

    let Some(settings) = configuration.settings() else {
        return Ok(String::new());
    };

    match format {
        OutputFormat::Yaml => serde_yaml::to_string(settings)
            .map_err(|e| HydrabotError::UserError(format!("cannot render settings: {}", e))),
        OutputFormat::Json => serde_json::to_string_pretty(settings)
            .map(|mut json| {
                json.push('\n');
                json
            })
            .map_err(|e| HydrabotError::UserError(format!("cannot render settings: {}", e))),
    }
}

fn ensure_valid(configuration: &Configuration) -> Result<()> {
    if !configuration.has_errors() {
        return Ok(());
    }

    let details: Vec<String> = configuration
        .errors()
        .iter()
        .map(|e| e.to_string())
        .collect();
    Err(HydrabotError::ConfigInvalid(details.join("; ")))
}
