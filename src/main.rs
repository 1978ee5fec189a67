use std::fs;
use std::path::Path;

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};

use git_release::analyzer::{build_release_notes, VersionAnalyzer};
use git_release::boundary::BoundaryWarning;
use git_release::cli::{
    create_branch_of_kind, finalize_release, prepare_release, rollback_to, start_hotfix,
};
use git_release::config::{self, ReleaseConfig};
use git_release::domain::tag::release_tag_name;
use git_release::domain::{BranchKind, Version};
use git_release::git::{Git2Repository, Repository};
use git_release::manifest::read_dependencies;
use git_release::ui;
use git_release::verify::{SimulatedChecks, Verifier};
use git_release::GitReleaseError;

#[derive(Parser)]
#[command(
    name = "git-release",
    about = "Stage-gated release automation driven by conventional commits"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write the default configuration file
    Init {
        #[arg(long, help = "Overwrite an existing configuration file")]
        force: bool,
    },

    /// Show or update the configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Suggest the next version from the commits since the latest tag
    Next,

    /// Print release notes for the commits since the latest tag
    Notes,

    /// Run the pre-release verification checks
    Verify,

    /// Prepare or finalize a release
    Release {
        #[command(subcommand)]
        action: ReleaseAction,
    },

    /// Start a hotfix branch derived from a base tag
    Hotfix {
        #[arg(help = "Base tag; defaults to the latest tag")]
        base_tag: Option<String>,
    },

    /// Roll back to a tag on a fresh, uniquely named branch
    Rollback {
        tag: String,

        #[arg(short, long, help = "Skip confirmation prompt")]
        force: bool,
    },

    /// Create a prefixed branch (feature, hotfix, or release)
    Branch {
        #[arg(help = "Branch type: feature, hotfix, or release")]
        kind: String,
        name: String,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Update a single field by dotted path (e.g. policy.run_tests false)
    Set { path: String, value: String },
}

#[derive(Subcommand)]
enum ReleaseAction {
    /// Create the release branch and compute the tag name
    Prepare,
    /// Verify, tag, push, and write release artifacts
    Finalize {
        #[arg(long, help = "Preview what would happen without making changes")]
        dry_run: bool,
    },
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        ui::display_error(&e.to_string());
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    match args.command {
        Command::Init { force } => init_config(args.config.as_deref(), force),
        Command::Config { action } => match action {
            ConfigAction::Show => show_config(args.config.as_deref()),
            ConfigAction::Set { path, value } => set_config(args.config.as_deref(), &path, &value),
        },
        Command::Next => suggest_next(args.config.as_deref()),
        Command::Notes => print_notes(args.config.as_deref()),
        Command::Verify => run_verification(args.config.as_deref()),
        Command::Release { action } => match action {
            ReleaseAction::Prepare => release_prepare(args.config.as_deref()),
            ReleaseAction::Finalize { dry_run } => release_finalize(args.config.as_deref(), dry_run),
        },
        Command::Hotfix { base_tag } => hotfix(args.config.as_deref(), base_tag.as_deref()),
        Command::Rollback { tag, force } => rollback(&tag, force),
        Command::Branch { kind, name } => create_branch(args.config.as_deref(), &kind, &name),
    }
}

fn init_config(config_path: Option<&str>, force: bool) -> Result<()> {
    let path = config::config_file_path(config_path);
    if path.exists() && !force {
        anyhow::bail!(
            "Configuration file '{}' already exists (use --force to overwrite)",
            path.display()
        );
    }

    config::save_config(&ReleaseConfig::default(), &path)?;
    ui::display_success(&format!("Wrote default configuration to {}", path.display()));
    Ok(())
}

fn show_config(config_path: Option<&str>) -> Result<()> {
    let config = config::load_config(config_path)?;
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

fn set_config(config_path: Option<&str>, path: &str, value: &str) -> Result<()> {
    config::update_config_value(config_path, path, value)?;
    ui::display_success(&format!("Updated {}", path));
    Ok(())
}

/// Suggest the next version, falling back to the configured initial
/// version (with a boundary warning) when the latest tag has no
/// recognizable version number.
fn suggested_version<R: Repository>(
    repo: &R,
    config: &ReleaseConfig,
) -> Result<Version> {
    let latest_tag = repo.latest_tag()?;
    let commits = repo.commits_since(latest_tag.as_deref())?;

    if commits.is_empty() {
        if let Some(tag) = &latest_tag {
            ui::display_boundary_warning(&BoundaryWarning::NoNewCommits {
                latest_tag: tag.clone(),
                current_commit_hash: repo.head_commit_id()?,
            });
        }
    }

    let analyzer = VersionAnalyzer::new(config.clone());
    match analyzer.suggest_next_version(latest_tag.as_deref(), &commits) {
        Ok(version) => Ok(version),
        Err(GitReleaseError::Version(reason)) => {
            if let Some(tag) = &latest_tag {
                ui::display_boundary_warning(&BoundaryWarning::UnparsableTag {
                    tag: tag.clone(),
                    reason,
                });
            }
            let fallback = Version::parse(&config.initial_version).ok_or_else(|| {
                GitReleaseError::config(format!(
                    "Configured initial_version '{}' is not a valid semantic version",
                    config.initial_version
                ))
            })?;
            ui::display_status(&format!("Falling back to initial version {}", fallback));
            Ok(fallback)
        }
        Err(e) => Err(e.into()),
    }
}

fn suggest_next(config_path: Option<&str>) -> Result<()> {
    let config = config::load_config(config_path)?;
    let repo = Git2Repository::discover()?;

    let version = suggested_version(&repo, &config)?;
    ui::display_success(&format!("Next version: {}", version));
    ui::display_status(&format!(
        "Next tag: {}",
        release_tag_name(&config.tag_prefix, &version)
    ));
    Ok(())
}

fn print_notes(config_path: Option<&str>) -> Result<()> {
    let config = config::load_config(config_path)?;
    let repo = Git2Repository::discover()?;

    let latest_tag = repo.latest_tag()?;
    let commits = repo.commits_since(latest_tag.as_deref())?;
    let version = suggested_version(&repo, &config)?;

    print!(
        "{}",
        build_release_notes(&version, &commits, config.policy.enforce_conventional_commits)
    );
    Ok(())
}

fn run_verification(config_path: Option<&str>) -> Result<()> {
    let config = config::load_config(config_path)?;
    let repo = Git2Repository::discover()?;

    let result = Verifier::new(&repo, &SimulatedChecks, &config).run()?;
    ui::display_verification(&result);

    if !result.overall() {
        std::process::exit(1);
    }
    Ok(())
}

fn release_prepare(config_path: Option<&str>) -> Result<()> {
    let config = config::load_config(config_path)?;
    let repo = Git2Repository::discover()?;

    let prepared = prepare_release(&repo, &config)?;
    ui::display_success(&format!(
        "Prepared release {} on branch {}",
        prepared.version, prepared.branch
    ));
    ui::display_status(&format!(
        "Tag {} will be created by 'git-release release finalize'",
        prepared.tag
    ));
    Ok(())
}

fn release_finalize(config_path: Option<&str>, dry_run: bool) -> Result<()> {
    let config = config::load_config(config_path)?;
    let repo = Git2Repository::discover()?;
    let dependencies = read_dependencies(Path::new("Cargo.toml"))?;

    let finalized = finalize_release(
        &repo,
        &SimulatedChecks,
        &config,
        dependencies,
        Utc::now(),
        dry_run,
    )?;

    if dry_run {
        ui::display_status("Dry run:");
        ui::display_success(&format!("  Step 1: would create tag {}", finalized.tag));
        ui::display_success(&format!(
            "  Step 2: would push {} and {} to {}",
            finalized.branch, finalized.tag, config.remote
        ));
        ui::display_success("  Step 3: would write release notes and snapshot");
        print!("\n{}", finalized.notes);
        return Ok(());
    }

    ui::display_success(&format!("Created tag {}", finalized.tag));

    if config.artifacts.write_notes {
        fs::write(&config.artifacts.notes_file, &finalized.notes)?;
        ui::display_success(&format!("Wrote {}", config.artifacts.notes_file));
    }
    if config.artifacts.write_snapshot {
        fs::write(
            &config.artifacts.snapshot_file,
            serde_json::to_string_pretty(&finalized.snapshot)?,
        )?;
        ui::display_success(&format!("Wrote {}", config.artifacts.snapshot_file));
    }

    if finalized.pushed {
        ui::display_success(&format!(
            "Pushed {} and {} to {}",
            finalized.branch, finalized.tag, config.remote
        ));
        println!(
            "\n{} Released {}\n",
            console::style("✓").green(),
            finalized.version
        );
    } else {
        if let Some(reason) = &finalized.push_error {
            ui::display_failure(&format!("Push failed: {}", reason));
        }
        ui::display_manual_push_instruction(&finalized.tag, &config.remote);
        std::process::exit(1);
    }

    Ok(())
}

fn hotfix(config_path: Option<&str>, base_tag: Option<&str>) -> Result<()> {
    let config = config::load_config(config_path)?;
    let repo = Git2Repository::discover()?;

    let hotfix = start_hotfix(&repo, &config, base_tag)?;
    ui::display_success(&format!(
        "Started hotfix branch {} from {}",
        hotfix.branch, hotfix.base_tag
    ));
    Ok(())
}

fn rollback(tag: &str, force: bool) -> Result<()> {
    let repo = Git2Repository::discover()?;

    if !force
        && !ui::confirm_action(&format!(
            "Hard reset the working tree to '{}' on a new branch?",
            tag
        ))?
    {
        println!("Rollback cancelled by user.");
        return Ok(());
    }

    let branch = rollback_to(&repo, tag, Utc::now())?;
    ui::display_success(&format!("Rolled back to {} on branch {}", tag, branch));
    Ok(())
}

fn create_branch(config_path: Option<&str>, kind: &str, name: &str) -> Result<()> {
    let config = config::load_config(config_path)?;
    let repo = Git2Repository::discover()?;

    let kind: BranchKind = kind.parse()?;
    let branch = create_branch_of_kind(&repo, &config, kind, name)?;
    ui::display_success(&format!("Created branch {}", branch));
    Ok(())
}
