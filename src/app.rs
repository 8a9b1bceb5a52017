//! Application orchestrator.
//! Loads/merges config, initializes logging, installs the signal handler,
//! selects and plans the batch, asks for confirmation, executes, and offers
//! rollback when a step fails.

use anyhow::{Context, Result, bail};
use std::process::ExitCode;
use tracing::{debug, error, info, warn};

use batchmv::cli::{Args, naming_options};
use batchmv::config::{CONFIG_ENV, LoadResult, load_or_init, validate_and_normalize};
use batchmv::engine::{self, Executor, PlanOptions, RandomTempNames};
use batchmv::naming::build_pairs;
use batchmv::output as out;
use batchmv::{RenameError, default_config_path, select, shutdown};

use crate::logging::init_tracing;

/// Run the CLI application.
pub fn run(args: Args) -> Result<ExitCode> {
    // Handle --print-config before logging init
    if args.print_config {
        print_config();
        return Ok(ExitCode::SUCCESS);
    }

    let loaded = load_or_init()?;
    if let LoadResult::CreatedTemplate(_, path) = &loaded
        && !args.quiet
    {
        out::print_info(&format!("A template batchmv config was written to: {}", path.display()));
    }
    let mut cfg = loaded.into_config();
    args.apply_overrides(&mut cfg);
    if cfg.log_file.is_none() {
        cfg.log_file = batchmv::default_log_path().ok();
    }

    let guard = init_tracing(cfg.log_level, cfg.log_file.as_deref(), args.json).map_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {}", e));
        e
    })?;
    ctrlc::set_handler(|| {
        shutdown::request();
        out::print_warn("Received interrupt; a batch that already started will finish first.");
    })
    .context("install signal handler")?;

    debug!("Starting batchmv: {:?}", args);
    let result = rename_batch(&args, cfg);
    if let Err(e) = &result
        && let Some(re) = e.downcast_ref::<RenameError>()
    {
        error!(code = re.code(), fatal = re.is_fatal(), "{re}");
    }

    // Flush the file appender before the process exits.
    drop(guard);
    result
}

fn print_config() {
    if let Some(p) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        out::print_info(&format!("Using {CONFIG_ENV} (explicit):\n  {}\n", p.to_string_lossy()));
        out::print_info(&format!("To override, unset {CONFIG_ENV} or set it to another file."));
        return;
    }
    match default_config_path() {
        Ok(p) => {
            out::print_info(&format!("Default batchmv config path:\n  {}\n", p.display()));
            if p.exists() {
                out::print_info("A config file already exists at that location.");
            } else {
                out::print_info("No config file exists there yet. Run batchmv once to create a template.");
            }
        }
        Err(e) => out::print_error(&format!("Could not determine a default config path: {e}")),
    }
}

fn rename_batch(args: &Args, mut cfg: batchmv::Config) -> Result<ExitCode> {
    validate_and_normalize(&mut cfg)?;
    let dir = cfg.source_dir.clone();
    let quiet = args.quiet;
    let verbose = args.verbose;

    let mode = args.rename_mode()?;
    let selection = if mode.selects_sources() {
        Vec::new()
    } else {
        select(&dir, &args.selector(&cfg)?)?
    };
    let pairs = build_pairs(&dir, selection, &mode, &naming_options(&cfg))?;
    let plan = engine::plan(pairs, &PlanOptions { overlap: cfg.overlap }, &mut RandomTempNames)?;

    if !quiet {
        out::print_mapping(&dir, &plan.included, &plan.ignored, verbose);
    }
    if plan.is_noop() {
        if !quiet {
            out::print_user("No changes to be made");
        }
        return Ok(ExitCode::SUCCESS);
    }
    if cfg.dry_run {
        info!(steps = plan.schedule.len(), "dry run; nothing renamed");
        if !quiet {
            out::print_info("Dry run: no names were changed.");
        }
        return Ok(ExitCode::SUCCESS);
    }
    if !quiet && !confirm("Do you want to proceed?", false)? {
        out::print_user("Aborted; no names were changed.");
        return Ok(ExitCode::SUCCESS);
    }
    if shutdown::is_requested() {
        return Err(RenameError::Interrupted.into());
    }

    let mut exec = Executor::new();
    let err = match exec.run(&plan.schedule) {
        Ok(()) => {
            if !quiet {
                out::print_changes(exec.log(), verbose);
            }
            return Ok(ExitCode::SUCCESS);
        }
        Err(e) => e,
    };

    error!(code = err.code(), error = %err, completed = exec.log().len(), "batch failed");
    out::print_error(&err.to_string());
    out::print_steps("Renames completed before the failure:", exec.log());

    if args.no_rollback {
        warn!("rollback skipped (--no-rollback)");
        return Ok(ExitCode::FAILURE);
    }
    if !quiet && !confirm("Undo the completed renames?", true)? {
        return Ok(ExitCode::FAILURE);
    }
    match exec.rollback() {
        Ok(()) => {
            out::print_warn("Completed renames were undone; the directory is back to its original names.");
            Ok(ExitCode::FAILURE)
        }
        Err(fatal) => {
            if let RenameError::RollbackFailed { undone, pending, .. } = &fatal {
                out::print_steps("Renames undone:", undone);
                out::print_steps("Renames still applied:", pending);
            }
            Err(fatal.into())
        }
    }
}

/// Ask a yes/no question on the terminal.
fn confirm(prompt: &str, default: bool) -> Result<bool> {
    if !atty::is(atty::Stream::Stdin) {
        bail!("cannot ask for confirmation without a terminal; pass --quiet to skip prompts");
    }
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()
        .context("read confirmation")
}
