use crate::cli::RunArgs;
use pre_commit_progress::config::Config;
use pre_commit_progress::diff::{filter_tasks, resolve_merge_base, GitDiff};
use pre_commit_progress::output::Verdict;
use pre_commit_progress::session::PreCommit;
use anyhow::Context;
use tracing::info;

pub async fn execute(args: RunArgs) -> anyhow::Result<Verdict> {
    // Load and validate config
    info!("Loading config from {:?}", args.config);
    let mut config = Config::load(&args.config)?;

    // Apply CLI overrides
    if args.all {
        config.options.check_git_diff = false;
    }
    if args.unstaged {
        config.options.staged_check = false;
    }
    if let Some(max_parallel) = args.max_parallel {
        config.options.max_parallel = Some(max_parallel);
    }
    if args.diff_ref.is_some() {
        config.options.diff_ref = args.diff_ref;
    }
    if args.merge_base.is_some() {
        config.merge_base = args.merge_base;
    }
    if args.show_skipped {
        config.show_skipped = true;
    }
    if args.report_file.is_some() {
        config.report_file = args.report_file;
    }

    config.validate()?;

    // An explicit diff_ref wins over merge_base
    if config.options.check_git_diff && config.options.diff_ref.is_none() {
        if let Some(branch) = &config.merge_base {
            let base = resolve_merge_base(branch)
                .await
                .with_context(|| format!("Failed to resolve merge base of {}", branch))?;
            info!("Diffing against merge base {} of {}", base, branch);
            config.options.diff_ref = Some(base);
        }
    }

    if args.dry_run {
        print_execution_plan(&config).await?;
        return Ok(Verdict::Passed);
    }

    let verdict = PreCommit::new(config.options.clone())
        .show_skipped(config.show_skipped)
        .with_report_file(config.report_file.clone())
        .run(config.tasks)
        .await?;

    Ok(verdict)
}

async fn print_execution_plan(config: &Config) -> anyhow::Result<()> {
    let filtered =
        filter_tasks(config.tasks.clone(), &config.options, &GitDiff::default()).await?;

    println!("\n=== Execution Plan ===\n");
    match config.options.max_parallel {
        Some(n) => println!("Max parallel: {}", n),
        None => println!("Max parallel: unbounded"),
    }
    if !config.options.check_git_diff {
        println!("Diff check: disabled");
    } else {
        println!(
            "Diff check: {}",
            if config.options.staged_check {
                "staged changes"
            } else {
                "staged and unstaged changes"
            }
        );
        if let Some(diff_ref) = &config.options.diff_ref {
            println!("Diff ref: {}", diff_ref);
        }
    }

    println!("\nTasks to run:");
    for task in &filtered.included {
        println!("  - [{}] {}", task.cwd, task.cmd.argv()?.join(" "));
    }
    if !filtered.skipped.is_empty() {
        println!("\nSkipped (no changes):");
        for task in &filtered.skipped {
            println!(
                "  - [{}] {} ({})",
                task.cwd,
                task.cmd.argv()?.join(" "),
                task.diff_target()
            );
        }
    }
    println!();
    Ok(())
}
