use pre_commit_progress::config::Config;
use schemars::schema_for;
use std::io::Write;

pub fn execute() -> anyhow::Result<()> {
    let schema = schema_for!(Config);
    let mut out = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, &schema)?;
    writeln!(out)?;
    Ok(())
}
