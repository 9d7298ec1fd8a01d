//! pdfbundle - Merge PDFs and images from ZIP archives into one PDF.
//!
//! Each invocation performs one interaction against a directory-backed blob
//! store, loading and saving the session state around it.

mod cli;
mod state;

use clap::Parser;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use pdfbundle::app::{App, Effect};
use pdfbundle::config::Config;
use pdfbundle::error::{PdfBundleError, Result};
use pdfbundle::output::{
    OutputFormatter, display_artifacts, display_candidates, display_extraction_report,
    display_merge_statistics,
};
use pdfbundle::session::SessionContext;
use pdfbundle::store::{BlobKey, FsBlobStore};

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let config = match cli.to_config() {
        Ok(config) => config,
        Err(err) => {
            OutputFormatter::default().report_error(&err);
            process::exit(err.exit_code());
        }
    };
    let formatter = OutputFormatter::from_config(&config);

    // Run the interaction and handle errors
    if let Err(err) = run(&cli.command, &config, &formatter).await {
        formatter.report_error(&err);
        process::exit(err.exit_code());
    }
}

/// Install the log subscriber. `RUST_LOG` overrides the verbosity flags.
fn init_tracing(verbose: bool, quiet: bool) {
    let default_directive = if verbose {
        "pdfbundle=debug,pdfbundle_cli=debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Run one interaction and persist the resulting session.
async fn run(command: &Command, config: &Config, formatter: &OutputFormatter) -> Result<()> {
    let app = App::new(FsBlobStore::new(&config.root), config.layout.clone());
    let ctx = state::load(&config.state_file).await?;

    let ctx = match command {
        Command::Upload { archives } => upload(&app, ctx, archives, config, formatter).await?,
        Command::Candidates => {
            if formatter.is_json() {
                formatter.json(&ctx.candidates);
            } else {
                display_candidates(formatter, &ctx.candidates);
            }
            ctx
        }
        Command::Select { keys } => {
            let keys = resolve_selection(&ctx, keys)?;
            let (ctx, effect) = app.select_files(&ctx, &keys)?;
            report(effect, formatter).await?;
            ctx
        }
        Command::Merge { output } => {
            let (ctx, effect) = app.request_merge(&ctx, output).await?;
            report(effect, formatter).await?;
            ctx
        }
        Command::Files => {
            let (ctx, effect) = app.list_session_files(&ctx).await?;
            report(effect, formatter).await?;
            ctx
        }
        Command::Delete { key } => {
            let key = BlobKey::new(key)?;
            let (ctx, effect) = app.request_delete_file(&ctx, &key).await?;
            report(effect, formatter).await?;
            ctx
        }
        Command::Artifacts => {
            let (ctx, effect) = app.list_artifacts(&ctx).await?;
            report(effect, formatter).await?;
            ctx
        }
        Command::Download { name, to } => {
            let (ctx, effect) = app.open_artifact(&ctx, name).await?;
            if let Effect::Download { name, bytes } = effect {
                let target = to.clone().unwrap_or_else(|| PathBuf::from(&name));
                write_download(&target, &bytes).await?;
                formatter.success(&format!("Saved {name} to {}", target.display()));
            }
            ctx
        }
        Command::Session { reset } => {
            let ctx = if *reset { SessionContext::new() } else { ctx };
            show_session(&app, &ctx, formatter);
            ctx
        }
    };

    state::save(&config.state_file, &ctx).await
}

/// Upload archives one after another, stopping at the first failure.
///
/// The session is saved after every extracted archive, so files from
/// earlier archives stay selectable when a later one fails.
async fn upload(
    app: &App<FsBlobStore>,
    mut ctx: SessionContext,
    archives: &[PathBuf],
    config: &Config,
    formatter: &OutputFormatter,
) -> Result<SessionContext> {
    for archive in archives {
        let name = archive
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                PdfBundleError::invalid_archive(archive.display().to_string(), "not a file")
            })?;
        let bytes = tokio::fs::read(archive).await?;

        formatter.info(&format!("Extracting {name}..."));
        let (next, effect) = app.upload_archive(&ctx, bytes, &name).await?;
        ctx = next;
        state::save(&config.state_file, &ctx).await?;
        report(effect, formatter).await?;
    }
    Ok(ctx)
}

/// Turn selection arguments into keys.
///
/// Plain numbers refer to the 1-based position in the candidate list.
fn resolve_selection(ctx: &SessionContext, args: &[String]) -> Result<Vec<BlobKey>> {
    args.iter()
        .map(|arg| match arg.parse::<usize>() {
            Ok(number) => number
                .checked_sub(1)
                .and_then(|index| ctx.candidates.get(index))
                .map(|candidate| candidate.key.clone())
                .ok_or_else(|| PdfBundleError::UnknownSelection { key: arg.clone() }),
            Err(_) => BlobKey::new(arg),
        })
        .collect()
}

/// Present a handler's effect.
async fn report(effect: Effect, formatter: &OutputFormatter) -> Result<()> {
    match effect {
        Effect::Extracted {
            candidates, report, ..
        } => {
            if formatter.is_json() {
                formatter.json(&serde_json::json!({
                    "report": report,
                    "candidates": candidates,
                }));
            } else {
                display_extraction_report(formatter, &report);
                display_candidates(formatter, &candidates);
            }
        }
        Effect::SelectionUpdated { selection } => {
            if formatter.is_json() {
                formatter.json(&selection);
            } else {
                formatter.success(&format!("Selected {} file(s)", selection.len()));
                display_candidates(formatter, &selection);
            }
        }
        Effect::Merged { result } => {
            if formatter.is_json() {
                formatter.json(&result);
            } else {
                formatter.success(&format!(
                    "Created {} ({})",
                    result.artifact.key,
                    result.artifact.format_size()
                ));
                display_merge_statistics(formatter, &result.statistics);
            }
        }
        Effect::Deleted { key } => {
            formatter.success(&format!("Deleted {key}"));
        }
        Effect::SessionFiles { namespace, files } => {
            if formatter.is_json() {
                formatter.json(&files);
            } else if files.is_empty() {
                formatter.info(&format!("No files directly inside {namespace}"));
            } else {
                for file in &files {
                    formatter.line(file.as_str());
                }
            }
        }
        Effect::Artifacts { artifacts } => {
            if formatter.is_json() {
                formatter.json(&artifacts);
            } else {
                display_artifacts(formatter, &artifacts);
            }
        }
        Effect::Download { name, bytes } => {
            write_download(Path::new(&name), &bytes).await?;
        }
    }
    Ok(())
}

/// Write a downloaded artifact, creating parent directories as needed.
async fn write_download(target: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = target.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(target, bytes).await?;
    Ok(())
}

/// Print the session id, namespace and pending selection.
fn show_session(app: &App<FsBlobStore>, ctx: &SessionContext, formatter: &OutputFormatter) {
    if formatter.is_json() {
        formatter.json(ctx);
        return;
    }

    match &ctx.session_id {
        Some(id) => {
            formatter.info(&format!("Session: {id}"));
            formatter.info(&format!("Folder: {}", app.registry().namespace_for(id)));
        }
        None => formatter.info("No session yet; it starts with the next upload"),
    }
    formatter.info(&format!(
        "{} candidate(s), {} selected",
        ctx.candidates.len(),
        ctx.selection.len()
    ));
    display_candidates(formatter, &ctx.selection);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfbundle::ingest::CandidateFile;
    use std::io::{Cursor, Write};
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    fn write_zip(path: &Path, entries: &[(&str, &str)]) {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, text) in entries {
            writer
                .start_file(name.to_string(), SimpleFileOptions::default())
                .unwrap();
            writer.write_all(text.as_bytes()).unwrap();
        }
        std::fs::write(path, writer.finish().unwrap().into_inner()).unwrap();
    }

    fn config_in(dir: &TempDir) -> Config {
        let mut config = Config::with_root(dir.path().join("store"));
        config.state_file = dir.path().join("state.json");
        config.quiet = true;
        config
    }

    fn ctx_with(keys: &[&str]) -> SessionContext {
        let mut ctx = SessionContext::new();
        ctx.merge_candidates(
            keys.iter()
                .map(|k| CandidateFile::from_key(BlobKey::new(k).unwrap())),
        );
        ctx
    }

    #[test]
    fn test_resolve_selection_by_number_and_key() {
        let ctx = ctx_with(&["u/s/a/1.pdf", "u/s/a/2.png"]);
        let args = vec!["2".to_string(), "u/s/a/1.pdf".to_string(), "2".to_string()];

        let keys = resolve_selection(&ctx, &args).unwrap();
        let keys: Vec<_> = keys.iter().map(BlobKey::as_str).collect();
        assert_eq!(keys, vec!["u/s/a/2.png", "u/s/a/1.pdf", "u/s/a/2.png"]);
    }

    #[test]
    fn test_resolve_selection_out_of_range() {
        let ctx = ctx_with(&["u/s/a/1.pdf"]);
        for arg in ["0", "2"] {
            assert!(matches!(
                resolve_selection(&ctx, &[arg.to_string()]),
                Err(PdfBundleError::UnknownSelection { .. })
            ));
        }
    }

    #[tokio::test]
    async fn test_write_download_creates_parents() {
        let dir = tempfile::TempDir::new().unwrap();
        let target = dir.path().join("out").join("merged.pdf");

        write_download(&target, b"%PDF-1.5").await.unwrap();
        assert_eq!(std::fs::read(&target).unwrap(), b"%PDF-1.5");
    }

    #[tokio::test]
    async fn test_upload_keeps_session_when_later_archive_fails() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        let formatter = OutputFormatter::quiet();

        let good = dir.path().join("good.zip");
        let bad = dir.path().join("bad.zip");
        write_zip(&good, &[("doc.pdf", "%PDF")]);
        std::fs::write(&bad, "not a zip").unwrap();

        let command = Command::Upload {
            archives: vec![good, bad],
        };
        let result = run(&command, &config, &formatter).await;
        assert!(matches!(result, Err(PdfBundleError::InvalidArchive { .. })));

        let ctx = state::load(&config.state_file).await.unwrap();
        assert!(ctx.session_id.is_some());
        assert_eq!(ctx.candidates.len(), 1);
        assert_eq!(ctx.candidates[0].name, "doc.pdf");
    }

    #[tokio::test]
    async fn test_run_persists_selection_between_commands() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        let formatter = OutputFormatter::quiet();

        let archive = dir.path().join("scans.zip");
        write_zip(&archive, &[("a.pdf", "%PDF"), ("b.png", "png")]);

        run(&Command::Upload { archives: vec![archive] }, &config, &formatter)
            .await
            .unwrap();
        run(
            &Command::Select {
                keys: vec!["2".to_string(), "1".to_string()],
            },
            &config,
            &formatter,
        )
        .await
        .unwrap();

        let ctx = state::load(&config.state_file).await.unwrap();
        let selected: Vec<_> = ctx.selection.iter().map(|c| c.key.clone()).collect();
        let expected = vec![ctx.candidates[1].key.clone(), ctx.candidates[0].key.clone()];
        assert_eq!(selected, expected);

        run(&Command::Session { reset: true }, &config, &formatter)
            .await
            .unwrap();
        let ctx = state::load(&config.state_file).await.unwrap();
        assert_eq!(ctx, SessionContext::new());
    }
}
