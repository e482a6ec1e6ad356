//! Command dispatch and handlers.

pub mod board;
pub mod column;
pub mod suggest;
pub mod task;
pub mod users;

use std::env;
use std::path::{Path, PathBuf};

use crate::cassette::session::RecordingSession;
use crate::cli::{Command, TaskCommand};
use crate::config::{BoardOptions, GatewayConfig, RECORD_VAR, REPLAY_VAR};
use crate::context::ServiceContext;

/// Dispatch a parsed command to its handler.
///
/// `TASKERIZE_REPLAY=<file>` serves every remote call from a cassette.
/// Otherwise the live services are used, and `TASKERIZE_RECORD=<dir>`
/// additionally records every interaction under that directory.
///
/// # Errors
///
/// Returns an error string if configuration is incomplete or the
/// selected command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    let options = BoardOptions::from_env().map_err(|e| e.to_string())?;

    if let Ok(path) = env::var(REPLAY_VAR) {
        let ctx = ServiceContext::replaying(Path::new(&path))?;
        return execute(command, &ctx, options);
    }

    let config = GatewayConfig::from_env().map_err(|e| e.to_string())?;
    let (ctx, session) = if let Ok(dir) = env::var(RECORD_VAR) {
        let (ctx, session) = ServiceContext::recording_at(&PathBuf::from(dir), &config)?;
        (ctx, Some(session))
    } else {
        (ServiceContext::live(&config), None)
    };

    let result = execute(command, &ctx, options);

    // Finish recording even when the command failed.
    if let Some(session) = session {
        // Drop context first to release Arc references
        drop(ctx);
        finish_recording(session)?;
    }

    result
}

/// Run a command to completion on a single-threaded runtime.
fn execute(command: &Command, ctx: &ServiceContext, options: BoardOptions) -> Result<(), String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to start async runtime: {e}"))?;
    runtime.block_on(dispatch_with_context(command, ctx, options))
}

/// Dispatch a command with the given service context.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub async fn dispatch_with_context(
    command: &Command,
    ctx: &ServiceContext,
    options: BoardOptions,
) -> Result<(), String> {
    match command {
        Command::Board => board::run(ctx, options).await,
        Command::Users => users::run(ctx).await,
        Command::Task(TaskCommand::Add { column, fields }) => {
            task::add(ctx, options, column, fields).await
        }
        Command::Task(TaskCommand::Edit { id, fields, unassign }) => {
            task::edit(ctx, options, id, fields, *unassign).await
        }
        Command::Task(TaskCommand::Delete { id }) => task::delete(ctx, options, id).await,
        Command::Task(TaskCommand::Move { id, to, before }) => {
            task::move_task(ctx, options, id, to.as_deref(), before.as_deref()).await
        }
        Command::Column(command) => column::run(ctx, options, command).await,
        Command::Suggest { id, mode, accept } => {
            suggest::run(ctx, options, id, (*mode).into(), *accept).await
        }
    }
}

/// Finish a recording session and print the output directory.
fn finish_recording(session: RecordingSession) -> Result<(), String> {
    let output_dir = session.finish()?;
    eprintln!("Recording saved to: {}", output_dir.display());
    Ok(())
}
