//! Command-line surface of the console.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use powershare_application::{HttpClient, SessionEvent};
use powershare_domain::ProposalStatus;
use powershare_infrastructure::{AppConfig, DocumentSaver};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::debug;

use crate::{Console, render};

#[derive(Parser, Debug)]
#[command(
    name = "powershare",
    version,
    about = "PowerShare producer registration review console"
)]
pub struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Console commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and keep the session for later commands.
    Login {
        /// Reviewer e-mail.
        #[arg(long)]
        email: String,
        /// Reviewer password.
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session.
    Logout,
    /// Show whether a session is stored.
    Status,
    /// List proposals of one status, newest first.
    List {
        /// pending, approved or rejected.
        #[arg(long, default_value = "pending")]
        status: ProposalStatus,
        /// Keep only proposals whose name or e-mail contains this text.
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Show a producer's registration details and documents.
    Show {
        /// Producer user id.
        user_id: String,
    },
    /// Approve a pending proposal.
    Approve {
        /// Producer user id.
        user_id: String,
    },
    /// Reject a pending proposal.
    Reject {
        /// Producer user id.
        user_id: String,
        /// Why the registration is rejected (at least 5 characters).
        #[arg(long)]
        reason: String,
    },
    /// Move an approved or rejected proposal back to pending.
    Reopen {
        /// Producer user id.
        user_id: String,
    },
    /// Download a producer document.
    Download {
        /// Document URL, as listed by `show`.
        url: String,
        /// File name, usually the document type.
        #[arg(long)]
        name: String,
        /// Target directory (default: configured download directory).
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
    },
}

/// Runs one command and returns what it prints on success.
///
/// # Errors
///
/// Returns the command's failure with context for the user.
pub async fn execute<C: HttpClient>(
    command: Commands,
    console: &Console<C>,
    config: &AppConfig,
) -> Result<String> {
    match command {
        Commands::Login { email, password } => {
            console
                .session()
                .login(&email, &password)
                .await
                .context("login failed")?;
            Ok(format!("Logged in as {}.\n", email.trim()))
        }
        Commands::Logout => {
            console.session().logout().await;
            Ok("Logged out.\n".to_string())
        }
        Commands::Status => {
            let state = if console.session().is_authenticated().await {
                "authenticated"
            } else {
                "not authenticated"
            };
            let location = config
                .session_path()
                .map_or_else(|| "memory only".to_string(), |p| p.display().to_string());
            Ok(format!("Session: {state} ({location})\n"))
        }
        Commands::List { status, search } => {
            let workflow = console.workflow();
            workflow
                .load_proposals(status)
                .await
                .context("could not load proposals")?;
            Ok(render::proposal_list(status, &workflow.visible(&search)))
        }
        Commands::Show { user_id } => {
            let view = console.open_detail(&user_id);
            let Some(detail) = view
                .load()
                .await
                .with_context(|| format!("could not load producer {user_id}"))?
            else {
                bail!("detail view for {user_id} was closed");
            };
            Ok(render::producer_detail(&detail))
        }
        Commands::Approve { user_id } => {
            console
                .workflow()
                .approve(&user_id)
                .await
                .with_context(|| format!("could not approve {user_id}"))?;
            Ok(format!("Proposal {user_id} approved.\n"))
        }
        Commands::Reject { user_id, reason } => {
            console
                .workflow()
                .reject(&user_id, &reason)
                .await
                .with_context(|| format!("could not reject {user_id}"))?;
            Ok(format!("Proposal {user_id} rejected.\n"))
        }
        Commands::Reopen { user_id } => {
            console
                .workflow()
                .reopen(&user_id)
                .await
                .with_context(|| format!("could not reopen {user_id}"))?;
            Ok(format!("Proposal {user_id} reopened.\n"))
        }
        Commands::Download { url, name, out } => {
            let document = console
                .registry()
                .download(&url)
                .await
                .context("could not download the document")?;
            let saver = DocumentSaver::new(out.unwrap_or_else(|| config.download_path()));
            let path = saver.save(&name, &document).await?;
            Ok(format!("Saved {}\n", path.display()))
        }
    }
}

/// Prints a re-login hint to `out` for every invalidated session, until
/// the channel closes or `out` fails. Returns `out`.
pub async fn report_session_events<W: Write>(
    mut events: broadcast::Receiver<SessionEvent>,
    mut out: W,
) -> W {
    loop {
        match events.recv().await {
            Ok(SessionEvent::Invalidated { reason }) => {
                if let Err(e) = writeln!(
                    out,
                    "Session expired ({reason}). Log in again with `powershare login`."
                ) {
                    debug!(error = %e, "session notices stopped");
                    return out;
                }
            }
            Ok(_) | Err(RecvError::Lagged(_)) => {}
            Err(RecvError::Closed) => return out,
        }
    }
}
