use anyhow::Result;
use clap::error::ErrorKind as ClapErrorKind;
use clap::{Parser, Subcommand};
use is_terminal::IsTerminal;
use minus::Pager;
use std::io::Write;
use twig::areas::repository::Repository;
use twig::artifacts::core::PagerWriter;
use twig::artifacts::core::errors::{RepositoryError, as_repository_error};

#[derive(Parser)]
#[command(
    name = "twig",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A minimal content-addressed version control system",
    long_about = "twig keeps snapshots of a flat working directory in a content-addressed \
    object store, with branches, a staging area, checkouts and three-way merges.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

COMMANDS:
{subcommands}
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository in the current directory"
    )]
    Init,
    #[command(name = "add", about = "Stage a file for the next commit")]
    Add {
        #[arg(index = 1)]
        file: String,
    },
    #[command(name = "commit", about = "Snapshot the staged changes")]
    Commit {
        #[arg(index = 1, help = "The commit message")]
        message: Option<String>,
    },
    #[command(
        name = "rm",
        about = "Unstage a file, or stage a tracked file for removal and delete it"
    )]
    Rm {
        #[arg(index = 1)]
        file: String,
    },
    #[command(name = "log", about = "Show the history of the current branch")]
    Log,
    #[command(name = "global-log", about = "Show every commit ever made")]
    GlobalLog,
    #[command(name = "find", about = "Print the IDs of commits with the given message")]
    Find {
        #[arg(index = 1)]
        message: String,
    },
    #[command(
        name = "checkout",
        about = "Restore a file or switch branches",
        long_about = "checkout -- <file> restores a file from the HEAD commit, \
        checkout <commit> -- <file> restores it from the given commit, \
        checkout <branch> switches to the branch."
    )]
    Checkout {
        #[arg(index = 1, help = "Commit ID or branch name")]
        target: Option<String>,
        #[arg(index = 2, last = true, help = "File to restore")]
        file: Option<String>,
    },
    #[command(name = "branch", about = "Create a branch at the current commit")]
    Branch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(name = "rm-branch", about = "Delete a branch")]
    RmBranch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(
        name = "reset",
        about = "Check out a commit and move the current branch to it"
    )]
    Reset {
        #[arg(index = 1)]
        commit: String,
    },
    #[command(name = "merge", about = "Merge a branch into the current branch")]
    Merge {
        #[arg(index = 1)]
        branch: String,
    },
    #[command(name = "status", about = "Show branches, staged files and working tree changes")]
    Status,
}

impl Commands {
    fn is_paged(&self) -> bool {
        matches!(self, Commands::Log | Commands::GlobalLog)
            && std::io::stdout().is_terminal()
            && std::env::var_os("NO_PAGER").is_none()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => return report_usage_error(error),
    };

    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    match run(cli.command).await {
        Ok(()) => Ok(()),
        Err(error) => match as_repository_error(&error) {
            Some(repository_error) => {
                println!("{repository_error}");
                Ok(())
            }
            None => Err(error),
        },
    }
}

fn report_usage_error(error: clap::Error) -> Result<()> {
    let repository_error = match error.kind() {
        ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion => {
            error.print()?;
            return Ok(());
        }
        ClapErrorKind::InvalidSubcommand => RepositoryError::UnknownCommand,
        ClapErrorKind::MissingSubcommand
        | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => RepositoryError::NoCommand,
        _ => RepositoryError::IncorrectOperands,
    };

    println!("{repository_error}");
    Ok(())
}

async fn run(command: Commands) -> Result<()> {
    let pwd = std::env::current_dir()?;

    let pager = command.is_paged().then(Pager::new);
    let writer: Box<dyn Write> = match &pager {
        Some(pager) => Box::new(PagerWriter::new(pager.clone())),
        None => Box::new(std::io::stdout()),
    };

    let mut repository = Repository::new(&pwd.to_string_lossy(), writer)?;

    match command {
        Commands::Init => repository.init().await?,
        Commands::Add { file } => repository.add(&file).await?,
        Commands::Commit { message } => {
            repository
                .commit(message.as_deref().unwrap_or_default())
                .await?
        }
        Commands::Rm { file } => repository.rm(&file).await?,
        Commands::Log => repository.log().await?,
        Commands::GlobalLog => repository.global_log().await?,
        Commands::Find { message } => repository.find(&message).await?,
        Commands::Checkout { target, file } => match (target, file) {
            (None, Some(file)) => repository.checkout_file(&file).await?,
            (Some(commit), Some(file)) => repository.checkout_commit_file(&commit, &file).await?,
            (Some(branch), None) => repository.checkout_branch(&branch).await?,
            (None, None) => return Err(RepositoryError::IncorrectOperands.into()),
        },
        Commands::Branch { name } => repository.branch(&name).await?,
        Commands::RmBranch { name } => repository.rm_branch(&name).await?,
        Commands::Reset { commit } => repository.reset(&commit).await?,
        Commands::Merge { branch } => repository.merge(&branch).await?,
        Commands::Status => repository.status().await?,
    }

    repository.writer().flush()?;

    if let Some(pager) = pager {
        minus::page_all(pager)?;
    }

    Ok(())
}
