//! Command-line entry point for dictionary operations.
//!
//! # Responsibility
//! - Wire `CoreConfig`, logging, SQLite storage and `DictionaryService`.
//! - Print service responses as JSON; errors go to stderr with exit code 1.
//!
//! Settings come from `ADDDICT_*` environment variables. Every command
//! except `ping` needs a database file, given by `--db` or
//! `ADDDICT_DB_PATH`.

use adddict_core::config::ENV_DB_PATH;
use adddict_core::db::open_db;
use adddict_core::{
    core_version, init_from_config, ping, sqlite_dictionary_service, CoreConfig,
    CreateDictionaryRequest, DictionaryId, GetDictionaryRequest, GetUserDictionariesRequest,
    GetUserSubscribedDictionariesRequest, SqliteDictionaryService, SubscribeDictionaryRequest,
    UpdateDictionaryRequest, UserId,
};
use clap::{Args, Parser, Subcommand};
use log::error;
use serde::Serialize;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

type CliResult<T> = Result<T, Box<dyn Error>>;

#[derive(Parser)]
#[command(name = "adddict_cli")]
#[command(version)]
#[command(about = "Manage user-owned dictionaries stored in SQLite")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// SQLite database file (overrides ADDDICT_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Check that the core library responds
    Ping,

    /// Create a dictionary
    Create {
        author_id: UserId,
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// Make the dictionary readable by everyone
        #[arg(long)]
        public: bool,
    },

    /// Show one dictionary
    Get {
        dictionary_id: DictionaryId,
        requester_id: UserId,
    },

    /// Change name, description or visibility of an owned dictionary
    Update {
        dictionary_id: DictionaryId,
        requester_id: UserId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[command(flatten)]
        visibility: Visibility,
    },

    /// Delete an owned dictionary
    Delete {
        dictionary_id: DictionaryId,
        user_id: UserId,
    },

    /// List a user's dictionaries as seen by the requester
    List {
        user_id: UserId,
        requester_id: UserId,
        #[arg(default_value_t = 0)]
        page: u32,
    },

    /// Subscribe a user to a readable dictionary
    Subscribe(Subscription),

    /// Remove a subscription
    Unsubscribe(Subscription),

    /// List the dictionaries a user is subscribed to
    Subscribed {
        user_id: UserId,
        #[arg(default_value_t = 0)]
        page: u32,
    },
}

#[derive(Args)]
#[group(multiple = false)]
struct Visibility {
    #[arg(long)]
    public: bool,
    #[arg(long)]
    private: bool,
}

impl Visibility {
    fn requested(&self) -> Option<bool> {
        match (self.public, self.private) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

#[derive(Args)]
struct Subscription {
    dictionary_id: DictionaryId,
    user_id: UserId,
}

impl From<Subscription> for SubscribeDictionaryRequest {
    fn from(value: Subscription) -> Self {
        Self {
            dictionary_id: value.dictionary_id,
            user_id: value.user_id,
        }
    }
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_command module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    if let Command::Ping = cli.command {
        println!("adddict_core ping={} version={}", ping(), core_version());
        return Ok(());
    }

    let config = CoreConfig::from_env()?;
    init_from_config(&config)?;
    let db_path = resolve_db_path(cli.db, &config)?;
    let mut conn = open_db(&db_path)?;
    let mut service = sqlite_dictionary_service(&mut conn, &config)?;
    execute(&mut service, cli.command)
}

fn execute(service: &mut SqliteDictionaryService<'_>, command: Command) -> CliResult<()> {
    match command {
        Command::Ping => Ok(()),
        Command::Create {
            author_id,
            name,
            description,
            public,
        } => print_json(&service.create(&CreateDictionaryRequest {
            author_id,
            name,
            description,
            is_public: public,
        })?),
        Command::Get {
            dictionary_id,
            requester_id,
        } => print_json(&service.get(&GetDictionaryRequest {
            id: dictionary_id,
            request_sender_id: requester_id,
        })?),
        Command::Update {
            dictionary_id,
            requester_id,
            name,
            description,
            visibility,
        } => {
            let request = UpdateDictionaryRequest {
                request_sender_id: requester_id,
                name,
                description,
                is_public: visibility.requested(),
            };
            print_json(&service.update(dictionary_id, &request)?)
        }
        Command::Delete {
            dictionary_id,
            user_id,
        } => print_json(&service.delete(dictionary_id, user_id)?),
        Command::List {
            user_id,
            requester_id,
            page,
        } => print_json(&service.list_owned_or_public(&GetUserDictionariesRequest {
            user_id,
            request_sender_id: requester_id,
            page,
        })?),
        Command::Subscribe(subscription) => {
            print_json(&service.subscribe(&subscription.into())?)
        }
        Command::Unsubscribe(subscription) => {
            print_json(&service.unsubscribe(&subscription.into())?)
        }
        Command::Subscribed { user_id, page } => print_json(
            &service.list_subscribed(&GetUserSubscribedDictionariesRequest { user_id, page })?,
        ),
    }
}

/// `--db` wins over the configured path; one of them must be present.
fn resolve_db_path(flag: Option<PathBuf>, config: &CoreConfig) -> CliResult<PathBuf> {
    flag.or_else(|| config.db_path.clone()).ok_or_else(|| {
        format!("no database file given; pass --db <path> or set {ENV_DB_PATH}").into()
    })
}

fn print_json(value: &impl Serialize) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
