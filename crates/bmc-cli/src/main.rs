//! `bmc`: draft, view and version Business Model Canvases from the terminal

#![warn(unreachable_pub)]

mod render;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use bmc_canvas::{CanvasField, VersionIdPolicy};
use bmc_client::{HttpBackend, IdeaId};
use bmc_core::{AppConfig, CoreError, FileStore, Session, VersionReconciler};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::render::{CanvasView, DashboardView, DraftView, IdeasView, VersionsView};

type Backend = Arc<HttpBackend>;
type Store = Arc<FileStore>;

fn cli() -> Command {
    Command::new("bmc")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Draft, view and version Business Model Canvases")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("api-url")
                .long("api-url")
                .global(true)
                .help("Backend base URL"),
        )
        .arg(
            Arg::new("state")
                .long("state")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Local state file"),
        )
        .arg(
            Arg::new("version-policy")
                .long("version-policy")
                .global(true)
                .value_parser(["reuse-parent", "mint"])
                .help("How saved versions get their identifier"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("More log output on stderr (-v debug, -vv trace)"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(
            Command::new("login")
                .about("Log in and remember the user")
                .arg(Arg::new("email").long("email").required(true))
                .arg(Arg::new("password").long("password").required(true)),
        )
        .subcommand(
            Command::new("signup")
                .about("Create an account")
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("email").long("email").required(true))
                .arg(Arg::new("password").long("password").required(true))
                .arg(
                    Arg::new("confirm")
                        .long("confirm")
                        .required(true)
                        .help("Password again"),
                ),
        )
        .subcommand(Command::new("logout").about("Forget user, idea, draft and versions"))
        .subcommand(Command::new("ideas").about("List your ideas"))
        .subcommand(
            Command::new("select")
                .about("Make an idea the active one")
                .arg(Arg::new("id").required(true)),
        )
        .subcommand(Command::new("new").about("Forget the active idea"))
        .subcommand(
            Command::new("submit")
                .about("Submit a new business idea")
                .arg(
                    Arg::new("text")
                        .required(true)
                        .num_args(1..)
                        .help("Idea text (at most 500 characters)"),
                ),
        )
        .subcommand(Command::new("canvas").about("Show the canvas of the active idea"))
        .subcommand(Command::new("dashboard").about("Show idea, reports and canvas"))
        .subcommand(Command::new("draft").about("Show the local draft"))
        .subcommand(
            Command::new("edit")
                .about("Replace one section of the draft")
                .arg(
                    Arg::new("field")
                        .required(true)
                        .value_parser(value_parser!(CanvasField))
                        .help("Section, e.g. keyPartners or cost_structure"),
                )
                .arg(
                    Arg::new("lines")
                        .num_args(0..)
                        .help("One value per entry; none clears the section"),
                ),
        )
        .subcommand(Command::new("history").about("Reload versions from the backend and list them"))
        .subcommand(Command::new("save").about("Save the draft as a new version"))
        .subcommand(
            Command::new("load")
                .about("Replace the draft with a saved version")
                .arg(Arg::new("index").required(true).value_parser(value_parser!(usize))),
        )
        .subcommand(
            Command::new("delete")
                .about("Remove a version from the local list")
                .arg(Arg::new("index").required(true).value_parser(value_parser!(usize))),
        )
        .subcommand(Command::new("reset").about("Empty every section of the draft"))
}

fn init_tracing(matches: &ArgMatches) {
    let default_level = match matches.get_count("verbose") {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if matches.get_flag("log-json") {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(matches: &ArgMatches) -> Result<AppConfig> {
    let mut config = AppConfig::load(matches.get_one::<PathBuf>("config").map(PathBuf::as_path))?;
    if let Some(url) = matches.get_one::<String>("api-url") {
        config = config.with_base_url(url.clone());
    }
    if let Some(path) = matches.get_one::<PathBuf>("state") {
        config = config.with_state_path(path.clone());
    }
    if let Some(policy) = matches.get_one::<String>("version-policy") {
        let policy: VersionIdPolicy = policy.parse().map_err(anyhow::Error::msg)?;
        config = config.with_version_policy(policy);
    }
    debug!(?config, "resolved configuration");
    Ok(config)
}

struct App {
    session: Session<Backend, Store>,
    reconciler: VersionReconciler<Backend, Store>,
}

impl App {
    fn open(config: &AppConfig) -> Result<Self> {
        let backend = Arc::new(HttpBackend::new(&config.api)?);
        let store = Arc::new(
            FileStore::open(&config.state_path)
                .with_context(|| format!("cannot open state file {}", config.state_path.display()))?,
        );
        let reconciler = VersionReconciler::new(Arc::clone(&backend), Arc::clone(&store))
            .with_policy(config.version_id_policy);
        Ok(Self {
            session: Session::new(backend, store),
            reconciler,
        })
    }

    async fn run(&mut self, matches: &ArgMatches) -> Result<()> {
        match matches.subcommand() {
            Some(("login", args)) => {
                let user = self
                    .session
                    .login(required(args, "email")?, required(args, "password")?)
                    .await?;
                println!("Logged in as {user}.");
            }
            Some(("signup", args)) => {
                let user = self
                    .session
                    .signup(
                        required(args, "name")?,
                        required(args, "email")?,
                        required(args, "password")?,
                        required(args, "confirm")?,
                    )
                    .await?;
                println!("Signed up as {user}.");
            }
            Some(("logout", _)) => {
                self.session.logout()?;
                println!("Logged out.");
            }
            Some(("ideas", _)) => {
                let ideas = self.session.list_ideas().await?;
                let active = self.session.idea_id()?;
                print!(
                    "{}",
                    IdeasView {
                        ideas: &ideas,
                        active: active.as_ref(),
                    }
                );
            }
            Some(("select", args)) => {
                let id = IdeaId::new(required(args, "id")?);
                self.session.select_idea(&id)?;
                println!("Active idea: {id}");
            }
            Some(("new", _)) => {
                self.session.start_new_idea()?;
                println!("No active idea. Submit one with `bmc submit`.");
            }
            Some(("submit", args)) => {
                let text = args
                    .get_many::<String>("text")
                    .map(|words| words.cloned().collect::<Vec<_>>().join(" "))
                    .unwrap_or_default();
                let id = self.session.submit_idea(&text).await?;
                println!("Submitted idea {id}; it is now the active idea.");
            }
            Some(("canvas", _)) => {
                let overview = self.session.overview().await?;
                print!("{}", CanvasView(&overview));
            }
            Some(("dashboard", _)) => {
                let overview = self.session.overview().await?;
                print!("{}", DashboardView(&overview));
            }
            Some(("draft", _)) => {
                self.reconciler.restore_local()?;
                print!("{}", DraftView(self.reconciler.draft()));
            }
            Some(("edit", args)) => {
                let field = *args
                    .get_one::<CanvasField>("field")
                    .context("missing section name")?;
                let text = args
                    .get_many::<String>("lines")
                    .map(|lines| lines.cloned().collect::<Vec<_>>().join("\n"))
                    .unwrap_or_default();
                self.reconciler.restore_local()?;
                self.reconciler.set_field(field, text);
                self.reconciler.persist_draft()?;
                println!("Updated {}.", field.label());
            }
            Some(("history", _)) => {
                self.reconciler.refresh().await?;
                print!("{}", VersionsView(self.reconciler.versions()));
            }
            Some(("save", _)) => {
                self.reconciler.restore_local()?;
                let saved = self.reconciler.save_version().await?;
                match saved.version_id {
                    Some(id) => println!("Saved version {id}."),
                    None => println!("Saved first version."),
                }
            }
            Some(("load", args)) => {
                let index = index_arg(args)?;
                self.reconciler.restore_local()?;
                self.reconciler.load_version(index)?;
                println!("Loaded version [{index}] into the draft.");
            }
            Some(("delete", args)) => {
                let index = index_arg(args)?;
                self.reconciler.restore_local()?;
                let removed = self.reconciler.delete_version(index)?;
                println!(
                    "Removed version {} from the local list.",
                    removed.version_id.as_deref().unwrap_or("-")
                );
            }
            Some(("reset", _)) => {
                self.reconciler.restore_local()?;
                self.reconciler.reset_draft()?;
                println!("Draft cleared.");
            }
            _ => unreachable!("subcommand is required"),
        }
        Ok(())
    }
}

fn required<'a>(args: &'a ArgMatches, name: &str) -> Result<&'a str> {
    args.get_one::<String>(name)
        .map(String::as_str)
        .with_context(|| format!("missing --{name}"))
}

fn index_arg(args: &ArgMatches) -> Result<usize> {
    args.get_one::<usize>("index")
        .copied()
        .context("missing version index")
}

/// Message printed for a failed command
fn user_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<CoreError>() {
        Some(core) => core.user_message(),
        None => format!("{err:#}"),
    }
}

async fn run(matches: &ArgMatches) -> Result<()> {
    let config = load_config(matches)?;
    let mut app = App::open(&config)?;
    app.run(matches).await
}

#[tokio::main]
async fn main() -> ExitCode {
    let matches = cli().get_matches();
    init_tracing(&matches);

    match run(&matches).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", user_message(&err));
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_tree_is_valid() {
        cli().debug_assert();
    }

    #[test]
    fn edit_parses_field_and_lines() {
        let matches = cli()
            .try_get_matches_from(["bmc", "edit", "key_partners", "Supplier", "Bank"])
            .unwrap();
        let (name, args) = matches.subcommand().unwrap();
        assert_eq!(name, "edit");
        assert_eq!(
            args.get_one::<CanvasField>("field"),
            Some(&CanvasField::KeyPartners)
        );
        let lines: Vec<_> = args.get_many::<String>("lines").unwrap().collect();
        assert_eq!(lines, ["Supplier", "Bank"]);
    }

    #[test]
    fn global_flags_apply_after_subcommand() {
        let matches = cli()
            .try_get_matches_from([
                "bmc",
                "save",
                "--version-policy",
                "mint",
                "--api-url",
                "http://backend:9000",
            ])
            .unwrap();
        let config = load_config(&matches).unwrap();
        assert_eq!(config.version_id_policy, VersionIdPolicy::Mint);
        assert_eq!(config.api.base_url, "http://backend:9000");
    }

    #[test]
    fn unknown_field_is_rejected() {
        assert!(cli()
            .try_get_matches_from(["bmc", "edit", "mission", "x"])
            .is_err());
    }

    #[test]
    fn core_errors_print_their_user_message() {
        let err = anyhow::Error::from(CoreError::validation("User not logged in."));
        assert_eq!(user_message(&err), "User not logged in.");
    }
}
