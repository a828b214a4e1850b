//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use tdx_core::config::{self, paths};
use tdx_core::guard::{self, Guarded, Route};
use tdx_core::session::SessionStore;
use tdx_core::todos::Filter;

use self::commands::todos::StatusChange;

mod commands;

#[derive(Parser)]
#[command(name = "tdx")]
#[command(version = "0.1")]
#[command(about = "Terminal client for a remote todo list")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Open a route by path (e.g. /todos, /login)
    Open {
        #[arg(value_name = "PATH")]
        path: String,
    },
    /// Create an account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "TDX_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Log in and store the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "TDX_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Log out (remove the stored session)
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Manage todos
    Todos {
        #[command(subcommand)]
        command: Option<TodoCommands>,

        /// Which todos to show (before or after `list`)
        #[arg(long, value_enum, global = true, default_value_t = FilterArg::All)]
        filter: FilterArg,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum TodoCommands {
    /// List todos
    List,
    /// Add a todo
    Add {
        /// Todo text (words are joined with spaces)
        #[arg(value_name = "TEXT", required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Mark a todo as done
    Done {
        #[arg(value_name = "ID")]
        id: String,
    },
    /// Mark a todo as not done
    Undo {
        #[arg(value_name = "ID")]
        id: String,
    },
    /// Flip a todo's done flag
    Toggle {
        #[arg(value_name = "ID")]
        id: String,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Print the effective configuration
    Show,
    /// Set the backend base URL
    SetBaseUrl {
        #[arg(value_name = "URL")]
        url: String,
    },
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum FilterArg {
    All,
    Done,
    Pending,
}

impl From<FilterArg> for Filter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::All => Filter::All,
            FilterArg::Done => Filter::Done,
            FilterArg::Pending => Filter::Pending,
        }
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = tdx_core::logging::init(&paths::logs_dir());

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let config = config::Config::load().context("load config")?;
    let mut store = SessionStore::open(SessionStore::default_path()).context("load session")?;

    // default to the wildcard route
    let Some(command) = cli.command else {
        let ctx = commands::Context::new(&config)?;
        return open(&ctx, &store, "/").await;
    };

    match command {
        Commands::Open { path } => {
            let ctx = commands::Context::new(&config)?;
            open(&ctx, &store, &path).await
        }
        Commands::Register {
            name,
            email,
            password,
        } => {
            let ctx = commands::Context::new(&config)?;
            commands::auth::register(&ctx, &name, &email, &password).await
        }
        Commands::Login { email, password } => {
            let ctx = commands::Context::new(&config)?;
            commands::auth::login(&ctx, &mut store, &email, &password).await
        }
        Commands::Logout => commands::auth::logout(&mut store),
        Commands::Whoami => commands::auth::whoami(&store),

        Commands::Todos { command, filter } => {
            let Guarded::Render(_) = guard::guard(Route::Todos, store.get()) else {
                anyhow::bail!("{}", commands::LOGIN_HINT);
            };
            let session = store.get().context("no session")?;
            let ctx = commands::Context::new(&config)?;
            let client = ctx.todo_client(session);
            match command {
                None | Some(TodoCommands::List) => {
                    commands::todos::list(&client, filter.into()).await
                }
                Some(TodoCommands::Add { text }) => {
                    commands::todos::add(&client, &text.join(" ")).await
                }
                Some(TodoCommands::Done { id }) => {
                    commands::todos::set_status(&client, &id, StatusChange::Done).await
                }
                Some(TodoCommands::Undo { id }) => {
                    commands::todos::set_status(&client, &id, StatusChange::Undo).await
                }
                Some(TodoCommands::Toggle { id }) => {
                    commands::todos::set_status(&client, &id, StatusChange::Toggle).await
                }
            }
        }

        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
            ConfigCommands::Show => commands::config::show(&config),
            ConfigCommands::SetBaseUrl { url } => commands::config::set_base_url(&url),
        },
    }
}

/// Resolves `path` through the route guard and renders the result.
async fn open(ctx: &commands::Context<'_>, store: &SessionStore, path: &str) -> Result<()> {
    match guard::navigate(path, store.get()) {
        Guarded::Redirect(to) => {
            tracing::debug!(from = path, to = %to, "redirected by route guard");
            anyhow::bail!("{}", commands::LOGIN_HINT)
        }
        Guarded::Render(Route::Login) => {
            commands::auth::login_prompt();
            Ok(())
        }
        Guarded::Render(Route::Register) => {
            commands::auth::register_prompt();
            Ok(())
        }
        Guarded::Render(Route::Todos) => {
            let session = store.get().context("no session")?;
            commands::todos::list(&ctx.todo_client(session), Filter::All).await
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_add_joins_words() {
        let cli = Cli::parse_from(["tdx", "todos", "add", "buy", "oat", "milk"]);
        let Some(Commands::Todos {
            command: Some(TodoCommands::Add { text }),
            ..
        }) = cli.command
        else {
            panic!("expected todos add");
        };
        assert_eq!(text.join(" "), "buy oat milk");
    }

    fn parsed_filter(args: &[&str]) -> FilterArg {
        let Some(Commands::Todos { filter, .. }) = Cli::parse_from(args).command else {
            panic!("expected todos");
        };
        filter
    }

    #[test]
    fn test_filter_is_honored_on_either_side_of_list() {
        assert_eq!(
            parsed_filter(&["tdx", "todos", "--filter", "done", "list"]),
            FilterArg::Done
        );
        assert_eq!(
            parsed_filter(&["tdx", "todos", "list", "--filter", "pending"]),
            FilterArg::Pending
        );
        assert_eq!(parsed_filter(&["tdx", "todos", "--filter", "done"]), FilterArg::Done);
        assert_eq!(parsed_filter(&["tdx", "todos", "list"]), FilterArg::All);
    }

    #[test]
    fn test_unknown_filter_is_rejected() {
        assert!(Cli::try_parse_from(["tdx", "todos", "list", "--filter", "someday"]).is_err());
    }
}
