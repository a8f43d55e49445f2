mod api;
mod app;
mod board;
mod config;
mod input;
mod session;
mod ui;

use std::env;
use std::io::{self, Write};
use std::path::Path;

use clap::{Parser, Subcommand};
use color_eyre::eyre::bail;

use api::ApiClient;
use board::store::BoardStore;
use board::User;
use session::Session;

#[derive(Parser)]
#[command(name = "kanri", about = "A keyboard-first Kanban client")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Log in to the board server and store a session
    Login {
        /// Account email (prompted if omitted)
        email: Option<String>,
    },
    /// Remove the stored session
    Logout,
    /// Show the currently logged-in user
    Whoami,
    /// Accept an invite token and create an account
    AcceptInvite {
        /// Invite token from the board admin
        token: String,
        /// Display name for the new account
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Invite a new user by email (admin only)
    Invite {
        /// Email address to invite
        email: String,
    },
    /// List registered users
    Users,
    /// Print the board to stdout
    List {
        /// Only show tasks assigned to this user
        #[arg(short, long)]
        assignee: Option<String>,
    },
}

fn main() {
    // Install color_eyre for unexpected panics/errors (developer bugs).
    let _ = color_eyre::install();
    let cli = Cli::parse();

    let config_dir = match session::default_config_dir() {
        Some(dir) => dir,
        None => {
            eprintln!("error: cannot determine the user config directory.");
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Command::Login { email }) => cmd_login(&config_dir, email),
        Some(Command::Logout) => cmd_logout(&config_dir),
        Some(Command::Whoami) => cmd_whoami(&config_dir),
        Some(Command::AcceptInvite { token, name }) => {
            cmd_accept_invite(&config_dir, &token, name.as_deref())
        }
        Some(Command::Invite { email }) => cmd_invite(&config_dir, &email),
        Some(Command::Users) => cmd_users(&config_dir),
        Some(Command::List { assignee }) => cmd_list(&config_dir, assignee.as_deref()),
        None => cmd_tui(&config_dir),
    };

    if let Err(e) = result {
        print_user_error(&e);
        std::process::exit(1);
    }
}

/// Print a user-friendly error message, with actionable hints for known error types.
fn print_user_error(error: &color_eyre::Report) {
    // Walk the error chain looking for known types.
    if let Some(api_err) = error.downcast_ref::<api::ApiError>() {
        match api_err {
            api::ApiError::Unauthorized => {
                eprintln!("error: the server rejected your session.");
                eprintln!("  Run `kanri login` to start a new one.");
            }
            api::ApiError::Transport(e) => {
                eprintln!("error: could not reach the board server.");
                eprintln!("  {e}");
                eprintln!("  Check `api_url` in config.toml or the KANRI_API_URL variable.");
            }
            api::ApiError::Status { status, message } => {
                eprintln!("error: server returned {status}: {message}");
            }
        }
        return;
    }

    if let Some(session_err) = error.downcast_ref::<session::SessionError>() {
        match session_err {
            session::SessionError::NotLoggedIn => {
                eprintln!("error: not logged in.");
                eprintln!("  Run `kanri login` first.");
            }
            session::SessionError::Json(e) => {
                eprintln!("error: stored session is corrupt.");
                eprintln!("  {e}");
                eprintln!("  Run `kanri login` to replace it.");
            }
            session::SessionError::Io(e) => {
                eprintln!("error: could not read or write the session file.");
                eprintln!("  {e}");
            }
        }
        return;
    }

    if let Some(config_err) = error.downcast_ref::<config::ConfigError>() {
        match config_err {
            config::ConfigError::Toml(e) => {
                eprintln!("error: config.toml has invalid TOML syntax.");
                eprintln!("  {e}");
            }
            config::ConfigError::Io(e) => {
                eprintln!("error: could not read config.toml.");
                eprintln!("  {e}");
            }
        }
        return;
    }

    // For eyre::eyre!() / bail!() messages, print the full error chain.
    eprintln!("error: {e:#}", e = error);
}

/// Build an API client from config.toml / KANRI_API_URL, with an optional token.
fn build_api(config_dir: &Path, token: Option<String>) -> color_eyre::Result<ApiClient> {
    let config = config::load_config(config_dir)?;
    let url = config::resolve_api_url(env::var("KANRI_API_URL").ok(), &config);
    Ok(ApiClient::new(&url, token)?)
}

fn prompt(label: &str) -> color_eyre::Result<String> {
    print!("{label}");
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

fn cmd_login(config_dir: &Path, email: Option<String>) -> color_eyre::Result<()> {
    let email = match email {
        Some(e) => e,
        None => prompt("Email: ")?,
    };
    if email.is_empty() {
        bail!("Email must not be empty");
    }
    let password = prompt("Password: ")?;

    let api = build_api(config_dir, None)?;
    let auth = api.login(&email, &password)?;

    let session = Session {
        access_token: auth.access_token,
        user: auth.user,
    };
    session::save_session(config_dir, &session)?;

    println!("Logged in as {}.", session.user.label());
    Ok(())
}

fn cmd_logout(config_dir: &Path) -> color_eyre::Result<()> {
    session::clear_session(config_dir)?;
    println!("Logged out.");
    Ok(())
}

fn cmd_whoami(config_dir: &Path) -> color_eyre::Result<()> {
    let session = session::load_session(config_dir)?;
    println!("{}", user_line(&session.user));
    Ok(())
}

fn cmd_accept_invite(
    config_dir: &Path,
    token: &str,
    name: Option<&str>,
) -> color_eyre::Result<()> {
    let password = prompt("Choose a password: ")?;
    if password.is_empty() {
        bail!("Password must not be empty");
    }
    let confirm = prompt("Confirm password: ")?;
    if password != confirm {
        bail!("Passwords do not match");
    }

    let api = build_api(config_dir, None)?;
    let auth = api.accept_invite(token, &password, name)?;

    let session = Session {
        access_token: auth.access_token,
        user: auth.user,
    };
    session::save_session(config_dir, &session)?;

    println!("Welcome, {}! You are now logged in.", session.user.label());
    Ok(())
}

fn cmd_invite(config_dir: &Path, email: &str) -> color_eyre::Result<()> {
    let session = session::load_session(config_dir)?;
    if !session.user.is_admin {
        bail!("Only admins can invite users");
    }
    let api = build_api(config_dir, Some(session.access_token))?;
    let invite = api.create_invite(email)?;

    println!("Invited {}.", invite.email);
    println!("They can join with: kanri accept-invite {}", invite.token);
    Ok(())
}

fn cmd_users(config_dir: &Path) -> color_eyre::Result<()> {
    let session = session::load_session(config_dir)?;
    let api = build_api(config_dir, Some(session.access_token))?;
    let users = api.list_users()?;

    if users.is_empty() {
        println!("No users registered.");
        return Ok(());
    }

    println!("\nUsers ({}):", users.len());
    println!("{}", "─".repeat(50));
    for user in &users {
        println!("  {}", user_line(user));
    }
    println!();
    Ok(())
}

fn cmd_list(config_dir: &Path, assignee: Option<&str>) -> color_eyre::Result<()> {
    let session = session::load_session(config_dir)?;
    let api = build_api(config_dir, Some(session.access_token))?;
    let columns = api.get_board(assignee)?;

    for col in &columns {
        println!("\n{} ({})", col.title, col.tasks.len());
        println!("{}", "─".repeat(40));
        for task in &col.tasks {
            let priority = task
                .priority
                .map(|p| format!(" [{}]", p.as_str()))
                .unwrap_or_default();
            let due = task
                .due_date
                .map(|d| format!(" due {}", d.format("%Y-%m-%d")))
                .unwrap_or_default();
            let assignees = if task.assignees.is_empty() {
                String::new()
            } else {
                let names: Vec<&str> = task.assignees.iter().map(|u| u.label()).collect();
                format!(" @{}", names.join(", @"))
            };
            println!("  {}{priority}{due}{assignees}", task.title);
        }
    }
    println!();
    Ok(())
}

fn cmd_tui(config_dir: &Path) -> color_eyre::Result<()> {
    let session = session::load_session(config_dir)?;
    let api = build_api(config_dir, Some(session.access_token.clone()))?;

    let mut store = BoardStore::new();
    store.load(&api)?;

    let mut terminal = ratatui::init();
    let result = app::run(&mut terminal, &api, &mut store, session);
    ratatui::restore();
    result
}

/// One-line description of a user for `whoami` and `users` output.
fn user_line(user: &User) -> String {
    let role = if user.is_admin { " (admin)" } else { "" };
    match user.name.as_deref() {
        Some(name) => format!("{name} <{}>{role}", user.email),
        None => format!("{}{role}", user.email),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str, name: Option<&str>, admin: bool) -> User {
        User {
            id: "u1".into(),
            email: email.into(),
            name: name.map(String::from),
            is_admin: admin,
        }
    }

    #[test]
    fn user_line_with_name_and_admin() {
        let u = user("alice@example.com", Some("Alice"), true);
        assert_eq!(user_line(&u), "Alice <alice@example.com> (admin)");
    }

    #[test]
    fn user_line_without_name() {
        let u = user("bob@example.com", None, false);
        assert_eq!(user_line(&u), "bob@example.com");
    }

    #[test]
    fn cmd_whoami_without_session_is_not_logged_in() {
        let dir = tempfile::tempdir().unwrap();
        let err = cmd_whoami(dir.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<session::SessionError>(),
            Some(session::SessionError::NotLoggedIn)
        ));
    }

    #[test]
    fn cmd_logout_without_session_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        assert!(cmd_logout(dir.path()).is_ok());
    }
}
