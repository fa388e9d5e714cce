//! `offle`: command-line front end for the Offle Assistant.

use anyhow::bail;
use clap::{Parser, Subcommand};
use offle_app::{App, AuthMode, ChatView};
use offle_client::{decode_claims, ClientConfig};
use offle_core::{ChatMessage, Role};
use offle_session::Route;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "offle", about = "Offle Assistant client")]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "offle.toml")]
    config: PathBuf,

    /// Backend URL (overrides config and environment)
    #[arg(long)]
    base_url: Option<String>,

    /// Directory holding the session file (overrides config and environment)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session
    Login {
        email: String,
        /// Prompted for when omitted
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Create an account and sign in
    Register {
        email: String,
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Print the navigation bar
    Nav,
    /// Manage personas
    Personas {
        #[command(subcommand)]
        action: PersonaAction,
    },
    /// Chat with a persona
    Chat {
        persona_id: String,
        /// Send one message and exit instead of starting a session
        #[arg(short, long)]
        message: Option<String>,
    },
    /// Print one stored conversation
    History { id: String },
    /// User management (admins only)
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum PersonaAction {
    /// List owned personas
    List,
    /// Show one persona
    Show { id: String },
    /// Create a persona
    Create {
        name: String,
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Update a persona's name and/or description
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// List all users
    Users,
    /// Change a user's role (admin, builder or user)
    Role { id: String, role: String },
    /// Delete a user
    Delete { id: String },
}

type StdinLines = Lines<BufReader<Stdin>>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // defaults < file < env < flags
    let mut config = ClientConfig::load(&cli.config).await?.apply_env();
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    debug!(base_url = %config.base_url, data_dir = %config.data_dir.display(), "Config resolved");

    let app = App::open(config).await?;
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    match cli.command {
        Commands::Login { email, password } => {
            authenticate(&app, AuthMode::Login, email, password, &mut stdin).await?;
        }
        Commands::Register { email, password } => {
            authenticate(&app, AuthMode::Register, email, password, &mut stdin).await?;
        }
        Commands::Logout => {
            app.session().logout().await?;
            println!("Logged out.");
        }
        Commands::Whoami => {
            require(&app, Route::Personas)?;
            let profile = app.client().me().await?;
            println!("{} <{}>", profile.username, profile.email);
            println!("  id:       {}", profile.user_id);
            println!("  role:     {}", profile.role);
            println!("  personas: {}", profile.personas.len());
            if let Some(expires) = app
                .session()
                .token()
                .and_then(|t| decode_claims(&t).ok())
                .and_then(|c| c.expires_at())
            {
                println!("  expires:  {}", expires.to_rfc3339());
            }
        }
        Commands::Nav => {
            println!("{}", app.nav_shell().render());
        }
        Commands::Personas { action } => {
            require(&app, Route::Personas)?;
            personas(&app, action).await?;
        }
        Commands::Chat {
            persona_id,
            message,
        } => {
            require(&app, Route::Chat)?;
            let mut view = app.chat_view();
            view.refresh_personas().await?;
            view.select_by_id(&persona_id).await?;
            match message {
                Some(message) => {
                    if let Some(exchange) = view.send(&message).await? {
                        print_message(&exchange.assistant);
                    }
                }
                None => chat_loop(&mut view, &mut stdin).await?,
            }
        }
        Commands::History { id } => {
            require(&app, Route::Chat)?;
            let history = app.client().message_history(&id).await?;
            println!("{}", history.title.as_deref().unwrap_or(&history.id));
            for message in &history.messages {
                print_message(message);
            }
        }
        Commands::Admin { action } => {
            require(&app, Route::Admin)?;
            admin(&app, action).await?;
        }
    }

    Ok(())
}

/// Passes the auth gate for `route` or explains why not.
fn require(app: &App, route: Route) -> anyhow::Result<()> {
    match app.open_route(route) {
        reached if reached == route => Ok(()),
        Route::Login => bail!("Not logged in. Run `offle login <email>` first."),
        _ => bail!("This command needs the admin role."),
    }
}

async fn authenticate(
    app: &App,
    mode: AuthMode,
    email: String,
    password: Option<String>,
    stdin: &mut StdinLines,
) -> anyhow::Result<()> {
    let mut form = app.auth_form(mode);
    form.email = email;
    form.password = match password {
        Some(password) => password,
        None => prompt("Password: ", stdin).await?,
    };

    let state = form.submit().await?;
    match state.role() {
        Some(role) => println!("{} succeeded ({role}).", mode.submit_label()),
        None => println!("{} succeeded.", mode.submit_label()),
    }
    Ok(())
}

async fn personas(app: &App, action: PersonaAction) -> anyhow::Result<()> {
    let mut view = app.persona_view();
    match action {
        PersonaAction::List => {
            view.refresh().await?;
            if view.personas().is_empty() {
                println!("No personas yet. Create one with `offle personas create <name>`.");
            }
            for persona in view.personas() {
                println!("{}  {}", persona.id, persona.name);
            }
        }
        PersonaAction::Show { id } => {
            let persona = view.select(&id).await?;
            println!("{}", persona.name);
            println!("  {}", persona.description_or_placeholder());
            if let Some(model) = &persona.model {
                println!("  model:       {model}");
            }
            if let Some(temperature) = persona.temperature {
                println!("  temperature: {temperature}");
            }
            if let Some(prompt) = &persona.system_prompt {
                println!("  prompt:      {prompt}");
            }
        }
        PersonaAction::Create { name, description } => {
            view.draft.name = name;
            view.draft.description = description;
            let created = view.create().await?;
            println!(
                "{}",
                created.message.as_deref().unwrap_or("Persona created")
            );
            if let Some(id) = created.persona_id {
                println!("  id: {id}");
            }
        }
        PersonaAction::Update {
            id,
            name,
            description,
        } => {
            if name.is_none() && description.is_none() {
                bail!("Nothing to update: pass --name and/or --description.");
            }
            view.begin_edit(&id).await?;
            if let Some(draft) = view.edit_draft_mut() {
                if let Some(name) = name {
                    draft.name = name;
                }
                if let Some(description) = description {
                    draft.description = description;
                }
            }
            println!("{}", view.save_edit().await?);
        }
    }
    Ok(())
}

async fn admin(app: &App, action: AdminAction) -> anyhow::Result<()> {
    let mut view = app.admin_view();
    match action {
        AdminAction::Users => {
            view.refresh().await?;
            for user in view.users() {
                println!(
                    "{}  {:<20} {:<30} {}",
                    user.id, user.username, user.email, user.role
                );
            }
        }
        AdminAction::Role { id, role } => {
            let role: Role = role.parse()?;
            println!("{}", view.change_role(&id, role).await?);
        }
        AdminAction::Delete { id } => {
            println!("{}", view.delete(&id).await?);
        }
    }
    Ok(())
}

async fn chat_loop(view: &mut ChatView, stdin: &mut StdinLines) -> anyhow::Result<()> {
    if let Some(persona) = view.selected() {
        println!("Chatting with {}. /history reprints, /quit leaves.", persona.name);
    }
    for message in view.messages() {
        print_message(message);
    }

    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = stdin.next_line().await? else {
            break;
        };

        match line.trim() {
            "/quit" => break,
            "/history" => {
                for message in view.messages() {
                    print_message(message);
                }
            }
            _ => {
                view.draft = line;
                match view.send_draft().await {
                    Ok(Some(exchange)) => print_message(&exchange.assistant),
                    Ok(None) => {}
                    Err(e) if e.is_unauthorized() => return Err(e.into()),
                    Err(e) => eprintln!("error: {e}"),
                }
            }
        }
    }
    Ok(())
}

async fn prompt(label: &str, stdin: &mut StdinLines) -> anyhow::Result<String> {
    eprint!("{label}");
    std::io::stderr().flush()?;
    match stdin.next_line().await? {
        Some(line) => Ok(line.trim_end_matches(['\r', '\n']).to_string()),
        None => bail!("no input"),
    }
}

fn print_message(message: &ChatMessage) {
    match message.timestamp {
        Some(ts) => println!(
            "[{}] {}: {}",
            ts.format("%Y-%m-%d %H:%M"),
            message.role.label(),
            message.content
        ),
        None => println!("{}: {}", message.role.label(), message.content),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_commands() {
        let cli = Cli::try_parse_from([
            "offle",
            "--base-url",
            "http://api:8000",
            "personas",
            "update",
            "p1",
            "--name",
            "Ada",
        ])
        .unwrap();
        assert_eq!(cli.base_url.as_deref(), Some("http://api:8000"));
        match cli.command {
            Commands::Personas {
                action:
                    PersonaAction::Update {
                        id,
                        name,
                        description,
                    },
            } => {
                assert_eq!(id, "p1");
                assert_eq!(name.as_deref(), Some("Ada"));
                assert!(description.is_none());
            }
            _ => panic!("wrong command"),
        }
    }

    #[test]
    fn test_chat_one_shot_flag() {
        let cli = Cli::try_parse_from(["offle", "chat", "p1", "-m", "hello"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("offle.toml"));
        assert!(matches!(
            cli.command,
            Commands::Chat { message: Some(ref m), .. } if m == "hello"
        ));
    }

    #[test]
    fn test_admin_role_requires_both_args() {
        assert!(Cli::try_parse_from(["offle", "admin", "role", "u1"]).is_err());
    }
}
