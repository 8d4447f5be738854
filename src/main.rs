use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use listinator_client::api::ListinatorClient;
use listinator_client::config::ClientConfig;
use listinator_client::models::{Credentials, Entry, EntryChange, ItemType};
use listinator_client::notifications::{self, Level, NotificationMode};
use listinator_client::pages::{Pages, View};
use listinator_client::routes::Route;

#[derive(Parser)]
#[command(name = "listinator")]
#[command(about = "Shopping lists from the command line")]
struct Cli {
    /// Server URL (overrides config and LISTINATOR_URL)
    #[arg(long, global = true)]
    url: Option<String>,

    /// Notification display: one current message, or a queue
    #[arg(long, global = true)]
    notifications: Option<NotificationMode>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a page by path, e.g. `/list/<id>`
    Open { path: String },
    /// Manage lists
    #[command(subcommand)]
    Lists(ListCommands),
    /// Manage entries
    #[command(subcommand)]
    Entries(EntryCommands),
    /// Show the available entry types
    Types,
    /// Sign in with LISTINATOR_USER / LISTINATOR_PASSWORD or the given account
    Login {
        #[arg(long)]
        user: Option<String>,
        #[arg(long, env = "LISTINATOR_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Show or change the configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ListCommands {
    /// Create a new list
    Create,
}

#[derive(Subcommand)]
enum EntryCommands {
    /// List the entries of a list
    List { list_id: Uuid },
    /// Show one entry
    Show { id: Uuid },
    /// Add an entry to a list
    Add { list_id: Uuid, name: String },
    /// Change an entry
    Update {
        id: Uuid,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        number: Option<String>,
        #[arg(long)]
        bought: Option<bool>,
        #[arg(long = "type")]
        type_id: Option<String>,
    },
    /// Delete an entry
    Rm { id: Uuid },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Store the server URL in the config file
    SetUrl { url: String },
}

/// Initialize tracing with output to stderr so stdout only carries data.
/// The diagnostic log is for developers and stays off unless RUST_LOG is set.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "off".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = ClientConfig::load();
    if let Some(url) = cli.url {
        config.base_url = url;
    }
    if let Some(mode) = cli.notifications {
        config.notifications.mode = mode;
    }

    if let Commands::Config(command) = &cli.command {
        return run_config(command, config);
    }

    let client = ListinatorClient::from_config(&config)?;
    let pages = Pages::new(client, notifications::build(config.notifications.clone()));

    // Commands other than login run signed in when credentials are configured.
    if !matches!(cli.command, Commands::Login { .. }) {
        if let Some(credentials) = config.credentials() {
            tracing::debug!(user = %credentials.name, "Signing in");
            if pages.sign_in(&credentials).await.is_none() {
                return Ok(render_notifications(&pages));
            }
        }
    }

    match cli.command {
        Commands::Open { path } => match Route::resolve(&path) {
            Some(route) => {
                if let Some(view) = pages.open(&route).await {
                    print_view(&view);
                }
            }
            None => {
                pages.notify().error(&format!("No page at {}", path), None);
            }
        },
        Commands::Lists(ListCommands::Create) => {
            if let Some(list) = pages.home().await {
                print_view(&View::NewList(list));
            }
        }
        Commands::Entries(command) => run_entries(&pages, command).await,
        Commands::Types => {
            if let Some(types) = pages.types().await {
                print_types(&types);
            }
        }
        Commands::Login { user, password } => {
            let user = user.or(config.user);
            let password = password.or(config.password);
            match (user, password) {
                (Some(name), Some(password)) => {
                    pages.login(&Credentials { name, password }).await;
                }
                _ => {
                    pages.notify().error("User name and password are required", None);
                }
            }
        }
        Commands::Logout => {
            pages.logout().await;
        }
        Commands::Whoami => print_view(&View::Session(pages.whoami().await)),
        Commands::Config(_) => {}
    }

    Ok(render_notifications(&pages))
}

async fn run_entries(pages: &Pages, command: EntryCommands) {
    match command {
        EntryCommands::List { list_id } => {
            if let Some(entries) = pages.list(list_id).await {
                print_view(&View::Entries(entries));
            }
        }
        EntryCommands::Show { id } => {
            if let Some(entry) = pages.entry(id).await {
                print_entry(&entry);
            }
        }
        EntryCommands::Add { list_id, name } => {
            if let Some(entry) = pages.add_entry(list_id, &name).await {
                print_entry(&entry);
            }
        }
        EntryCommands::Update {
            id,
            name,
            number,
            bought,
            type_id,
        } => {
            let change = EntryChange {
                name,
                number,
                bought,
                type_id,
            };
            if let Some(entry) = pages.update_entry(id, &change).await {
                print_entry(&entry);
            }
        }
        EntryCommands::Rm { id } => {
            pages.remove_entry(id).await;
        }
    }
}

fn run_config(command: &ConfigCommands, mut config: ClientConfig) -> anyhow::Result<ExitCode> {
    match command {
        ConfigCommands::Show => {
            println!("base_url: {}", config.base_url);
            println!("user: {}", config.user.as_deref().unwrap_or("-"));
            println!("notifications: {}", config.notifications.mode.as_str());
            println!("auto_hide_delay_ms: {}", config.notifications.auto_hide_delay_ms);
        }
        ConfigCommands::SetUrl { url } => {
            config.base_url = url.clone();
            let path = config.save()?;
            println!("Saved {}", path.display());
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Print live notifications to stderr. Fails the process if an error is
/// still on display.
fn render_notifications(pages: &Pages) -> ExitCode {
    let live = pages.notify().live();
    for notification in &live {
        eprintln!("{}", notification);
    }

    if live.iter().any(|n| n.level == Level::Error) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn print_view(view: &View) {
    match view {
        View::NewList(list) => {
            println!("{}", list.id);
            println!("{}", Route::List(list.id));
        }
        View::Entries(entries) => {
            for entry in entries {
                print_entry(entry);
            }
        }
        View::EntryType { entry, types } => {
            print_entry(entry);
            for item_type in types {
                let marker = if item_type.key() == entry.type_id { "*" } else { " " };
                println!("{} {}", marker, item_type.name);
            }
        }
        View::Session(Some(session)) => println!("{}", session.uuid),
        View::Session(None) => println!("not signed in"),
    }
}

fn print_entry(entry: &Entry) {
    let check = if entry.bought { "x" } else { " " };
    if entry.number.is_empty() {
        println!("[{}] {}  {}  ({})", check, entry.id, entry.name, entry.type_id);
    } else {
        println!(
            "[{}] {}  {} {}  ({})",
            check, entry.id, entry.number, entry.name, entry.type_id
        );
    }
}

fn print_types(types: &[ItemType]) {
    for item_type in types {
        match &item_type.icon {
            Some(icon) => println!("{} {}", icon, item_type.name),
            None => println!("{}", item_type.name),
        }
    }
}
