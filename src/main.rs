mod config;
mod content;
mod form;
mod relay;
mod tui;
mod view;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use config::Settings;
use content::Portfolio;
use form::{ContactForm, Draft, Status};
use relay::{FormRelay, HttpRelay};
use std::path::PathBuf;
use std::sync::Arc;
use view::Section;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Terminal portfolio - profile, projects, experience, and a contact form")]
struct Cli {
    /// Profile JSON file (default: profile.json in the config directory, else built-in content)
    #[arg(short, long, global = true)]
    profile: Option<PathBuf>,

    /// Contact form endpoint (overrides the profile's form_endpoint)
    #[arg(short, long, global = true)]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the portfolio interactively (default)
    Browse,

    /// Print one section
    Show {
        #[arg(value_enum)]
        section: Section,
    },

    /// List contact channels
    Links,

    /// Send a message through the contact form
    Contact {
        /// Your name
        #[arg(short, long)]
        name: String,

        /// Your email address
        #[arg(long)]
        email: String,

        /// The message body
        #[arg(short, long)]
        message: String,
    },

    /// Write the built-in content to a profile file for editing
    Init {
        /// Overwrite an existing profile file
        #[arg(long)]
        force: bool,
    },
}

fn init_logging(to_file: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));

    // The TUI owns the terminal, so logs go to a file while it runs
    if to_file {
        match config::open_log_file(&config::default_log_path()) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => {
                eprintln!("Logging disabled: {:#}", e);
                builder.filter_level(log::LevelFilter::Off);
            }
        }
    }

    let _ = builder.try_init();
}

fn terminal_width() -> usize {
    crossterm::terminal::size()
        .map(|(cols, _)| cols as usize)
        .unwrap_or(80)
        .clamp(40, 100)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Browse);
    init_logging(matches!(command, Commands::Browse));

    let resolve = || -> Result<(Settings, Portfolio)> {
        let (settings, portfolio) =
            Settings::resolve(cli.profile.as_deref(), cli.endpoint.as_deref())?;
        match &settings.profile_path {
            Some(path) => log::info!("Using profile {}", path.display()),
            None => log::info!("Using built-in profile"),
        }
        Ok((settings, portfolio))
    };

    match command {
        Commands::Browse => {
            let (settings, portfolio) = resolve()?;
            let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
            let relay: Arc<dyn FormRelay> = Arc::new(HttpRelay::new(settings.endpoint.clone()));
            tui::run_browse(&portfolio, relay, runtime.handle())?;
        }

        Commands::Show { section } => {
            let (_, portfolio) = resolve()?;
            let form = form::FormState::new();
            let lines = view::section_lines(section, &portfolio, &form, None, terminal_width());
            println!("{}", view::plain(&lines));
        }

        Commands::Links => {
            let (_, portfolio) = resolve()?;
            let channels = portfolio.links.visible();
            if channels.is_empty() {
                println!("No links configured.");
            } else {
                for channel in channels {
                    println!("{:<12} {}", channel.kind.label(), channel.uri);
                }
            }
        }

        Commands::Contact {
            name,
            email,
            message,
        } => {
            let (settings, _) = resolve()?;
            let mut form = ContactForm::new();
            form.state.draft = Draft {
                name,
                email,
                message,
            };

            let missing = form.state.missing_fields();
            if !missing.is_empty() {
                let names: Vec<&str> = missing.iter().map(|k| k.as_str()).collect();
                return Err(anyhow!("Please fill in: {}", names.join(", ")));
            }

            let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
            let relay = HttpRelay::new(settings.endpoint.clone());
            println!("Sending message to {}...", relay.endpoint());
            runtime.block_on(form.submit(&relay));

            match form.state.status {
                Status::Success => {
                    println!("{}", view::SUCCESS_TEXT);
                    println!("Sent: {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
                }
                Status::Error => return Err(anyhow!("{}", form.state.error_message)),
                Status::Idle | Status::Submitting => {
                    return Err(anyhow!("Message was not sent"));
                }
            }
        }

        Commands::Init { force } => {
            let path = cli
                .profile
                .clone()
                .unwrap_or_else(config::default_profile_path);
            config::write_profile_template(&path, Portfolio::builtin(), force)?;
            println!("Profile written to {}", path.display());
            println!("Edit it to personalise your portfolio.");
        }
    }

    Ok(())
}
