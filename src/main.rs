use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod areas;
mod config;
mod db;
mod error;
mod grades;
mod guard;
mod markup;
mod models;
mod pages;
mod report;
mod selection;
mod thermometer;

use config::Config;
use guard::{AuthSnapshot, GuardView, RecordingNavigator, RouteGuard};
use pages::Page;
use selection::{FileStorage, Session};

#[derive(Parser)]
#[command(name = "coord-portal")]
#[command(about = "Coordination portal for evaluation cycles and selection processes", long_about = None)]
struct Cli {
    /// Path to the TOML config file
    #[arg(long, global = true, default_value = "coord-portal.toml")]
    config: PathBuf,

    /// Directory holding client-side state, overrides the config file
    #[arg(long, global = true)]
    storage_dir: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load realistic seed data
    Seed,
    /// Import evaluations from a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// List active members
    Members,
    /// Open a portal path behind the route guard
    Open {
        path: String,
        #[arg(long)]
        authenticated: bool,
        #[arg(long)]
        equipe_ps: bool,
        #[arg(long)]
        loading: bool,
    },
    /// Select the member the portal acts on
    Select { member_id: i32 },
    /// Forget the selected member
    Clear,
    /// Show the selected member
    Selected,
    /// Translate a grade to its label, or a label back to its grade
    Grade {
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Show the color of an area, or of every area when none is given
    Area { name: Option<String> },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;

    let log_level = if cli.verbose {
        "debug"
    } else {
        config.log.level.as_str()
    };
    let filter = EnvFilter::from_default_env().add_directive(
        format!("coord_portal={log_level}")
            .parse()
            .unwrap_or_else(|_| "coord_portal=info".parse().expect("fallback directive is valid")),
    );
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    tracing::debug!("configuration loaded from {}", cli.config.display());

    let storage_dir = cli
        .storage_dir
        .clone()
        .unwrap_or_else(|| config.storage.dir.clone());

    match cli.command {
        Commands::InitDb => {
            let pool = connect(&config).await?;
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            let pool = connect(&config).await?;
            db::seed(&pool).await?;
            println!("Seed data inserted.");
        }
        Commands::Import { csv } => {
            let pool = connect(&config).await?;
            let inserted = db::import_csv(&pool, &csv).await?;
            println!("Inserted {inserted} evaluations from {}.", csv.display());
        }
        Commands::Members => {
            let pool = connect(&config).await?;
            let members = db::get_active_members(&pool).await?;
            print!("{}", report::render_members(&members));
        }
        Commands::Open {
            path,
            authenticated,
            equipe_ps,
            loading,
        } => {
            let auth = AuthSnapshot {
                is_loading: loading,
                is_authenticated: authenticated,
                is_equipe_ps: equipe_ps,
            };
            let mut guard = RouteGuard::new();
            let mut navigator = RecordingNavigator::default();
            let view = guard.evaluate(auth, &path, &mut navigator);
            tracing::debug!(state = ?guard.state(), "route guard evaluated");

            match view {
                GuardView::Loading => println!("Carregando..."),
                GuardView::Nothing => {
                    for target in navigator.visits {
                        println!("Redirecionado para {target}");
                    }
                }
                GuardView::Children => {
                    let pool = connect(&config).await?;
                    match pages::resolve(&pool, &path).await? {
                        Page::Render(content) => print!("{content}"),
                        Page::Redirect(target) => println!("Redirecionado para {target}"),
                        Page::NotFound => println!("Página não encontrada: {path}"),
                    }
                }
            }
        }
        Commands::Select { member_id } => {
            let pool = connect(&config).await?;
            let members = db::get_active_members(&pool).await?;
            let wanted = member_id.to_string();
            let member = members
                .into_iter()
                .find(|member| member.id == wanted)
                .with_context(|| format!("member {member_id} is not an active member"))?;

            let mut session = Session::with_member_selection(FileStorage::new(storage_dir))?;
            let selection = session.member_selection()?;
            selection.select_member(member.into())?;
            if let Some(selected) = selection.selected() {
                println!("Selecionado: {} ({})", selected.name, selected.area);
            }
        }
        Commands::Clear => {
            let mut session = Session::with_member_selection(FileStorage::new(storage_dir))?;
            session.member_selection()?.clear_member()?;
            println!("Seleção removida.");
        }
        Commands::Selected => {
            let mut session = Session::with_member_selection(FileStorage::new(storage_dir))?;
            match session.member_selection()?.selected() {
                Some(member) => println!(
                    "{} ({}) {} `{}`",
                    member.name,
                    member.id,
                    member.area,
                    areas::cores_areas(&member.area)
                ),
                None => println!("Nenhum membro selecionado."),
            }
        }
        Commands::Grade { value } => match value.trim().parse::<i32>() {
            Ok(nota) => println!(
                "{nota}: {} [{}]",
                grades::nota_para_texto(nota),
                grades::get_nota_border_color(nota)
            ),
            Err(_) => println!("{}: {}", value, grades::texto_para_nota(&value)),
        },
        Commands::Area { name } => match name {
            Some(name) => println!("{name}: {}", areas::cores_areas(&name)),
            None => {
                let pool = connect(&config).await?;
                for area in db::get_areas(&pool).await? {
                    println!("{} ({}): {}", area.name, area.id, areas::cores_areas(&area.name));
                }
            }
        },
    }

    Ok(())
}

async fn connect(config: &Config) -> anyhow::Result<PgPool> {
    let database_url = config
        .database
        .url
        .as_deref()
        .context("DATABASE_URL must be set to a production Postgres instance")?;

    PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(database_url)
        .await
        .context("failed to connect to Postgres")
}
