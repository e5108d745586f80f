use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use lpg_api::{
    config::{self, AppConfig},
    db::{self, DbPool},
    entities::{LpgType, UserRole},
    services::{
        distribution::{PenyaluranService, PerencanaanService, RekapQuery},
        users::{CreateUserRequest, UserService},
    },
};
use serde::Serialize;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "lpg-cli", about = "Maintenance commands for the LPG agent API", version)]
struct Cli {
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON when available"
    )]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Create an admin account
    CreateAdmin(CreateAdminArgs),
    /// Print the monthly rekapitulasi
    Rekap(RekapArgs),
}

#[derive(Args)]
struct CreateAdminArgs {
    #[arg(long, help = "Login email for the account")]
    email: String,
    #[arg(long, help = "Password (at least 8 characters)")]
    password: String,
    #[arg(long, default_value = "Administrator", help = "Display name")]
    name: String,
}

#[derive(Args)]
struct RekapArgs {
    #[arg(long, help = "Month as YYYY-MM")]
    month: String,
    #[arg(long, help = "Cylinder size (KG3, KG5, KG12, KG50); defaults to KG3")]
    lpg_type: Option<LpgType>,
    #[arg(long, value_parser = clap::value_parser!(Uuid), help = "Only this pangkalan")]
    pangkalan_id: Option<Uuid>,
    #[arg(long, help = "Only pangkalans in this region")]
    region: Option<String>,
    #[arg(
        long,
        action = ArgAction::SetTrue,
        help = "Use planned (perencanaan) instead of actual (penyaluran) rows"
    )]
    planned: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config().context("failed to load configuration")?;
    config::init_tracing(cfg.log_level(), cfg.log_json);
    let pool = connect(&cfg).await?;

    match cli.command {
        Commands::Migrate => {
            db::run_migrations(&pool)
                .await
                .context("failed to run migrations")?;
            println!("Migrations applied");
        }
        Commands::CreateAdmin(args) => create_admin(pool, args, cli.json).await?,
        Commands::Rekap(args) => print_rekap(pool, args, cli.json).await?,
    }

    Ok(())
}

async fn connect(cfg: &AppConfig) -> Result<Arc<DbPool>> {
    let pool = db::establish_connection_from_app_config(cfg)
        .await
        .context("failed to connect to database")?;
    Ok(Arc::new(pool))
}

async fn create_admin(pool: Arc<DbPool>, args: CreateAdminArgs, json: bool) -> Result<()> {
    let profile = UserService::new(pool)
        .create(CreateUserRequest {
            email: args.email,
            password: args.password,
            name: args.name,
            role: UserRole::Admin,
            pangkalan_id: None,
            is_active: Some(true),
        })
        .await
        .context("failed to create admin")?;

    if json {
        print_json(&profile)?;
    } else {
        println!("Created admin {} ({})", profile.email, profile.id);
    }
    Ok(())
}

async fn print_rekap(pool: Arc<DbPool>, args: RekapArgs, json: bool) -> Result<()> {
    let query = RekapQuery {
        month: args.month,
        pangkalan_id: args.pangkalan_id,
        lpg_type: args.lpg_type,
        region: args.region,
    };
    let rekap = if args.planned {
        PerencanaanService::new(pool).rekapitulasi(&query).await
    } else {
        PenyaluranService::new(pool).rekapitulasi(&query).await
    }
    .context("failed to build rekapitulasi")?;

    if json {
        return print_json(&rekap);
    }

    println!(
        "Rekapitulasi {} {} ({} days)",
        rekap.month, rekap.lpg_type, rekap.days_in_month
    );
    println!(
        "{:<12} {:<28} {:>8} {:>8} {:>8} {:>8}",
        "Code", "Name", "Alokasi", "Normal", "Fakult.", "Sisa"
    );
    for row in &rekap.rows {
        println!(
            "{:<12} {:<28} {:>8} {:>8} {:>8} {:>8}",
            row.code,
            row.name,
            row.alokasi_bulanan,
            row.total_normal,
            row.total_fakultatif,
            row.sisa_alokasi
        );
    }
    let footer = &rekap.footer;
    println!(
        "{:<12} {:<28} {:>8} {:>8} {:>8} {:>8}",
        "TOTAL",
        "",
        footer.total_alokasi,
        footer.total_normal,
        footer.total_fakultatif,
        footer.total_sisa_alokasi
    );
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
