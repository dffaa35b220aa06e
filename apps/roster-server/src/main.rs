use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use api_ingress::{ApiIngress, ApiIngressConfig};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use records::{config::RecordsConfig, RecordsModule};
use runtime::{AppConfig, CliArgs};
use sea_orm::{DatabaseConnection, SqlxPostgresConnector, SqlxSqliteConnector};
use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use url::Url;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const INGRESS_MODULE: &str = "api_ingress";

/// Expand a sqlite DSN into an absolute-path DSN using a base directory.
/// - Keeps "sqlite::memory:" as-is.
/// - Normalizes backslashes into forward slashes (important on Windows).
fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path, create_dirs: bool) -> Result<String> {
    if dsn.eq_ignore_ascii_case("sqlite::memory:") || dsn.eq_ignore_ascii_case("sqlite://:memory:")
    {
        return Ok("sqlite::memory:".to_string());
    }
    let db_path = dsn
        .strip_prefix("sqlite://")
        .ok_or_else(|| anyhow!("DSN must start with sqlite:// (got: {})", dsn))?;

    let (path_str, query) = match db_path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (db_path, None),
    };

    let mut p = PathBuf::from(path_str);
    if p.as_os_str().is_empty() {
        return Err(anyhow!("Empty SQLite path in DSN"));
    }
    if p.is_relative() {
        p = base_dir.join(p);
    }

    if let Some(dir) = p.parent() {
        if create_dirs {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
    }

    // Rebuild DSN with absolute path and normalized slashes
    let mut out = String::from("sqlite://");
    out.push_str(&p.to_string_lossy().replace('\\', "/"));
    if let Some(q) = query {
        out.push('?');
        out.push_str(q);
    }
    Ok(out)
}

/// Detect DB backend from URL scheme.
fn detect_backend(dsn: &str) -> Result<&'static str> {
    if dsn.eq_ignore_ascii_case("sqlite::memory:") {
        return Ok("sqlite");
    }
    let url = Url::parse(dsn).map_err(|e| anyhow!("Invalid database DSN: {}", e))?;
    match url.scheme() {
        "sqlite" | "sqlite3" => Ok("sqlite"),
        "postgres" | "postgresql" => Ok("postgres"),
        other => Err(anyhow!("Unsupported database type: {}", other)),
    }
}

/// DSN with the password masked, for logs.
fn redact_dsn(dsn: &str) -> String {
    match Url::parse(dsn) {
        Ok(mut url) if url.password().is_some() => {
            let _ = url.set_password(Some("****"));
            url.to_string()
        }
        _ => dsn.to_string(),
    }
}

/// Roster Server - user accounts, appointments and help-desk chat over HTTP
#[derive(Parser)]
#[command(name = "roster-server")]
#[command(about = "Roster Server - user accounts, appointments and help-desk chat")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use an in-memory SQLite database
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.as_ref().cloned().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("Roster Server starting");

    if args.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config, args).await,
        Commands::Check => check_config(config),
    }
}

async fn connect_database(config: &AppConfig, mock: bool) -> Result<DatabaseConnection> {
    let db_config = config.database.clone().unwrap_or_default();

    let dsn = if mock {
        "sqlite::memory:".to_string()
    } else {
        db_config.dsn()?
    };
    let backend = detect_backend(&dsn)?;

    // Absolutize sqlite DSNs to avoid cwd issues
    let dsn = if backend == "sqlite" {
        absolutize_sqlite_dsn(&dsn, Path::new(&config.server.home_dir), true)?
    } else {
        dsn
    };

    let max_conns = db_config.max_conns.unwrap_or(10);
    let acquire_timeout = Duration::from_secs(5);
    tracing::info!("Connecting to database: {}", redact_dsn(&dsn));

    let db = if backend == "sqlite" {
        let in_memory = dsn == "sqlite::memory:";
        let options = SqliteConnectOptions::from_str(&dsn)
            .with_context(|| format!("Invalid SQLite DSN '{dsn}'"))?
            .create_if_missing(true)
            .busy_timeout(Duration::from_millis(u64::from(
                db_config.busy_timeout_ms.unwrap_or(5000),
            )));
        let pool = SqlitePoolOptions::new()
            // every pooled connection would otherwise get its own empty database
            .max_connections(if in_memory { 1 } else { max_conns })
            .acquire_timeout(acquire_timeout)
            .connect_with(options)
            .await
            .context("Failed to connect to sqlite database")?;
        SqlxSqliteConnector::from_sqlx_sqlite_pool(pool)
    } else {
        let pool = PgPoolOptions::new()
            .max_connections(max_conns)
            .acquire_timeout(acquire_timeout)
            .connect(&dsn)
            .await
            .context("Failed to connect to postgres database")?;
        SqlxPostgresConnector::from_sqlx_postgres_pool(pool)
    };

    tracing::info!("Connected DB backend: {}", backend);
    Ok(db)
}

async fn run_server(config: AppConfig, args: CliArgs) -> Result<()> {
    tracing::info!("Initializing modules...");

    let records_config: RecordsConfig = config.module_config(RecordsModule::NAME)?;
    let mut ingress_config: ApiIngressConfig = config.module_config(INGRESS_MODULE)?;
    if config.server.timeout_sec > 0 {
        ingress_config.timeout_sec = config.server.timeout_sec;
    }

    let db = connect_database(&config, args.mock).await?;
    RecordsModule::migrate(&db).await?;
    let records = RecordsModule::new(db, records_config);

    let ingress = ApiIngress::new(ingress_config);
    let router = ingress.build_router(
        records.register_rest(axum::Router::new()),
        Some(records.openapi()),
    );
    let addr = ingress.bind_addr(&config.server.host, config.server.port)?;

    ingress
        .serve(addr, router, api_ingress::shutdown::shutdown_signal())
        .await
}

fn check_config(config: AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    // Typed module sections must parse and the database section must yield a DSN
    let _: RecordsConfig = config.module_config(RecordsModule::NAME)?;
    let _: ApiIngressConfig = config.module_config(INGRESS_MODULE)?;
    if let Some(db) = &config.database {
        detect_backend(&db.dsn()?)?;
    }

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("Server config:");
    println!("{}", config.to_yaml()?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_dsn_is_kept() {
        let out = absolutize_sqlite_dsn("sqlite://:memory:", Path::new("/base"), false).unwrap();
        assert_eq!(out, "sqlite::memory:");
    }

    #[test]
    fn relative_sqlite_path_is_joined_to_home() {
        let out = absolutize_sqlite_dsn("sqlite://database/roster.db", Path::new("/base"), false)
            .unwrap();
        assert_eq!(out, "sqlite:///base/database/roster.db");
    }

    #[test]
    fn query_is_preserved() {
        let out = absolutize_sqlite_dsn("sqlite:///data/r.db?mode=ro", Path::new("/base"), false)
            .unwrap();
        assert_eq!(out, "sqlite:///data/r.db?mode=ro");
    }

    #[test]
    fn backends_are_detected() {
        assert_eq!(detect_backend("sqlite::memory:").unwrap(), "sqlite");
        assert_eq!(detect_backend("sqlite:///tmp/x.db").unwrap(), "sqlite");
        assert_eq!(detect_backend("postgres://u:p@h:5432/db").unwrap(), "postgres");
        assert!(detect_backend("mysql://h/db").is_err());
        assert!(detect_backend("not a url").is_err());
    }

    #[test]
    fn password_is_redacted() {
        let out = redact_dsn("postgres://app:s3cret@db:5432/roster");
        assert!(!out.contains("s3cret"));
        assert!(out.contains("app"));
    }
}
