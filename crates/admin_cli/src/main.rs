use std::error::Error;

use clap::{Args, Parser, Subcommand};
use engine::{Engine, EngineError};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

#[derive(Parser, Debug)]
#[command(name = "tesoro_admin")]
#[command(about = "Admin utilities for Tesoro (bootstrap users/currencies)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:./tesoro.db?mode=rwc")]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    Currency(Currency),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    Create(UserCreateArgs),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    username: String,
    #[arg(long)]
    display_name: Option<String>,
}

#[derive(Args, Debug)]
struct Currency {
    #[command(subcommand)]
    command: CurrencyCommand,
}

#[derive(Subcommand, Debug)]
enum CurrencyCommand {
    Create(CurrencyCreateArgs),
    List,
}

#[derive(Args, Debug)]
struct CurrencyCreateArgs {
    /// ISO 4217 code, e.g. `SEK`.
    #[arg(long)]
    code: String,
    #[arg(long)]
    name: String,
    #[arg(long)]
    symbol: String,
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

/// Report engine rejections on stderr and exit, propagate anything else.
fn exit_on_rejection<T>(result: Result<T, EngineError>) -> Result<T, Box<dyn Error + Send + Sync>> {
    match result {
        Ok(value) => Ok(value),
        Err(EngineError::Database(err)) => Err(err.into()),
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            let user = exit_on_rejection(
                engine
                    .create_user(&args.username, args.display_name.as_deref())
                    .await,
            )?;
            println!("created user: {}", user.username);
        }
        Command::Currency(Currency {
            command: CurrencyCommand::Create(args),
        }) => {
            let currency = exit_on_rejection(
                engine
                    .currencies()
                    .create(&args.code, &args.name, &args.symbol)
                    .await,
            )?;
            println!("created currency: {} ({})", currency.code, currency.id);
        }
        Command::Currency(Currency {
            command: CurrencyCommand::List,
        }) => {
            for currency in engine.currencies().list().await? {
                println!(
                    "{}\t{}\t{}\t{}",
                    currency.id, currency, currency.symbol, currency.name
                );
            }
        }
    }

    Ok(())
}
