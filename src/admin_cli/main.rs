use clap::{Parser, Subcommand};
use sea_orm::{ConnectionTrait, DatabaseConnection, JsonValue, Statement};
use serde_json::{Map, Value as JsonValueSerde};
use std::fs;
use transit_registry::database::{self, schema};

/// Command line administration for the transit registry database.
/// Creates and drops the schema, loads SQL seed files and inspects tables.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, verbatim_doc_comment)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Database commands. The connection comes from DATABASE_URL.
    Db {
        #[command(subcommand)]
        db_command: DbCommand,
    },
}

#[derive(Subcommand, Debug)]
enum DbCommand {
    /// Creates every missing table.
    Migrate,
    /// Drops every table managed by the service. Use with care!
    Wipe,
    /// Executes a `;`-separated SQL script, skipping objects that already exist.
    Seed {
        /// Path to the SQL file.
        #[arg(short, long)]
        file: String,
    },
    /// Runs a SELECT on one table and prints the rows as JSON.
    Query {
        /// One of: stations, routes, route_stations, facilities.
        #[arg(short, long)]
        table: String,

        /// WHERE condition (for example "id = 3" or "name = 'Seoul'").
        #[arg(short, long)]
        filter: Option<String>,
    },
}

fn is_already_exists(error: &str) -> bool {
    // 42P07 = duplicate table, 42710 = duplicate object (PostgreSQL)
    error.contains("already exists") || error.contains("42P07") || error.contains("42710")
}

async fn execute_sql_file(
    db: &DatabaseConnection,
    file_path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Executing script: {}", file_path);
    let sql = fs::read_to_string(file_path)?;
    for query in sql.split(';').filter(|s| !s.trim().is_empty()) {
        let trimmed_query = query.trim();

        match db
            .execute(Statement::from_string(
                db.get_database_backend(),
                trimmed_query.to_string(),
            ))
            .await
        {
            Ok(_) => {}
            Err(e) if is_already_exists(&e.to_string()) => {
                println!(
                    "Object already exists, skipping: {}",
                    trimmed_query
                        .split_whitespace()
                        .take(3)
                        .collect::<Vec<_>>()
                        .join(" ")
                );
            }
            Err(e) => return Err(e.into()),
        }
    }
    println!("Script executed successfully.");
    Ok(())
}

async fn query_table(
    db: &DatabaseConnection,
    table: &str,
    filter: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    if !schema::TABLES.contains(&table) {
        return Err(format!(
            "Unknown table '{}'. Expected one of: {}",
            table,
            schema::TABLES.join(", ")
        )
        .into());
    }

    let mut query_str = format!("SELECT * FROM \"{}\"", table);
    if let Some(f) = filter {
        query_str.push_str(" WHERE ");
        query_str.push_str(f);
    }

    println!("Running query: {}", query_str);
    let results = db
        .query_all(Statement::from_string(db.get_database_backend(), query_str))
        .await?;

    let mut json_results: Vec<JsonValueSerde> = Vec::new();
    for row in results {
        let mut map = Map::new();
        for col in row.column_names() {
            let value: JsonValue = row.try_get("", col.as_str()).unwrap_or(JsonValue::Null);
            map.insert(col.to_string(), value);
        }
        json_results.push(JsonValueSerde::Object(map));
    }

    println!("{}", serde_json::to_string_pretty(&json_results)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));
    let cli = Cli::parse();

    let Commands::Db { db_command } = &cli.command;
    let db = database::connect().await?;

    match db_command {
        DbCommand::Migrate => {
            schema::create_tables(&db).await?;
            println!("Tables created: {}", schema::TABLES.join(", "));
        }
        DbCommand::Wipe => {
            schema::drop_tables(&db).await?;
            println!("All tables dropped.");
        }
        DbCommand::Seed { file } => {
            execute_sql_file(&db, file).await?;
        }
        DbCommand::Query { table, filter } => {
            query_table(&db, table, filter.as_deref()).await?;
        }
    }

    Ok(())
}
