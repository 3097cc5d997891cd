use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use mongo_query_builder::query::loader::DefinitionLoader;
use mongo_query_builder::query::{QueryBuilder, QueryDefinition};
use mongo_query_builder::server;

const DEFAULT_PORT: u16 = 3000;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile a definition file into a query
    Compile {
        /// Path to the definition file (YAML or JSON)
        #[arg(short, long)]
        file: String,

        /// Pretty-print the query
        #[arg(short, long)]
        pretty: bool,
    },
    /// Check a definition file without compiling it
    Validate {
        /// Path to the definition file (YAML or JSON)
        #[arg(short, long)]
        file: String,
    },
    /// Print the JSON Schema of definition files
    Schema,
    /// Serve the HTTP API
    Serve {
        /// Port to listen on (defaults to MQB_PORT, then 3000)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    match args.command {
        Commands::Compile { file, pretty } => {
            let def = DefinitionLoader::new()
                .load_definition(&file)
                .with_context(|| format!("Failed to load {}", file))?;

            let query = QueryBuilder::new().build_definition(&def).await?;
            let output = if pretty {
                serde_json::to_string_pretty(&query)?
            } else {
                serde_json::to_string(&query)?
            };
            println!("{}", output);
        }
        Commands::Validate { file } => {
            let def = DefinitionLoader::new()
                .load_definition(&file)
                .with_context(|| format!("Failed to load {}", file))?;

            QueryBuilder::new()
                .check(&def.expressions, &def.conditions)
                .await?;
            println!("ok");
        }
        Commands::Schema => {
            let schema = schemars::schema_for!(QueryDefinition);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
        Commands::Serve { port } => {
            // env_logger already owns the `log` facade, so only install the subscriber
            let directives = std::env::var("RUST_LOG").ok();
            let filter = server::env_filter(directives.as_deref());
            tracing::subscriber::set_global_default(server::subscriber(filter))
                .context("Failed to install tracing subscriber")?;

            let port = port
                .or_else(|| {
                    std::env::var("MQB_PORT")
                        .ok()
                        .and_then(|p| p.parse().ok())
                })
                .unwrap_or(DEFAULT_PORT);

            server::serve(port)
                .await
                .map_err(|e| anyhow::anyhow!(e))?;
        }
    }

    Ok(())
}
