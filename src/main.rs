use clap::{Parser, Subcommand};
use metafield::referential::{self, ImportRoute};
use metafield::{FieldCatalog, FieldSpec, FormController};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;

#[derive(Debug, Parser)]
#[command(name = "metafield", about = "Inspect metadata field rendering")]
struct Cli {
    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the descriptor tree built for a JSON value.
    Describe {
        /// JSON file holding the field value.
        value: PathBuf,
        /// Label key of the field.
        #[arg(long)]
        label: String,
        /// Patch path of the field, defaults to the label key.
        #[arg(long)]
        path: Option<String>,
        /// YAML field catalog.
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Print one line per leaf instead of the full tree.
        #[arg(long)]
        leaves: bool,
    },
    /// Print the import settings of a referential.
    Import {
        /// Route parameter of the referential, e.g. `accessContract`.
        name: String,
    },
    /// List the referentials a user may import.
    Types {
        #[arg(long)]
        admin: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Describe {
            value,
            label,
            path,
            catalog,
            leaves,
        } => {
            let raw = std::fs::read_to_string(&value)?;
            let value: serde_json::Value = serde_json::from_str(&raw)?;
            let catalog = match catalog {
                Some(path) => FieldCatalog::load(path)?,
                None => FieldCatalog::default(),
            };

            let mut form = FormController::new(catalog.clone(), catalog);
            let mut spec = FieldSpec::new(label, value);
            if let Some(path) = path {
                spec = spec.with_code(path);
            }
            let field = form.add_field(spec);

            if leaves {
                for leaf in field.tree().leaves() {
                    println!(
                        "{}\t{:?}\t{}\t{}",
                        leaf.path,
                        leaf.display_mode,
                        leaf.display_label,
                        leaf.display_text()
                    );
                }
            } else {
                println!("{}", serde_json::to_string_pretty(field.tree())?);
            }
        }
        Command::Import { name } => match referential::resolve_route(&name) {
            ImportRoute::Import(settings) => {
                println!("{}", serde_yaml::to_string(&settings)?);
            }
            ImportRoute::Redirect(route) => {
                return Err(format!("unknown referential '{name}', see {route}").into());
            }
        },
        Command::Types { admin } => {
            for kind in referential::available_types(admin) {
                println!("{}\t{}", kind.route_param(), kind.label());
            }
        }
    }
    Ok(())
}
