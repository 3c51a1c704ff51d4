use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use materna_core::{
    encode_credentials_file, resolve_service_account, CoreConfig, DocumentId, FlowStep,
    PersonalNumber, RecordService, ServiceCatalog, SubmissionService, SummaryService,
    DEFAULT_CREDENTIALS_FILE, DEFAULT_DATA_DIR,
};

#[derive(Parser)]
#[command(name = "materna")]
#[command(about = "Materna maternity care workflow CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List every service in the catalog, traversal order marked
    Services,
    /// Register a patient from Key=Value pairs (PersonalNumber required)
    Register {
        /// Form fields as Key=Value pairs
        fields: Vec<String>,
    },
    /// Submit one service's form and print where the flow goes next
    Submit {
        /// Service name (a traversal member, e.g. MidwifeNotes)
        service: String,
        /// The patient's personal number
        personal_number: String,
        /// Form fields as Key=Value pairs
        fields: Vec<String>,
    },
    /// Show the summary for a registered patient
    Summary {
        /// The patient's personal number
        personal_number: String,
    },
    /// List one service's stored records
    Records {
        /// Service name
        service: String,
    },
    /// Delete one record by id
    Delete {
        /// Service name
        service: String,
        /// Record id (32 lowercase hex characters)
        id: String,
    },
    /// Base64-encode a credentials file for the environment variable
    EncodeCredentials {
        /// Path to the service-account JSON file
        path: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Services) => {
            let catalog = ServiceCatalog::standard();
            for name in catalog.service_names() {
                if catalog.traversal_order().contains(&name) {
                    println!("{}", name);
                } else {
                    println!("{} (entry point)", name);
                }
            }
        }
        Some(Commands::Register { fields }) => {
            let cfg = config_from_env()?;
            let submissions =
                SubmissionService::new(cfg, Arc::new(ServiceCatalog::standard()));
            let step = submissions.register(parse_fields(&fields)?)?;
            print_step(&step);
        }
        Some(Commands::Submit {
            service,
            personal_number,
            fields,
        }) => {
            let cfg = config_from_env()?;
            let submissions =
                SubmissionService::new(cfg, Arc::new(ServiceCatalog::standard()));
            let step =
                submissions.submit(&service, Some(&personal_number), parse_fields(&fields)?)?;
            print_step(&step);
        }
        Some(Commands::Summary { personal_number }) => {
            let cfg = config_from_env()?;
            let summaries = SummaryService::new(cfg);
            let summary = summaries.patient_summary(&PersonalNumber::new(&personal_number)?)?;
            println!("Patient {}", summary.personal_number);
            for (key, value) in &summary.fields {
                println!("  {}: {}", key, value);
            }
        }
        Some(Commands::Records { service }) => {
            let cfg = config_from_env()?;
            let records =
                RecordService::new(cfg, Arc::new(ServiceCatalog::standard()));
            let listed = records.list(&service)?;
            if listed.is_empty() {
                println!("No records found.");
            } else {
                for record in listed {
                    println!(
                        "ID: {}, Created: {}, By: {}",
                        record.id, record.created_at, record.created_by
                    );
                    for (key, value) in &record.fields {
                        println!("  {}: {}", key, value);
                    }
                }
            }
        }
        Some(Commands::Delete { service, id }) => {
            let cfg = config_from_env()?;
            let records =
                RecordService::new(cfg, Arc::new(ServiceCatalog::standard()));
            records.delete(&service, &DocumentId::parse(&id)?)?;
            println!("Deleted {}/{}", service, id);
        }
        Some(Commands::EncodeCredentials { path }) => {
            println!("{}", encode_credentials_file(&path)?);
        }
        None => {
            println!("No command given. Try `materna services`.");
        }
    }

    Ok(())
}

/// Resolves the same configuration the servers use, from the same variables.
fn config_from_env() -> Result<Arc<CoreConfig>, Box<dyn std::error::Error>> {
    let data_dir = std::env::var("MATERNA_DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.into());
    let credentials_file = std::env::var("MATERNA_CREDENTIALS_FILE")
        .unwrap_or_else(|_| DEFAULT_CREDENTIALS_FILE.into());
    let credentials_blob = std::env::var("MATERNA_CREDENTIALS_B64").ok();
    let service_account =
        resolve_service_account(credentials_blob.as_deref(), Path::new(&credentials_file))?;

    Ok(Arc::new(CoreConfig::new(
        PathBuf::from(data_dir),
        service_account,
    )?))
}

fn parse_fields(pairs: &[String]) -> Result<BTreeMap<String, String>, Box<dyn std::error::Error>> {
    let mut fields = BTreeMap::new();
    for pair in pairs {
        match pair.split_once('=') {
            Some((key, value)) => {
                fields.insert(key.to_string(), value.to_string());
            }
            None => return Err(format!("expected Key=Value, got '{}'", pair).into()),
        }
    }
    Ok(fields)
}

fn print_step(step: &FlowStep) {
    match step {
        FlowStep::NextForm {
            service,
            personal_number,
        } => println!("Stored. Next form: {} (patient {})", service, personal_number),
        FlowStep::Summary { personal_number } => {
            println!("Stored. Flow complete: see summary for patient {}", personal_number)
        }
    }
}
