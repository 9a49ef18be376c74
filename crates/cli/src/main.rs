use clap::{Parser, Subcommand};
use patientor_core::{parse_entry, parse_patient, DiagnosisReference, PatientRepository};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "patientor")]
#[command(about = "Patientor patient record CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a new-patient JSON payload
    ValidatePatient {
        /// Path to the JSON file
        file: PathBuf,
    },
    /// Validate a clinical entry JSON payload
    ValidateEntry {
        /// Path to the JSON file
        file: PathBuf,
    },
    /// List the bundled diagnosis reference
    Diagnoses,
    /// List the bundled demo patients (public fields only)
    Patients,
}

fn read_json(path: &Path) -> Result<Value, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    let value = serde_json::from_str(&text)
        .map_err(|e| format!("{} is not valid JSON: {e}", path.display()))?;
    Ok(value)
}

fn pretty<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

/// Runs a validator over the payload in `path`, returning the normalised JSON or the rejection.
fn validate<T, E>(
    path: &Path,
    parse: impl FnOnce(&Value) -> Result<T, E>,
) -> Result<Result<String, String>, Box<dyn std::error::Error>>
where
    T: Serialize,
    E: std::fmt::Display,
{
    let raw = read_json(path)?;
    match parse(&raw) {
        Ok(parsed) => Ok(Ok(pretty(&parsed)?)),
        Err(e) => Ok(Err(e.to_string())),
    }
}

fn report(outcome: Result<String, String>) -> ExitCode {
    match outcome {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("Invalid payload: {message}");
            ExitCode::FAILURE
        }
    }
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::ValidatePatient { file }) => Ok(report(validate(&file, parse_patient)?)),
        Some(Commands::ValidateEntry { file }) => Ok(report(validate(&file, parse_entry)?)),
        Some(Commands::Diagnoses) => {
            let reference = DiagnosisReference::bundled()?;
            for diagnosis in reference.list() {
                match &diagnosis.latin {
                    Some(latin) => println!("{}: {} ({latin})", diagnosis.code, diagnosis.name),
                    None => println!("{}: {}", diagnosis.code, diagnosis.name),
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Patients) => {
            let repository = PatientRepository::bundled()?;
            let patients = repository.list_public();
            if patients.is_empty() {
                println!("No patients found.");
            } else {
                for patient in patients {
                    println!(
                        "ID: {}, Name: {}, Born: {}, Occupation: {}",
                        patient.id, patient.name, patient.date_of_birth, patient.occupation
                    );
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        None => {
            println!("Use --help for available commands");
            Ok(ExitCode::SUCCESS)
        }
    }
}
