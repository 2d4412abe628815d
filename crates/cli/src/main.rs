use chartdesk_core::{
    config::resolve_records_path, normalise_query, notes, open_store, CoreConfig, FormFields,
    Record, RecordStore,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "chartdesk")]
#[command(about = "Chartdesk patient lookup CLI")]
struct Cli {
    /// Patient records file (defaults to PATIENT_RECORDS_PATH, then patients.json)
    #[arg(long, global = true)]
    records: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up a patient by ID
    Lookup {
        /// Patient ID (case-insensitive)
        id: String,
    },
    /// Suggest the next patient ID
    NextId,
    /// Add a patient for this session only; nothing is saved
    Add {
        /// Form field as key=value, e.g. --field name="Asha Verma" (repeatable)
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))
}

fn load_store(records: Option<PathBuf>) -> RecordStore {
    let records = records.or_else(|| {
        std::env::var("PATIENT_RECORDS_PATH")
            .ok()
            .map(PathBuf::from)
    });

    let cfg = match resolve_records_path(records).and_then(CoreConfig::new) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load patient database: {}", e);
            return RecordStore::new();
        }
    };

    let (store, err) = open_store(&cfg);
    if let Some(e) = err {
        eprintln!("Failed to load patient database: {}", e);
    }
    store
}

fn print_record(record: &Record) {
    println!("Patient ID:    {}", record.patient_id);
    println!("Name:          {}", record.name);
    match record.age.years() {
        Some(years) => println!("Age:           {} years", years),
        None => println!("Age:           {}", record.age),
    }
    println!("Blood Group:   {}", record.blood_group);
    println!("Department:    {}", record.department);
    println!("Address:       {}", record.address);
    println!("Past History:  {}", record.past_history);
    println!();
    println!("Blood Pressure: {}", record.vitals.blood_pressure);
    println!("SpO2:           {}", record.vitals.oxygen_saturation);
    println!("Pulse Rate:     {}", record.vitals.pulse_rate);
    println!("Temperature:    {}", record.vitals.temperature);
    println!();
    println!("Nurse Note:    {}", record.nurse_assessment.note);
    println!("Recorded by:   {}", record.nurse_assessment.recorded_by);
    println!();

    println!("{}", notes::count_label(record.doctor_notes.len()));
    for (i, note) in record.notes_latest_first().into_iter().enumerate() {
        let date = note.long_date().unwrap_or_else(|| note.date.clone());
        let marker = if i == 0 { " [Latest]" } else { "" };
        println!();
        println!("{} - {} at {}{}", note.doctor_name, date, note.time, marker);
        println!("  {}", note.note);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("chartdesk_core=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Lookup { id }) => {
            let Some(key) = normalise_query(&id) else {
                eprintln!("Please enter a patient ID.");
                return Ok(());
            };
            let store = load_store(cli.records);
            match store.get(&key) {
                Ok(record) => print_record(record),
                Err(e) => eprintln!("Patient not found: {}", e),
            }
        }
        Some(Commands::NextId) => {
            let store = load_store(cli.records);
            println!("{}", store.next_identifier());
        }
        Some(Commands::Add { fields }) => {
            let mut store = load_store(cli.records);
            let mut form: FormFields = fields.into_iter().collect();
            if !form.contains_key("patient_id") {
                form.insert("patient_id".into(), store.next_identifier().to_string());
            }

            match store.admit(&form) {
                Ok(record) => {
                    println!(
                        "Patient {} ({}) has been added for this session.",
                        record.name, record.patient_id
                    );
                    println!();
                    print_record(record);
                }
                Err(e) => eprintln!("Error adding patient: {}", e),
            }
        }
        None => {
            println!("Use 'chartdesk --help' for commands");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_field_splits_on_first_equals() {
        assert_eq!(
            parse_field("nurse_note=BP=high").expect("valid field"),
            ("nurse_note".to_string(), "BP=high".to_string())
        );
        assert!(parse_field("no-separator").is_err());
    }

    #[test]
    fn add_accepts_repeated_fields() {
        let cli = Cli::try_parse_from([
            "chartdesk",
            "add",
            "--field",
            "name=Nila Das",
            "--field",
            "age=29",
        ])
        .expect("arguments should parse");

        match cli.command {
            Some(Commands::Add { fields }) => assert_eq!(fields.len(), 2),
            _ => panic!("expected add command"),
        }
    }
}
