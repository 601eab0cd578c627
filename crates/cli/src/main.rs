use agnos_core::repositories::{SqlitePatientRepository, SqliteStaffRepository};
use agnos_core::{db, CoreConfig, HttpHospitalClient, PatientService, StaffService};
use api_shared::dto::{CreateStaffReq, PatientRes, PatientSearchReq};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "agnos")]
#[command(about = "Agnos hospital patient registry CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a staff account
    CreateStaff {
        username: String,
        password: String,
        /// Hospital the account belongs to
        hospital: String,
    },
    /// Search patients, consulting the hospital API on an identifier miss
    Search {
        /// Hospital of the staff member performing the search
        #[arg(long)]
        hospital: String,
        #[arg(long)]
        national_id: Option<String>,
        #[arg(long)]
        passport_id: Option<String>,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        middle_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        date_of_birth: Option<String>,
        #[arg(long)]
        phone_number: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Fetch a patient from a hospital API without storing it
    RemoteLookup {
        /// National id or passport id
        identifier: String,
        hospital: String,
    },
}

/// Services built from the environment, as the server builds them.
struct Registry {
    staff: StaffService,
    patients: PatientService,
}

impl Registry {
    async fn from_env() -> anyhow::Result<Self> {
        let cfg = CoreConfig::from_env()?;
        let pool = db::connect(cfg.database_url(), cfg.max_connections()).await?;
        let hospitals =
            HttpHospitalClient::new(cfg.hospital_endpoints().clone(), cfg.hospital_api_timeout())?;

        Ok(Self {
            staff: StaffService::new(
                Arc::new(SqliteStaffRepository::new(pool.clone())),
                cfg.password_hasher(),
            ),
            patients: PatientService::new(
                Arc::new(SqlitePatientRepository::new(pool)),
                Arc::new(hospitals),
            ),
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("agnos_core=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::CreateStaff {
            username,
            password,
            hospital,
        }) => {
            let registration = CreateStaffReq {
                username,
                password,
                hospital,
            }
            .validate()?;

            let registry = Registry::from_env().await?;
            match registry
                .staff
                .create_staff(
                    registration.username.as_str(),
                    registration.password.as_str(),
                    registration.hospital.as_str(),
                )
                .await
            {
                Ok(staff) => println!("Created staff with ID: {}", staff.id),
                Err(e) => eprintln!("Error creating staff: {}", e),
            }
        }
        Some(Commands::Search {
            hospital,
            national_id,
            passport_id,
            first_name,
            middle_name,
            last_name,
            date_of_birth,
            phone_number,
            email,
        }) => {
            let filter = PatientSearchReq {
                national_id,
                passport_id,
                first_name,
                middle_name,
                last_name,
                date_of_birth,
                phone_number,
                email,
            }
            .to_filter()?;

            let registry = Registry::from_env().await?;
            match registry.patients.search_patients(&filter, &hospital).await {
                Ok(patients) if patients.is_empty() => println!("No patients found."),
                Ok(patients) => {
                    for patient in patients {
                        println!("{}", serde_json::to_string_pretty(&PatientRes::from(patient))?);
                    }
                }
                Err(e) => eprintln!("Error searching patients: {}", e),
            }
        }
        Some(Commands::RemoteLookup {
            identifier,
            hospital,
        }) => {
            let registry = Registry::from_env().await?;
            match registry
                .patients
                .get_patient_from_hospital_api(&identifier, &hospital)
                .await
            {
                Ok(patient) => {
                    println!("{}", serde_json::to_string_pretty(&PatientRes::from(patient))?)
                }
                Err(e) => eprintln!("Error fetching patient from {}: {}", hospital, e),
            }
        }
        None => {
            println!("Use 'agnos --help' for commands");
        }
    }

    Ok(())
}
