//! `pets` command-line catalog.
//!
//! # Responsibility
//! - Offer the catalog and editor actions of the shelter app from a terminal.
//! - Keep all rules in `pets_core`; this binary only parses and prints.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use pets_core::contract::{COLUMN_BREED, COLUMN_GENDER, COLUMN_NAME, COLUMN_WEIGHT};
use pets_core::{
    default_log_level, init_logging, open, DbConfig, FieldMap, FieldValue, Gender, LogConfig,
    PetForm, PetGateway, PetService, SaveOutcome,
};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "pets", version, about = "Local pet shelter catalog")]
struct Cli {
    /// Directory holding shelter.db.
    #[arg(long, env = "PETS_DATA_DIR", default_value = ".")]
    data_dir: PathBuf,

    /// trace|debug|info|warn|error
    #[arg(long, env = "PETS_LOG_LEVEL")]
    log_level: Option<String>,

    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long, env = "PETS_LOG_DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List every pet.
    List,
    /// Show one pet.
    Show { id: i64 },
    /// Add a pet.
    Add(AddArgs),
    /// Change some fields of a pet.
    Edit(EditArgs),
    /// Add the sample pet (Toto the terrier).
    Dummy,
    /// Delete one pet.
    Delete { id: i64 },
    /// Delete every pet.
    DeleteAll,
}

#[derive(Debug, Args)]
struct AddArgs {
    #[arg(long, default_value = "")]
    name: String,
    #[arg(long, default_value = "")]
    breed: String,
    /// unknown|male|female or 0|1|2
    #[arg(long, default_value = "unknown", value_parser = parse_gender)]
    gender: Gender,
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    weight: String,
}

#[derive(Debug, Args)]
struct EditArgs {
    id: i64,
    #[arg(long)]
    name: Option<String>,
    #[arg(long, conflicts_with = "clear_breed")]
    breed: Option<String>,
    /// Store no breed.
    #[arg(long)]
    clear_breed: bool,
    #[arg(long, value_parser = parse_gender)]
    gender: Option<Gender>,
    #[arg(long, allow_negative_numbers = true)]
    weight: Option<i64>,
}

impl EditArgs {
    fn to_field_map(&self) -> FieldMap {
        let mut fields = FieldMap::new();
        if let Some(name) = &self.name {
            fields.put(COLUMN_NAME, name.trim());
        }
        if let Some(breed) = &self.breed {
            fields.put(COLUMN_BREED, breed.trim());
        } else if self.clear_breed {
            fields.put(COLUMN_BREED, FieldValue::Null);
        }
        if let Some(gender) = self.gender {
            fields.put(COLUMN_GENDER, gender.code());
        }
        if let Some(weight) = self.weight {
            fields.put(COLUMN_WEIGHT, weight);
        }
        fields
    }
}

fn parse_gender(value: &str) -> Result<Gender, String> {
    Gender::parse(value).ok_or_else(|| format!("unknown gender `{value}`"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        let config = LogConfig::new(level, log_dir)
            .context("invalid logging options")?
            .with_echo_warnings(true);
        init_logging(&config).context("failed to start logging")?;
    }

    let config = DbConfig::in_data_dir(&cli.data_dir);
    let session = open(&config)
        .with_context(|| format!("failed to open database in `{}`", cli.data_dir.display()))?;
    let service = PetService::new(PetGateway::new(&session));
    info!("event=cli_command module=cli status=start");

    match cli.command {
        Command::List => {
            let pets = service.catalog()?;
            if pets.is_empty() {
                println!("no pets yet");
            }
            for pet in pets {
                println!("{:>4}  {}  ({})", pet.id, pet.name, pet.display_breed());
            }
        }
        Command::Show { id } => match service.load_pet(id)? {
            Some(pet) => {
                println!("id:     {}", pet.id);
                println!("name:   {}", pet.name);
                println!("breed:  {}", pet.breed.as_deref().unwrap_or(""));
                println!("gender: {}", pet.gender);
                println!("weight: {} kg", pet.weight);
            }
            None => bail!("no pet with id {id}"),
        },
        Command::Add(args) => {
            let form = PetForm {
                name: args.name,
                breed: args.breed,
                gender: args.gender,
                weight: args.weight,
            };
            match service.save_pet(None, &form)? {
                SaveOutcome::Inserted(id) => println!("pet saved with id {id}"),
                SaveOutcome::Skipped => println!("nothing entered, pet not saved"),
                SaveOutcome::Updated | SaveOutcome::Failed => bail!("error with saving pet"),
            }
        }
        Command::Edit(args) => {
            let changed = service.edit_pet(args.id, &args.to_field_map())?;
            if changed == 0 {
                bail!("no pet updated");
            }
            println!("pet updated");
        }
        Command::Dummy => match service.insert_dummy_pet()? {
            Some(id) => println!("sample pet saved with id {id}"),
            None => bail!("error with saving pet"),
        },
        Command::Delete { id } => {
            if service.delete_pet(id)? == 0 {
                bail!("error with deleting pet");
            }
            println!("pet deleted");
        }
        Command::DeleteAll => {
            let deleted = service.delete_all_pets()?;
            println!("{deleted} pets deleted");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;
    use pets_core::contract::{COLUMN_BREED, COLUMN_GENDER, COLUMN_NAME, COLUMN_WEIGHT};
    use pets_core::{FieldValue, Gender};

    #[test]
    fn edit_builds_partial_field_map() {
        let cli = Cli::try_parse_from(["pets", "edit", "3", "--gender", "female", "--clear-breed"])
            .unwrap();
        let Command::Edit(args) = cli.command else {
            panic!("expected edit command");
        };
        let fields = args.to_field_map();
        assert_eq!(args.id, 3);
        assert!(!fields.contains_key(COLUMN_NAME));
        assert_eq!(fields.get(COLUMN_BREED), Some(&FieldValue::Null));
        assert_eq!(fields.get_as_integer(COLUMN_GENDER), Some(Gender::Female.code()));
    }

    #[test]
    fn add_defaults_to_blank_form() {
        let cli = Cli::try_parse_from(["pets", "add"]).unwrap();
        let Command::Add(args) = cli.command else {
            panic!("expected add command");
        };
        assert_eq!(args.gender, Gender::Unknown);
        assert!(args.name.is_empty());
    }

    #[test]
    fn negative_weight_reaches_core_validation() {
        let cli = Cli::try_parse_from(["pets", "edit", "3", "--weight", "-3"]).unwrap();
        let Command::Edit(args) = cli.command else {
            panic!("expected edit command");
        };
        assert_eq!(args.to_field_map().get(COLUMN_WEIGHT), Some(&FieldValue::Integer(-3)));

        let cli = Cli::try_parse_from(["pets", "add", "--name", "Rex", "--weight", "-4"]).unwrap();
        let Command::Add(args) = cli.command else {
            panic!("expected add command");
        };
        assert_eq!(args.weight, "-4");
    }

    #[test]
    fn unknown_gender_is_rejected() {
        assert!(Cli::try_parse_from(["pets", "add", "--gender", "cat"]).is_err());
    }
}
