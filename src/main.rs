use clap::{Parser, Subcommand};
use contact_sheet::config::{DATA_DIR_ENV, resolve_data_dir};
use contact_sheet::console::{self, format_entry};
use contact_sheet::controller::{Controller, NoticeKind, Outcome};
use contact_sheet::downloader::to_csv;
use contact_sheet::entry::Field;
use contact_sheet::share::SystemShare;
use contact_sheet::store::RecordStore;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "contact-sheet")]
#[command(about = "Record contact entries in an Excel workbook", long_about = None)]
struct Cli {
    /// Directory holding data.xlsx
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Form values from flags; on `edit`, omitted flags keep the saved value
#[derive(clap::Args)]
struct FormArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    details: Option<String>,
}

impl FormArgs {
    /// Copy the given flags into the controller's form buffer
    fn fill(self, controller: &mut Controller) {
        let given = [
            (Field::Name, self.name),
            (Field::Phone, self.phone),
            (Field::Email, self.email),
            (Field::City, self.city),
            (Field::Details, self.details),
        ];
        for (field, value) in given {
            if let Some(value) = value {
                controller.set_field(field, value);
            }
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive form (the default)
    Form,
    /// Print saved entries
    List,
    /// Save a new entry
    Add(FormArgs),
    /// Change fields of an existing entry
    Edit {
        id: String,
        #[command(flatten)]
        form: FormArgs,
    },
    /// Delete an entry
    Delete { id: String },
    /// Hand the workbook to the system's default handler
    Share,
    /// Copy the workbook, or a CSV rendering of it, to a file
    Export {
        out: PathBuf,
        #[arg(long)]
        csv: bool,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Cli::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let data_dir = resolve_data_dir(cli.data_dir.as_deref())?;
    let store = RecordStore::new(&data_dir);
    let mut controller = Controller::new(store, Box::new(SystemShare));

    let command = cli.command.unwrap_or(Commands::Form);
    // the interactive form starts the controller itself
    if !matches!(command, Commands::Form) && controller.start() == Outcome::Failed {
        report(&mut controller);
        return Ok(false);
    }

    let outcome = match command {
        Commands::Form => {
            let stdin = io::stdin();
            console::run(&mut controller, stdin.lock(), io::stdout())?;
            return Ok(true);
        }
        Commands::List => {
            for entry in controller.entries() {
                print!("{}", format_entry(entry));
            }
            Outcome::Loaded
        }
        Commands::Add(form) => {
            form.fill(&mut controller);
            controller.submit()
        }
        Commands::Edit { id, form } => {
            if !controller.begin_edit(&id) {
                eprintln!("No entry with id {}", id);
                return Ok(false);
            }
            form.fill(&mut controller);
            controller.submit()
        }
        Commands::Delete { id } => controller.delete(&id),
        Commands::Share => controller.share(),
        Commands::Export { out, csv } => {
            if csv {
                fs::write(&out, to_csv(controller.entries()))?;
            } else {
                fs::write(&out, controller.store().export_bytes()?)?;
            }
            println!("Exported to {}", out.display());
            Outcome::Loaded
        }
    };

    if outcome == Outcome::Rejected {
        let errors = &controller.state().errors;
        for message in [&errors.name, &errors.phone, &errors.email, &errors.city] {
            if !message.is_empty() {
                eprintln!("{}", message);
            }
        }
    }
    let ok = report(&mut controller) && outcome != Outcome::Rejected;
    Ok(ok)
}

fn report(controller: &mut Controller) -> bool {
    match controller.take_notice() {
        Some(notice) if notice.kind == NoticeKind::Error => {
            eprintln!("Error: {}", notice.message);
            false
        }
        Some(notice) => {
            println!("{}", notice.message);
            true
        }
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn run_in(dir: &TempDir, args: &[&str]) -> bool {
        let data_dir = dir.path().to_str().unwrap();
        let argv = ["contact-sheet", "--data-dir", data_dir]
            .into_iter()
            .chain(args.iter().copied());
        run(Cli::parse_from(argv)).unwrap()
    }

    fn add_alice(dir: &TempDir) -> String {
        assert!(run_in(
            dir,
            &[
                "add",
                "--name",
                "Alice",
                "--phone",
                "9876543210",
                "--email",
                "alice@x.com",
                "--city",
                "Pune",
                "--details",
                "met at the expo",
            ],
        ));
        RecordStore::new(dir.path()).load_all().unwrap()[0].id.clone()
    }

    #[test]
    fn edit_changes_only_the_given_fields() {
        let dir = TempDir::new().unwrap();
        let id = add_alice(&dir);

        assert!(run_in(&dir, &["edit", &id, "--city", "Mumbai"]));

        let entries = RecordStore::new(dir.path()).load_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, id);
        assert_eq!(entries[0].city, "Mumbai");
        assert_eq!(entries[0].name, "Alice");
        assert_eq!(entries[0].phone, "9876543210");
        assert_eq!(entries[0].email, "alice@x.com");
        assert_eq!(entries[0].details, "met at the expo");
    }

    #[test]
    fn edit_of_an_unknown_id_fails_without_writing() {
        let dir = TempDir::new().unwrap();
        add_alice(&dir);
        let before = RecordStore::new(dir.path()).export_bytes().unwrap();

        assert!(!run_in(&dir, &["edit", "404", "--city", "Mumbai"]));
        assert_eq!(RecordStore::new(dir.path()).export_bytes().unwrap(), before);
    }

    #[test]
    fn add_with_missing_required_flags_is_rejected() {
        let dir = TempDir::new().unwrap();
        assert!(!run_in(&dir, &["add", "--name", "Bob"]));
        assert!(RecordStore::new(dir.path()).load_all().unwrap().is_empty());
    }

    #[test]
    fn delete_removes_the_entry() {
        let dir = TempDir::new().unwrap();
        let id = add_alice(&dir);
        assert!(run_in(&dir, &["delete", &id]));
        assert!(RecordStore::new(dir.path()).load_all().unwrap().is_empty());
    }
}
