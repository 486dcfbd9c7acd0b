use crate::controller::{Controller, Mode, NoticeKind, Outcome};
use crate::entry::{Entry, Field};
use std::io::{self, BufRead, Write};

const HELP: &str = "\
Commands:
  name|phone|email|city|details <value>   Set a form field
  save                                    Save (or update while editing)
  edit <id>                               Load an entry into the form
  cancel                                  Leave edit mode
  delete <id>                             Delete an entry
  list                                    Show saved entries
  share                                   Share the Excel file
  help                                    Show this help
  q                                       Quit";

/// Render one entry the way the saved-entries list shows it
pub fn format_entry(entry: &Entry) -> String {
    let mut out = format!(
        "[{}]\n  Name: {}\n  Phone: {}\n  Email: {}\n  City: {}\n",
        entry.id, entry.name, entry.phone, entry.email, entry.city
    );
    if !entry.details.is_empty() {
        out.push_str(&format!("  Details: {}\n", entry.details));
    }
    out.push_str(&format!("  Date: {}\n  Time: {}\n", entry.date, entry.time));
    out
}

fn print_form<W: Write>(controller: &Controller, out: &mut W) -> io::Result<()> {
    let state = controller.state();
    let title = match &state.mode {
        Mode::Creating => "Add New Entry".to_string(),
        Mode::Editing { id } => format!("Edit Entry {}", id),
    };
    writeln!(out, "== {} ==", title)?;
    for field in Field::ALL {
        writeln!(out, "  {:<15} {}", field.label(), state.form.get(field))?;
        let error = state.errors.get(field);
        if !error.is_empty() {
            writeln!(out, "  {:<15} ! {}", "", error)?;
        }
    }
    Ok(())
}

fn print_list<W: Write>(controller: &Controller, out: &mut W) -> io::Result<()> {
    if controller.entries().is_empty() {
        writeln!(out, "No saved entries")?;
        return Ok(());
    }
    writeln!(out, "== Saved Entries ==")?;
    for entry in controller.entries() {
        write!(out, "{}", format_entry(entry))?;
    }
    Ok(())
}

/// Run the form until `q` or end of input.
///
/// `input` and `out` are generic so the loop can be driven from a script.
pub fn run<R: BufRead, W: Write>(controller: &mut Controller, input: R, mut out: W) -> io::Result<()> {
    controller.start();
    print_list(controller, &mut out)?;

    let mut lines = input.lines();
    loop {
        if let Some(notice) = controller.take_notice() {
            let tag = match notice.kind {
                NoticeKind::Success => "Success",
                NoticeKind::Error => "Error",
            };
            writeln!(out, "{}: {}", tag, notice.message)?;
        }
        print_form(controller, &mut out)?;

        let label = if controller.mode().editing_id().is_some() { "update" } else { "save" };
        write!(out, "({}) > ", label)?;
        out.flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let command = line.trim();
        let (verb, rest) = match command.split_once(' ') {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (command, ""),
        };

        match verb {
            "" => {}
            "q" | "quit" => break,
            "help" => writeln!(out, "{}", HELP)?,
            "list" => print_list(controller, &mut out)?,
            "save" | "update" => {
                if controller.submit() != Outcome::Rejected {
                    print_list(controller, &mut out)?;
                }
            }
            "edit" => {
                if !controller.begin_edit(rest) {
                    writeln!(out, "No entry with id {}", rest)?;
                }
            }
            "cancel" => controller.cancel_edit(),
            "delete" => {
                controller.delete(rest);
                print_list(controller, &mut out)?;
            }
            "share" => {
                controller.share();
            }
            other => match Field::from_strng(other) {
                Some(field) => controller.set_field(field, rest),
                None => writeln!(out, "invalid command: {}", other)?,
            },
        }
    }

    Ok(())
}
