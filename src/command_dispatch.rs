//! Purpose: Hold top-level CLI command dispatch for `shelf`.
//! Exports: `dispatch_command`.
//! Role: Keep `main.rs` focused on parse/bootstrap and delegate command execution.
//! Invariants: Command behavior, output envelopes, and exit code semantics stay unchanged.
//! Invariants: Helpers in `main.rs` remain the source of command business logic.

use super::*;

pub(super) fn dispatch_command(
    command: Command,
    shelf_file: PathBuf,
    color_mode: ColorMode,
) -> Result<RunOutcome, Error> {
    match command {
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            clap_complete::aot::generate(shell, &mut cmd, "shelf", &mut io::stdout());
            Ok(RunOutcome::ok())
        }
        Command::Version => {
            emit_version_output(color_mode);
            Ok(RunOutcome::ok())
        }
        Command::Add {
            title,
            author,
            json,
        } => {
            validate_text_field("title", &title)?;
            validate_text_field("author", &author)?;
            let mut shelf = Shelf::open(&shelf_file)?;
            let id = shelf.add_book(title, author)?;
            let record = shelf.find_book(id)?;
            if json {
                emit_json(json!({ "added": record }), color_mode);
            } else {
                println!(
                    "Added '{}' by {} (id {})",
                    record.title, record.author, record.id
                );
            }
            Ok(RunOutcome::ok())
        }
        Command::List { json } => {
            let shelf = Shelf::open(&shelf_file)?;
            let books = shelf.books();
            if json {
                emit_json(json!({ "books": books }), color_mode);
            } else if books.is_empty() {
                println!("No books on the shelf.");
            } else {
                emit_book_table(books);
            }
            Ok(RunOutcome::ok())
        }
        Command::Find { id, json } => {
            let shelf = Shelf::open(&shelf_file)?;
            let record = shelf.find_book(id).map_err(add_missing_book_hint)?;
            if json {
                emit_json(json!({ "book": record }), color_mode);
            } else {
                emit_book_details(record);
            }
            Ok(RunOutcome::ok())
        }
        Command::Issue { id, holder, json } => {
            validate_text_field("holder", &holder)?;
            let mut shelf = Shelf::open(&shelf_file)?;
            let record = shelf
                .issue_book(id, &holder)
                .map_err(add_missing_book_hint)
                .map_err(add_already_issued_hint)?;
            if json {
                emit_json(json!({ "issued": record }), color_mode);
            } else {
                println!(
                    "Issued '{}' to {} (id {})",
                    record.title, record.issued_to, record.id
                );
            }
            Ok(RunOutcome::ok())
        }
        Command::Return { id, json } => {
            let mut shelf = Shelf::open(&shelf_file)?;
            let record = shelf.return_book(id).map_err(add_missing_book_hint)?;
            if json {
                emit_json(json!({ "returned": record }), color_mode);
            } else {
                println!("Returned '{}' (id {})", record.title, record.id);
            }
            Ok(RunOutcome::ok())
        }
        Command::Delete { id, json } => {
            let mut shelf = Shelf::open(&shelf_file)?;
            let record = shelf.delete_book(id).map_err(add_missing_book_hint)?;
            if json {
                emit_json(json!({ "deleted": record }), color_mode);
            } else {
                println!("Deleted '{}' (id {})", record.title, record.id);
            }
            Ok(RunOutcome::ok())
        }
    }
}
