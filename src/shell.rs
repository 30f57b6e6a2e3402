use std::io::{self, Write};

use colored::Colorize;

use crate::api::InvestmentApi;
use crate::client::{Field, InvestmentClient};
use crate::model::InvestmentId;
use crate::view::terminal::{print_form, read_line};
use crate::view::{Dialogs, View};

const HELP: &str = "\
Commands:
  list                 reload the table
  edit ID              load an investment into the form
  delete ID            delete an investment (asks for confirmation)
  set FIELD VALUE      fill a form field (name, kind, value, date)
  form                 show the form
  save                 submit the form (add or update)
  cancel               clear the form and go back to add mode
  help                 show this message
  quit                 leave the shell";

#[derive(Clone, Debug, PartialEq)]
pub enum ShellCommand {
    List,
    Edit(InvestmentId),
    Delete(InvestmentId),
    Set(Field, String),
    Form,
    Save,
    Cancel,
    Help,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

fn parse_id(rest: &str, usage: &str) -> Result<InvestmentId, String> {
    rest.parse::<InvestmentId>()
        .map_err(|_| format!("usage: {usage}"))
}

/// `Ok(None)` for blank lines and `#` comments.
pub fn parse_command(line: &str) -> Result<Option<ShellCommand>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };
    let command = match head.to_lowercase().as_str() {
        "list" | "ls" | "l" => ShellCommand::List,
        "edit" | "e" => ShellCommand::Edit(parse_id(rest, "edit ID")?),
        "delete" | "rm" | "d" => ShellCommand::Delete(parse_id(rest, "delete ID")?),
        "set" | "s" => {
            let (field, value) = match rest.split_once(char::is_whitespace) {
                Some((field, value)) => (field, value.trim()),
                None => (rest, ""),
            };
            if field.is_empty() {
                return Err("usage: set FIELD VALUE".to_string());
            }
            ShellCommand::Set(field.parse::<Field>()?, value.to_string())
        }
        "form" | "f" => ShellCommand::Form,
        "save" | "submit" => ShellCommand::Save,
        "cancel" | "reset" => ShellCommand::Cancel,
        "help" | "h" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        other => return Err(format!("unknown command '{other}', type 'help'")),
    };
    Ok(Some(command))
}

pub async fn execute<A, V>(client: &mut InvestmentClient<A, V>, command: ShellCommand) -> Flow
where
    A: InvestmentApi,
    V: View + Dialogs,
{
    match command {
        ShellCommand::List => {
            client.list().await;
        }
        ShellCommand::Edit(id) => {
            client.begin_edit(&id).await;
        }
        ShellCommand::Delete(id) => {
            client.delete(&id).await;
        }
        ShellCommand::Set(field, value) => client.set_field(field, value),
        ShellCommand::Form => print_form(client.form()),
        ShellCommand::Save => {
            client.save().await;
        }
        ShellCommand::Cancel => client.cancel_edit(),
        ShellCommand::Help => println!("{HELP}"),
        ShellCommand::Quit => return Flow::Exit,
    }
    Flow::Continue
}

/// Loads the table, then reads commands from stdin until `quit` or EOF.
pub async fn run<A, V>(client: &mut InvestmentClient<A, V>) -> Result<(), String>
where
    A: InvestmentApi,
    V: View + Dialogs,
{
    client.list().await;
    println!("Type 'help' for the list of commands.");
    loop {
        print!("{} ", "investments>".bold().cyan());
        io::stdout()
            .flush()
            .map_err(|e| format!("failed to write prompt: {e}"))?;

        let Some(line) = read_line().await? else {
            println!();
            return Ok(());
        };
        match parse_command(&line) {
            Ok(Some(command)) => {
                if execute(client, command).await == Flow::Exit {
                    return Ok(());
                }
            }
            Ok(None) => {}
            Err(e) => println!("{}", e.red()),
        }
    }
}
