use std::path::PathBuf;

use clap::{value_parser, Arg, Command};

fn id_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .help(help)
        .required(true)
        .value_parser(value_parser!(i64))
}

/// Commands shared by the CLI and the REPL.
fn commands() -> Vec<Command> {
    vec![
        Command::new("books")
            .about("List, show, add, edit or remove books")
            .subcommand_required(true)
            .subcommand(Command::new("list").about("List every book in the catalog"))
            .subcommand(
                Command::new("show")
                    .about("Show a book with its copies")
                    .arg(id_arg("id", "Book id")),
            )
            .subcommand(Command::new("add").about("Add a book"))
            .subcommand(
                Command::new("edit")
                    .about("Edit a book")
                    .arg(id_arg("id", "Book id")),
            )
            .subcommand(
                Command::new("remove")
                    .about("Remove a book")
                    .arg(id_arg("id", "Book id")),
            ),
        Command::new("genres")
            .about("List, add, edit or remove genres")
            .subcommand_required(true)
            .subcommand(Command::new("list").about("List every genre"))
            .subcommand(Command::new("add").about("Add a genre"))
            .subcommand(
                Command::new("edit")
                    .about("Edit a genre")
                    .arg(id_arg("id", "Genre id")),
            )
            .subcommand(
                Command::new("remove")
                    .about("Remove a genre")
                    .arg(id_arg("id", "Genre id")),
            ),
        Command::new("copies")
            .about("Manage the copies of a book")
            .subcommand_required(true)
            .subcommand(
                Command::new("list")
                    .about("List the copies of a book")
                    .arg(id_arg("book", "Book id")),
            )
            .subcommand(
                Command::new("add")
                    .about("Add a copy of a book")
                    .arg(id_arg("book", "Book id")),
            )
            .subcommand(
                Command::new("edit")
                    .about("Edit a copy")
                    .arg(id_arg("book", "Book id"))
                    .arg(id_arg("copy", "Copy id")),
            )
            .subcommand(
                Command::new("remove")
                    .about("Remove a copy")
                    .arg(id_arg("book", "Book id"))
                    .arg(id_arg("copy", "Copy id")),
            ),
        Command::new("export")
            .about("Export the catalog as CSV")
            .subcommand_required(true)
            .subcommand(
                Command::new("books").about("Export every book").arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Write to this file instead of stdout")
                        .value_parser(value_parser!(PathBuf)),
                ),
            ),
        Command::new("config").about("Print the default configuration"),
    ]
}

pub fn arg_parser_cli() -> Command {
    Command::new("shelfadmin")
        .about("Library catalog administration")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("Configuration file to read")
                .value_parser(value_parser!(PathBuf)),
        )
        .subcommands(commands())
        .subcommand(Command::new("repl").about("Launch a read eval print loop"))
}

pub fn arg_parser_repl() -> Command {
    Command::new("shelfadmin")
        .multicall(true)
        .subcommand_required(true)
        .subcommands(commands())
        .subcommand(Command::new("exit").about("Leave the REPL"))
}

pub fn generate_completions() -> Vec<String> {
    let cmd = arg_parser_repl();
    fn add_command(parent_fn_name: &str, cmd: &Command, subcmds: &mut Vec<String>) {
        let fn_name = format!("{parent_fn_name} {}", cmd.get_name())
            .trim()
            .to_string();
        subcmds.push(fn_name.clone());
        for subcmd in cmd.get_subcommands() {
            add_command(&fn_name, subcmd, subcmds);
        }
    }
    let mut subcmds = vec![];
    for subcmd in cmd.get_subcommands() {
        add_command("", subcmd, &mut subcmds);
    }
    subcmds.sort();
    subcmds
}
