use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "investments",
    version,
    about = "terminal client for the investments REST API",
    long_about = "Lists, adds, edits and deletes investment records held by an investments API.\n\nExamples:\n  investments list\n  investments add --name \"Tesouro Selic 2029\" --kind \"Renda Fixa\" --value 1000.50 --date 2024-05-29\n  investments edit 3 --value 1200\n  investments delete 3 --yes\n  investments export -o investments.html\n  investments            (interactive shell)\n\nTip: Use --config to persist the API URL and keep CLI invocations short."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "vb",
        visible_alias = "verbose",
        action = ArgAction::Count,
        global = true,
        help_heading = "Output",
        help = "Increase log verbosity (-v, -vv, -vvv)."
    )]
    pub verbose: u8,

    #[arg(
        short = 'c',
        long = "clr",
        visible_alias = "color",
        global = true,
        help_heading = "Output",
        help = "Enable colored output (overrides --no-color)."
    )]
    pub color: bool,

    #[arg(
        short = 'n',
        long = "nc",
        visible_alias = "no-color",
        global = true,
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        long = "cur",
        visible_alias = "currency",
        value_name = "SYMBOL",
        global = true,
        help_heading = "Output",
        help = "Currency marker printed before every value (default R$)."
    )]
    pub currency: Option<String>,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        global = true,
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.investments/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        short = 'u',
        long = "u",
        visible_aliases = ["url", "base-url"],
        value_name = "URL",
        global = true,
        help_heading = "HTTP",
        help = "Collection endpoint of the investments API."
    )]
    pub base_url: Option<String>,

    #[arg(
        short = 't',
        long = "to",
        visible_alias = "timeout",
        value_name = "SECONDS",
        global = true,
        help_heading = "HTTP",
        help = "Request timeout in seconds (0 = none)."
    )]
    pub timeout: Option<u64>,

    #[arg(
        short = 'y',
        long = "yes",
        visible_alias = "assume-yes",
        global = true,
        help_heading = "Input",
        help = "Answer delete confirmations with yes."
    )]
    pub assume_yes: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Fetch every investment and print the table.
    List,

    /// Load one investment into the form and print it.
    Show {
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Create an investment.
    Add(RecordArgs),

    /// Load an investment, apply the given fields and save it.
    Edit {
        #[arg(value_name = "ID")]
        id: String,

        #[command(flatten)]
        fields: RecordArgs,
    },

    /// Delete an investment after confirmation.
    Delete {
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Write the current table to a file (text, json or html).
    Export {
        #[arg(
            short = 'o',
            long = "out",
            visible_alias = "output",
            value_name = "FILE",
            help = "Output file path (stdout when omitted)."
        )]
        output: Option<String>,

        #[arg(
            short = 'f',
            long = "of",
            visible_alias = "output-format",
            value_name = "FORMAT",
            help = "Output format: text, json, html (inferred from file extension when omitted)."
        )]
        output_format: Option<String>,
    },

    /// Interactive shell keeping the form between commands.
    Shell,

    /// Write a commented default config file if none exists.
    InitConfig,
}

#[derive(Args, Debug, Clone, Default)]
pub struct RecordArgs {
    #[arg(long = "name", visible_alias = "nome", value_name = "TEXT", help = "Display name.")]
    pub name: Option<String>,

    #[arg(long = "kind", visible_aliases = ["type", "tipo"], value_name = "TEXT", help = "Category.")]
    pub kind: Option<String>,

    #[arg(
        long = "value",
        visible_alias = "valor",
        value_name = "AMOUNT",
        allow_hyphen_values = true,
        help = "Amount, e.g. 1000.50."
    )]
    pub value: Option<String>,

    #[arg(
        long = "date",
        visible_alias = "data",
        value_name = "YYYY-MM-DD",
        help = "Investment date."
    )]
    pub date: Option<String>,
}

impl RecordArgs {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.kind.is_none() && self.value.is_none() && self.date.is_none()
    }
}
