use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "code2md",
    author,
    version,
    about = "Flatten project code into a single Markdown file.",
    long_about = "code2md collects the source files of a project, filtered by project type \nand exclusion patterns, and writes them into one Markdown document with a \ntable of contents, a folder tree and syntax-highlighted code blocks.",
    help_template = "{about-section}\nUsage: {usage}\n\n{all-args}{after-help}",
    after_help = "EXAMPLES:\n  code2md ./my-project --type python\n  code2md ./fullstack-app --type vue,python --output project.md\n  code2md ./app --type react --ext .env .graphql\n  code2md ./code --type node --exclude tests/ fixtures/\n  code2md --list-types"
)]
pub struct Cli {
    #[arg(
        value_name = "DIRECTORY",
        help = "Project directory (default: current directory)."
    )]
    pub directory: Option<PathBuf>,

    #[arg(
        short = 't',
        long = "type",
        value_name = "TYPES",
        action = clap::ArgAction::Append,
        help = "Project type(s), comma-separated (e.g. python,vue,config).",
        help_heading = "Selection"
    )]
    pub types: Vec<String>,

    #[arg(
        short = 'e',
        long = "ext",
        value_name = "EXT",
        num_args = 1..,
        action = clap::ArgAction::Append,
        help = "Additional file extensions (e.g. .env .graphql).",
        help_heading = "Selection"
    )]
    pub extensions: Vec<String>,

    #[arg(
        short = 'x',
        long = "exclude",
        value_name = "PATTERN",
        num_args = 1..,
        action = clap::ArgAction::Append,
        help = "Additional excludes (directory/file names, *suffix, or path fragments).",
        help_heading = "Selection"
    )]
    pub excludes: Vec<String>,

    #[arg(
        long,
        help = "Disable the built-in exclude list.",
        help_heading = "Selection"
    )]
    pub no_default_excludes: bool,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Output file (default: <DIRECTORY>/<project>_code.md).",
        help_heading = "Output"
    )]
    pub output: Option<PathBuf>,

    #[arg(
        short = 'n',
        long,
        value_name = "NAME",
        help = "Project name used in the header (default: directory name).",
        help_heading = "Output"
    )]
    pub name: Option<String>,

    #[arg(
        long,
        help = "Omit the folder structure section.",
        help_heading = "Output"
    )]
    pub no_tree: bool,

    #[arg(long, help = "List available project types and exit.")]
    pub list_types: bool,

    #[arg(
        long,
        value_name = "CONFIG_FILE",
        conflicts_with = "no_config",
        help = "Path of the TOML config file (default: <DIRECTORY>/code2md.toml).",
        help_heading = "Configuration"
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        conflicts_with = "config",
        help = "Do not load any TOML config file.",
        help_heading = "Configuration"
    )]
    pub no_config: bool,

    #[arg(
        long,
        help = "Abort on unreadable directories instead of skipping them.",
        help_heading = "Configuration"
    )]
    pub strict: bool,

    #[arg(short, long, action = clap::ArgAction::Count, help = "Increase message verbosity (-v, -vv).")]
    pub verbose: u8,

    #[arg(short, long, help = "Silence informational messages and warnings.")]
    pub quiet: bool,
}
