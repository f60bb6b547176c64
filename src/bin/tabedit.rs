//! Tabedit CLI - Structural edits on LaTeX tabular environments

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand, ValueEnum};
#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::io::{self, Read, Write};
#[cfg(feature = "cli")]
use tabedit::{
    apply_command, core::ColumnAlignment, parse_table, parse_table_at, BorderTheme, CellPosition,
    Direction, EditOptions, TableCommand, TableError, TableSelection,
};
#[cfg(feature = "cli")]
use tracing_subscriber::EnvFilter;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "tabedit")]
#[command(version)]
#[command(about = "Tabedit - Structural edits on LaTeX tabular environments", long_about = None)]
struct Cli {
    /// Edit to perform
    #[command(subcommand)]
    command: Commands,

    /// Input file path (reads from stdin if not provided)
    input_file: Option<String>,

    /// Output file path (writes to stdout if not provided)
    #[arg(short, long)]
    output: Option<String>,

    /// Byte offset inside the table to edit (defaults to the first table)
    #[arg(long)]
    at: Option<usize>,

    /// Selected cells as `ROW,COL` or `ROW,COL:ROW,COL`
    #[arg(short, long, value_parser = parse_selection)]
    select: Option<TableSelection>,

    /// JSON file with edit options
    #[arg(long)]
    options: Option<String>,

    /// Merge into centred cells without inheriting borders
    #[arg(long)]
    legacy: bool,

    /// Print the planned changes as JSON instead of the edited document
    #[arg(long)]
    json: bool,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Add or remove all borders
    Borders {
        #[arg(value_enum)]
        theme: ThemeArg,
    },
    /// Set the alignment of the selected columns or merged cell
    Align {
        #[arg(value_enum)]
        alignment: AlignArg,
    },
    /// Insert an empty row next to the selection
    InsertRow {
        /// Insert above the selection instead of below
        #[arg(long)]
        above: bool,
    },
    /// Insert an empty column next to the selection
    InsertColumn {
        /// Insert before the selection instead of after
        #[arg(long)]
        before: bool,
    },
    /// Remove the selected rows, columns or cells
    Remove,
    /// Merge the selected cells of one row
    Merge,
    /// Split the selected merged cell
    Unmerge,
    /// Move or remove the caption
    Caption {
        #[arg(value_enum)]
        placement: CaptionArg,
    },
    /// Print the scanned table structure as JSON
    Inspect,
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, ValueEnum)]
enum ThemeArg {
    None,
    Full,
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, ValueEnum)]
enum AlignArg {
    Left,
    Center,
    Right,
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, ValueEnum)]
enum CaptionArg {
    Above,
    Below,
    Remove,
}

#[cfg(feature = "cli")]
impl Commands {
    fn to_table_command(&self) -> Option<TableCommand> {
        let command = match self {
            Commands::Borders { theme } => TableCommand::SetBorders {
                theme: match theme {
                    ThemeArg::None => BorderTheme::NoBorders,
                    ThemeArg::Full => BorderTheme::FullyBordered,
                },
            },
            Commands::Align { alignment } => TableCommand::SetAlignment {
                alignment: match alignment {
                    AlignArg::Left => ColumnAlignment::Left,
                    AlignArg::Center => ColumnAlignment::Center,
                    AlignArg::Right => ColumnAlignment::Right,
                },
            },
            Commands::InsertRow { above } => TableCommand::InsertRow { below: !above },
            Commands::InsertColumn { before } => TableCommand::InsertColumn { after: !before },
            Commands::Remove => TableCommand::RemoveRowsOrColumns,
            Commands::Merge => TableCommand::MergeCells,
            Commands::Unmerge => TableCommand::UnmergeCells,
            Commands::Caption { placement } => match placement {
                CaptionArg::Above => TableCommand::MoveCaption {
                    target: Direction::Above,
                },
                CaptionArg::Below => TableCommand::MoveCaption {
                    target: Direction::Below,
                },
                CaptionArg::Remove => TableCommand::RemoveCaption,
            },
            Commands::Inspect => return None,
        };
        Some(command)
    }
}

#[cfg(feature = "cli")]
fn parse_position(s: &str) -> Result<CellPosition, String> {
    let (row, cell) = s
        .split_once(',')
        .ok_or_else(|| format!("expected ROW,COL but got '{}'", s))?;
    let row = row.trim().parse().map_err(|_| format!("invalid row '{}'", row))?;
    let cell = cell
        .trim()
        .parse()
        .map_err(|_| format!("invalid column '{}'", cell))?;
    Ok(CellPosition::new(row, cell))
}

#[cfg(feature = "cli")]
fn parse_selection(s: &str) -> Result<TableSelection, String> {
    match s.split_once(':') {
        Some((from, to)) => Ok(TableSelection::new(parse_position(from)?, parse_position(to)?)),
        None => {
            let position = parse_position(s)?;
            Ok(TableSelection::new(position, position))
        }
    }
}

#[cfg(feature = "cli")]
fn load_options(cli: &Cli) -> io::Result<EditOptions> {
    let mut options = match cli.options {
        Some(ref path) => serde_json::from_str(&fs::read_to_string(path)?)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?,
        None => EditOptions::default(),
    };
    if cli.legacy {
        options.merge_inherits_borders = false;
    }
    Ok(options)
}

#[cfg(feature = "cli")]
fn fail(error: TableError) -> ! {
    eprintln!("Error: {}", error);
    std::process::exit(1);
}

#[cfg(feature = "cli")]
fn main() -> io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tabedit=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .init();

    let cli = Cli::parse();
    let options = load_options(&cli)?;

    let input = match cli.input_file {
        Some(ref path) => fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let offset = match cli.at {
        Some(offset) => offset,
        None => match parse_table(&input) {
            Ok(snapshot) => snapshot.positions.tabular.from,
            Err(e) => fail(e),
        },
    };

    let Some(command) = cli.command.to_table_command() else {
        let snapshot = parse_table_at(&input, offset).unwrap_or_else(|e| fail(e));
        let json = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        println!("{}", json);
        return Ok(());
    };

    let result = apply_command(&input, offset, cli.select, &command, &options)
        .unwrap_or_else(|e| fail(e));
    if result.changes.is_empty() {
        eprintln!("Note: {} made no changes", command.name());
    }

    let output = if cli.json {
        let json = serde_json::json!({
            "changes": result.changes,
            "selection": result.selection,
        });
        serde_json::to_string_pretty(&json)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?
    } else {
        result.document
    };

    match cli.output {
        Some(ref path) => {
            fs::write(path, &output)?;
            eprintln!("✓ Output written to: {}", path);
        }
        None => {
            let mut stdout = io::stdout();
            stdout.write_all(output.as_bytes())?;
            if cli.json {
                writeln!(stdout)?;
            }
        }
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Build with --features cli");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  cargo install tabedit --features cli");
    eprintln!("  tabedit [OPTIONS] [INPUT_FILE] <COMMAND>");
}
