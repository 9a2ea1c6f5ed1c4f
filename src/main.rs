use clap::{Parser, Subcommand};
use shipline::commands;
use shipline::core::error::{ShipError, print_error};

/// Multi-target release publishing pipeline
#[derive(Parser)]
#[command(name = "shipline")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Run the full publishing pipeline for the current workspace
  Publish {
    /// Perform every local step but suppress all remote-mutating calls
    #[arg(long)]
    dry: bool,
    /// Snapshot channel: timestamp version, registry tag `snapshot`, no
    /// forge release or downstream manifests
    #[arg(long)]
    snapshot: bool,
  },

  /// Generate and print release notes without publishing anything
  Notes {
    /// Compare from this tag instead of the latest published release
    #[arg(long)]
    from: Option<String>,
  },

  /// List the fixed build matrix
  Targets,
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = Cli::parse();

  let result = match cli.command {
    Commands::Publish { dry, snapshot } => commands::run_publish(dry, snapshot),
    Commands::Notes { from } => commands::run_notes(from),
    Commands::Targets => commands::run_targets(),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: ShipError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
