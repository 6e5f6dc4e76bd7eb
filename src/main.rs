use anyhow::Result;
use clap::{Parser, Subcommand};

use scrooge::cli::{
    handle_backup_command, handle_import_command, handle_log_command, handle_month_command,
    handle_show_command, handle_tag_command, handle_track_command, BackupCommands, ImportArgs,
    LogArgs, MonthArgs, ShowArgs, TagCommands, TrackArgs,
};
use scrooge::config::{ScroogePaths, Settings};
use scrooge::storage::Storage;

#[derive(Parser)]
#[command(
    name = "scrooge",
    version,
    about = "A command line based manager for personal finances",
    long_about = "scrooge tracks expenses in monthly logs, sorts them into buckets \
                  and tags, and compares each month's spending against guideline \
                  shares of the available income."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Track an expense
    Track(TrackArgs),

    /// Show expenses grouped by their tags
    Show(ShowArgs),

    /// Analyse the spending of a month
    Month(MonthArgs),

    /// Manage tags
    #[command(subcommand)]
    Tags(TagCommands),

    /// Import expenses from a ';'-separated CSV file
    Import(ImportArgs),

    /// Back up or restore the stored data
    Backup {
        #[command(subcommand)]
        command: Option<BackupCommands>,
    },

    /// Show recent changes
    Log(LogArgs),

    /// Write a sample configuration and default settings
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = ScroogePaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    let Some(command) = cli.command else {
        println!("scrooge - personal finances from the command line");
        println!();
        println!("Run 'scrooge --help' for usage information.");
        println!("Run 'scrooge init' to create a sample configuration.");
        return Ok(());
    };

    if let Commands::Init = command {
        println!("Initializing scrooge at: {}", paths.base_dir().display());
        let report = scrooge::storage::init::initialize_storage(&paths)?;
        if report.wrote_config {
            println!("Wrote sample configuration: {}", paths.user_config_file().display());
        } else {
            println!("Kept existing configuration: {}", paths.user_config_file().display());
        }
        if report.wrote_settings {
            println!("Wrote default settings: {}", paths.settings_file().display());
        }
        println!("Initialization complete!");
        return Ok(());
    }

    if let Commands::Config = command {
        println!("scrooge Configuration");
        println!("=====================");
        println!("Config directory: {}", paths.base_dir().display());
        println!("User config:      {}", paths.user_config_file().display());
        println!("Data directory:   {}", paths.data_dir().display());
        println!("Backup directory: {}", paths.backup_dir().display());
        println!("Audit log:        {}", paths.audit_log().display());
        println!();
        println!("Settings:");
        println!("  Currency symbol: {}", settings.currency_symbol);
        println!("  Date format:     {}", settings.date_format);
        println!("  Backups kept:    {}", settings.backups_kept);
        return Ok(());
    }

    let storage = Storage::open(paths)?;

    match command {
        Commands::Track(args) => handle_track_command(&storage, &settings, args)?,
        Commands::Show(args) => handle_show_command(&storage, &settings, args)?,
        Commands::Month(args) => handle_month_command(&storage, &settings, args)?,
        Commands::Tags(cmd) => handle_tag_command(&storage, cmd)?,
        Commands::Import(args) => handle_import_command(&storage, &settings, args)?,
        Commands::Backup { command } => handle_backup_command(&storage, &settings, command)?,
        Commands::Log(args) => handle_log_command(&storage, args)?,
        Commands::Init | Commands::Config => {}
    }

    Ok(())
}
