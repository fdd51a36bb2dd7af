use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "fdl",
    about = "File Deposit Ledger: tamper-evident records of deposited files",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// TOML file with vault settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Overrides the configured data directory
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create the data directory and genesis block
    Init(InitArgs),
    /// Show chain size and tail
    Status(StatusArgs),
    /// Record a deposited file
    Deposit(DepositArgs),
    /// Verify hash chain integrity
    Verify(VerifyArgs),
    /// Show a deposit by id
    Show(ShowArgs),
    /// Find the first deposit of a file hash
    Find(FindArgs),
    /// Search an owner's deposits by file name
    Search(SearchArgs),
    /// List an owner's deposits, oldest first
    List(ListArgs),
    /// Check a file hash against a deposit
    Check(CheckArgs),
    /// Print the data behind a deposit certificate
    Report(ReportArgs),
    /// Print the effective configuration
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct InitArgs {}

#[derive(Args)]
pub struct StatusArgs {}

#[derive(Args)]
pub struct DepositArgs {
    /// SHA-256 of the file content, hex
    #[arg(required_unless_present = "file")]
    pub file_hash: Option<String>,
    /// Hash a local file instead of passing its digest
    #[arg(long, conflicts_with_all = ["file_hash", "name", "size"])]
    pub file: Option<PathBuf>,
    #[arg(long, required_unless_present = "file")]
    pub name: Option<String>,
    #[arg(long, required_unless_present = "file")]
    pub size: Option<u64>,
    #[arg(long = "type", default_value = "application/octet-stream")]
    pub file_type: String,
    #[arg(long)]
    pub owner: String,
}

#[derive(Args)]
pub struct VerifyArgs {}

#[derive(Args)]
pub struct ShowArgs {
    pub deposit_id: String,
    /// Only show the deposit if it belongs to this owner
    #[arg(long)]
    pub owner: Option<String>,
}

#[derive(Args)]
pub struct FindArgs {
    pub file_hash: String,
}

#[derive(Args)]
pub struct SearchArgs {
    pub owner: String,
    #[arg(default_value = "")]
    pub name: String,
}

#[derive(Args)]
pub struct ListArgs {
    pub owner: String,
}

#[derive(Args)]
pub struct CheckArgs {
    pub deposit_id: String,
    pub file_hash: String,
}

#[derive(Args)]
pub struct ReportArgs {
    pub deposit_id: String,
}

#[derive(Args)]
pub struct ConfigArgs {}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    #[test]
    fn parse_init() {
        let cli = Cli::try_parse_from(["fdl", "init"]).unwrap();
        assert!(matches!(cli.command, Command::Init(_)));
    }

    #[test]
    fn parse_deposit_by_hash() {
        let cli = Cli::try_parse_from([
            "fdl", "deposit", HASH, "--name", "a.pdf", "--size", "3", "--type", "application/pdf",
            "--owner", "U1",
        ])
        .unwrap();
        if let Command::Deposit(args) = cli.command {
            assert_eq!(args.file_hash.as_deref(), Some(HASH));
            assert_eq!(args.name.as_deref(), Some("a.pdf"));
            assert_eq!(args.size, Some(3));
            assert_eq!(args.file_type, "application/pdf");
            assert_eq!(args.owner, "U1");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_deposit_by_file() {
        let cli = Cli::try_parse_from(["fdl", "deposit", "--file", "thesis.pdf", "--owner", "U1"]).unwrap();
        if let Command::Deposit(args) = cli.command {
            assert_eq!(args.file, Some(PathBuf::from("thesis.pdf")));
            assert!(args.file_hash.is_none());
            assert_eq!(args.file_type, "application/octet-stream");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn deposit_by_hash_needs_name_and_size() {
        assert!(Cli::try_parse_from(["fdl", "deposit", HASH, "--owner", "U1"]).is_err());
        assert!(Cli::try_parse_from(["fdl", "deposit", HASH, "--name", "a", "--owner", "U1"]).is_err());
    }

    #[test]
    fn deposit_file_conflicts_with_hash() {
        assert!(Cli::try_parse_from([
            "fdl", "deposit", HASH, "--file", "a.pdf", "--owner", "U1",
        ])
        .is_err());
    }

    #[test]
    fn deposit_requires_owner() {
        assert!(Cli::try_parse_from(["fdl", "deposit", "--file", "a.pdf"]).is_err());
    }

    #[test]
    fn parse_show_with_owner() {
        let cli = Cli::try_parse_from(["fdl", "show", "20251127001", "--owner", "U1"]).unwrap();
        if let Command::Show(args) = cli.command {
            assert_eq!(args.deposit_id, "20251127001");
            assert_eq!(args.owner.as_deref(), Some("U1"));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_search_defaults_to_everything() {
        let cli = Cli::try_parse_from(["fdl", "search", "U1"]).unwrap();
        if let Command::Search(args) = cli.command {
            assert_eq!(args.owner, "U1");
            assert_eq!(args.name, "");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_check() {
        let cli = Cli::try_parse_from(["fdl", "check", "20251127001", HASH]).unwrap();
        if let Command::Check(args) = cli.command {
            assert_eq!(args.deposit_id, "20251127001");
            assert_eq!(args.file_hash, HASH);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_verify() {
        let cli = Cli::try_parse_from(["fdl", "verify"]).unwrap();
        assert!(matches!(cli.command, Command::Verify(_)));
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "fdl", "list", "U1", "--data-dir", "/srv/fdl", "--config", "fdl.toml", "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/srv/fdl")));
        assert_eq!(cli.config, Some(PathBuf::from("fdl.toml")));
    }

    #[test]
    fn parse_json_format() {
        let cli = Cli::try_parse_from(["fdl", "--format", "json", "status"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
    }
}
