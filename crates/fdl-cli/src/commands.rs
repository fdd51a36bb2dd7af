use anyhow::{bail, Context};
use colored::Colorize;
use fdl_sdk::{
    DepositEntry, DepositId, DepositRequest, DepositVault, FileCheck, FileHash, LoadOutcome,
    OwnedLookup, OwnerId, ReportEntry, VaultConfig,
};
use serde::Serialize;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_config(&cli)?;
    let format = cli.format;
    if let Command::Config(_) = cli.command {
        return cmd_config(&config, format);
    }

    let vault = DepositVault::open(config.clone())
        .with_context(|| format!("opening vault in {}", config.data_dir.display()))?;
    if let LoadOutcome::Recovered { reason } = vault.load_outcome()? {
        eprintln!("{} chain snapshot was unreadable and has been reset ({reason})", "warning:".yellow().bold());
    }

    let result = match cli.command {
        Command::Init(_) => cmd_init(&vault, &config, format),
        Command::Status(_) => cmd_status(&vault, format),
        Command::Deposit(args) => cmd_deposit(&vault, args, format),
        Command::Verify(_) => cmd_verify(&vault, format),
        Command::Show(args) => cmd_show(&vault, args, format),
        Command::Find(args) => cmd_find(&vault, args, format),
        Command::Search(args) => {
            let owner = parse_owner(&args.owner)?;
            print_entries(&vault.search(&owner, &args.name)?, format)
        }
        Command::List(args) => {
            let owner = parse_owner(&args.owner)?;
            print_entries(&vault.deposits_of(&owner)?, format)
        }
        Command::Check(args) => cmd_check(&vault, args, format),
        Command::Report(args) => cmd_report(&vault, args, format),
        Command::Config(_) => Ok(()),
    };
    vault.shutdown()?;
    result
}

fn resolve_config(cli: &Cli) -> anyhow::Result<VaultConfig> {
    let mut config = match &cli.config {
        Some(path) => VaultConfig::load(path)?,
        None => VaultConfig::default(),
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    Ok(config)
}

fn parse_owner(raw: &str) -> anyhow::Result<OwnerId> {
    raw.parse().with_context(|| format!("invalid owner id {raw:?}"))
}

fn parse_id(raw: &str) -> anyhow::Result<DepositId> {
    raw.parse().with_context(|| format!("invalid deposit id {raw:?}"))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_entry(entry: &DepositEntry) {
    let r = &entry.record;
    println!("{}  {}", r.id.to_string().yellow().bold(), r.file_name.bold());
    println!("  Owner: {}", r.owner_id);
    println!("  File hash: {}", r.file_hash.as_str().cyan());
    println!("  Size: {} bytes, type {}", r.file_size, r.file_type);
    println!("  Deposited: {}", r.deposit_time);
    println!(
        "  Block: #{} {} (prev {})",
        entry.block.index,
        entry.block.hash.short().dimmed(),
        entry.block.prev_hash.short().dimmed()
    );
}

fn print_entries(entries: &[DepositEntry], format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        return print_json(&entries);
    }
    if entries.is_empty() {
        println!("No deposits found.");
    }
    for entry in entries {
        print_entry(entry);
    }
    Ok(())
}

fn cmd_init(vault: &DepositVault, config: &VaultConfig, format: OutputFormat) -> anyhow::Result<()> {
    let status = vault.status()?;
    if format == OutputFormat::Json {
        return print_json(&status);
    }
    println!("{} Deposit ledger ready in {}", "✓".green().bold(), config.data_dir.display().to_string().bold());
    println!("  Chain: {}", config.chain_path().display());
    println!("  Blocks: {}, tail {}", status.blocks, status.latest_hash.short().yellow());
    Ok(())
}

fn cmd_status(vault: &DepositVault, format: OutputFormat) -> anyhow::Result<()> {
    let status = vault.status()?;
    if format == OutputFormat::Json {
        return print_json(&status);
    }
    println!("Blocks: {} ({} deposits)", status.blocks.to_string().bold(), status.deposits);
    println!("Tail: #{} {}", status.latest_index, status.latest_hash.as_str().yellow());
    println!("Loaded: {}", status.load_outcome);
    Ok(())
}

fn cmd_deposit(vault: &DepositVault, args: DepositArgs, format: OutputFormat) -> anyhow::Result<()> {
    let owner = parse_owner(&args.owner)?;
    let receipt = match (args.file, args.file_hash, args.name, args.size) {
        (Some(path), _, _, _) => vault.deposit_file(&path, owner, args.file_type)?,
        (None, Some(hash), Some(name), Some(size)) => {
            let file_hash = FileHash::parse_sha256(&hash).context("file hash must be 64 hex digits")?;
            vault.deposit(DepositRequest {
                file_hash,
                file_name: name,
                file_size: size,
                file_type: args.file_type,
                owner_id: owner,
            })?
        }
        _ => bail!("pass a file hash with --name and --size, or --file"),
    };

    if format == OutputFormat::Json {
        return print_json(&receipt);
    }
    println!("{} Deposit {} recorded", "✓".green().bold(), receipt.deposit_id.to_string().yellow().bold());
    println!("  Block: #{} {}", receipt.block_index, receipt.block_hash.as_str());
    println!("  Previous: {}", receipt.prev_block_hash.as_str().dimmed());
    Ok(())
}

fn cmd_verify(vault: &DepositVault, format: OutputFormat) -> anyhow::Result<()> {
    let result = vault.verify()?;
    if format == OutputFormat::Json {
        print_json(&result)?;
    } else if result.ok {
        println!("{} Deposit chain intact ({} blocks)", "✓".green().bold(), result.blocks_checked);
    } else {
        println!("{} Deposit chain tampered", "✗".red().bold());
        if let (Some(index), Some(reason)) = (result.first_bad_index, result.reason) {
            println!("  First bad block: #{}", index.to_string().red());
            println!("  Reason: {reason}");
        }
    }
    if !result.ok {
        bail!("chain integrity check failed");
    }
    Ok(())
}

fn cmd_show(vault: &DepositVault, args: ShowArgs, format: OutputFormat) -> anyhow::Result<()> {
    let id = parse_id(&args.deposit_id)?;
    let entry = match &args.owner {
        Some(owner) => match vault.owned_deposit(&id, &parse_owner(owner)?)? {
            OwnedLookup::Found(entry) => Some(entry),
            OwnedLookup::NotFound => None,
            OwnedLookup::OtherOwner => bail!("deposit {id} belongs to another owner"),
        },
        None => vault.deposit_by_id(&id)?,
    };
    match entry {
        Some(entry) if format == OutputFormat::Json => print_json(&entry),
        Some(entry) => {
            print_entry(&entry);
            Ok(())
        }
        None => bail!("no deposit with id {id}"),
    }
}

fn cmd_find(vault: &DepositVault, args: FindArgs, format: OutputFormat) -> anyhow::Result<()> {
    match vault.check_file_hash(&args.file_hash.to_lowercase())? {
        FileCheck::Intact { entry } if format == OutputFormat::Json => print_json(&entry),
        FileCheck::Intact { entry } => {
            print_entry(&entry);
            Ok(())
        }
        FileCheck::ChainTampered { index, kind } => {
            bail!("chain tampered at block #{index} ({kind}); refusing to answer")
        }
        _ => bail!("no deposit of file {}", args.file_hash),
    }
}

fn cmd_check(vault: &DepositVault, args: CheckArgs, format: OutputFormat) -> anyhow::Result<()> {
    let id = parse_id(&args.deposit_id)?;
    let check = vault.check_file(&id, &args.file_hash)?;
    if format == OutputFormat::Json {
        print_json(&check)?;
    } else {
        match &check {
            FileCheck::Intact { entry } => {
                println!("{} {} matches deposit {}", "✓".green().bold(), entry.record.file_name.bold(), id);
            }
            FileCheck::FileTampered { expected, actual, .. } => {
                println!("{} File does not match deposit {}", "✗".red().bold(), id);
                println!("  Recorded: {}", expected.green());
                println!("  Supplied: {}", actual.red());
            }
            FileCheck::ChainTampered { index, kind } => {
                println!("{} Chain tampered at block #{} ({})", "✗".red().bold(), index, kind);
            }
            FileCheck::UnknownDeposit | FileCheck::UnknownFile => {
                println!("No deposit with id {}", id.to_string().yellow());
            }
        }
    }
    if !check.is_intact() {
        bail!("file check failed");
    }
    Ok(())
}

fn cmd_report(vault: &DepositVault, args: ReportArgs, format: OutputFormat) -> anyhow::Result<()> {
    let id = parse_id(&args.deposit_id)?;
    let entry = match vault.report_entry(&id)? {
        ReportEntry::Found { entry } => entry,
        ReportEntry::UnknownDeposit => bail!("no deposit with id {id}"),
        ReportEntry::ChainTampered { index, kind } => {
            bail!("chain tampered at block #{index} ({kind}); no report issued")
        }
    };
    if format == OutputFormat::Json {
        return print_json(&entry);
    }
    println!("{}", "Deposit certificate".bold().underline());
    print_entry(&entry);
    println!("  Block time: {}", entry.block.timestamp);
    println!("  Block hash: {}", entry.block.hash.as_str());
    Ok(())
}

fn cmd_config(config: &VaultConfig, format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        return print_json(config);
    }
    print!("{}", config.to_toml()?);
    Ok(())
}
