//! CLI commands

use elastic_core::{AccountId, Amount};
use elastic_events::EventReader;
use elastic_ledger::{verify_chain, InvariantReport, LedgerCommand, LedgerConfig, ScaledLedger};
use serde_json::json;
use std::path::Path;

use crate::context::{replay, AppContext};

/// Render a raw amount with the token's display decimals
pub fn format_units(amount: Amount, decimals: u8) -> String {
    let Some(scale) = 10u128.checked_pow(u32::from(decimals)) else {
        return amount.to_string();
    };
    let whole = amount.value() / scale;
    let frac = amount.value() % scale;
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{:0width$}", frac, width = decimals as usize);
    format!("{}.{}", whole, frac.trim_end_matches('0'))
}

fn show(ledger: &ScaledLedger, amount: Amount) -> String {
    let meta = ledger.metadata();
    format!("{} {}", format_units(amount, meta.decimals), meta.symbol)
}

/// Initialize the ledger with its genesis record
pub fn init(
    ctx: &mut AppContext,
    config: LedgerConfig,
    correlation_id: &str,
) -> Result<(), anyhow::Error> {
    if ctx.is_initialized() {
        anyhow::bail!("Ledger already initialized (sequence = {})", ctx.last_sequence());
    }

    let admin = config.admin.clone();
    ctx.init(config, correlation_id)?;
    let ledger = ctx.ledger()?;

    println!(
        "✅ Ledger {} initialized: {} minted to {}",
        ledger.metadata().name,
        show(ledger, ledger.total_supply()),
        admin
    );
    Ok(())
}

/// Show the external balance of an account
pub fn balance(ctx: &AppContext, account: &AccountId) -> Result<(), anyhow::Error> {
    let ledger = ctx.ledger()?;
    let amount = ledger.balance_of(account);
    println!("{}: {} ({} raw)", account, show(ledger, amount), amount);
    Ok(())
}

/// Show the external total supply
pub fn supply(ctx: &AppContext) -> Result<(), anyhow::Error> {
    let ledger = ctx.ledger()?;
    let amount = ledger.total_supply();
    println!("Total supply: {} ({} raw)", show(ledger, amount), amount);
    Ok(())
}

pub fn index(ctx: &AppContext) -> Result<(), anyhow::Error> {
    let ledger = ctx.ledger()?;
    println!("Index: {}", ledger.get_index());
    if !ledger.rebase_available() {
        println!("   (at floor: no further rebase possible)");
    }
    Ok(())
}

pub fn shares(ctx: &AppContext, account: &AccountId) -> Result<(), anyhow::Error> {
    let ledger = ctx.ledger()?;
    println!("{}: {} shares", account, ledger.get_raw_shares(account));
    Ok(())
}

pub fn allowance(
    ctx: &AppContext,
    owner: &AccountId,
    spender: &AccountId,
) -> Result<(), anyhow::Error> {
    let ledger = ctx.ledger()?;
    let amount = ledger.allowance(owner, spender);
    println!(
        "{} -> {}: {} ({} shares)",
        owner,
        spender,
        show(ledger, amount),
        ledger.raw_allowance(owner, spender)
    );
    Ok(())
}

/// Commit a mutating command and report the result
pub fn execute(
    ctx: &mut AppContext,
    command: LedgerCommand,
    correlation_id: &str,
) -> Result<(), anyhow::Error> {
    let kind = command.kind();
    let committed = ctx.commit(command, correlation_id)?;
    let event = serde_json::to_string(committed.event())?;

    println!("✅ {} committed (seq: {})", kind, committed.sequence);
    println!("   {}", event);
    Ok(())
}

/// Verify the journal hash chain and the ledger invariants
///
/// Reads the journal directly instead of going through `AppContext`, so a
/// broken chain is reported here rather than refused at open.
pub fn audit(data_path: &Path) -> Result<(), anyhow::Error> {
    let records = EventReader::from_directory(AppContext::journal_dir(data_path))?.read_all()?;

    if let Err(e) = verify_chain(&records) {
        println!("❌ Hash chain broken: {}", e);
        anyhow::bail!("Hash chain broken: {}", e);
    }
    let commands = records.iter().filter(|r| !r.entry.is_genesis()).count();
    println!(
        "✅ Hash chain verified ({} records, {} commands)",
        records.len(),
        commands
    );

    let Some(ledger) = replay(&records)? else {
        println!("   Ledger not initialized, nothing else to check");
        return Ok(());
    };

    let report = InvariantReport::collect(&ledger);
    println!("   Total shares:    {}", report.total_shares);
    println!("   Total supply:    {}", report.total_supply);
    println!("   Sum of balances: {}", report.sum_of_balances);
    println!("   Rounding gap:    {} across {} holders", report.rounding_gap, report.accounts);

    if !report.is_healthy() {
        for violation in &report.violations {
            println!("❌ {}", violation);
        }
        anyhow::bail!("{} invariant violation(s)", report.violations.len());
    }

    println!("✅ Invariants hold");
    Ok(())
}

/// Print metadata and headline state as JSON
pub fn info(ctx: &AppContext) -> Result<(), anyhow::Error> {
    let ledger = ctx.ledger()?;
    let meta = ledger.metadata();

    let info = json!({
        "name": meta.name,
        "symbol": meta.symbol,
        "decimals": meta.decimals,
        "admin": ledger.admin(),
        "authorizer": ledger.authorizer_name(),
        "index": ledger.get_index(),
        "total_shares": ledger.total_shares(),
        "total_supply": ledger.total_supply(),
        "holders": ledger.accounts().count(),
        "logical_time": ledger.logical_time(),
        "rebase_available": ledger.rebase_available(),
        "sequence": ctx.last_sequence(),
    });

    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_units() {
        assert_eq!(format_units(Amount::new(990_000_000_000_000_000), 18), "0.99");
        assert_eq!(format_units(Amount::new(5_000_000_000_000_000_000), 18), "5");
        assert_eq!(format_units(Amount::new(1), 18), "0.000000000000000001");
        assert_eq!(format_units(Amount::new(1234), 0), "1234");
    }

    #[test]
    fn test_format_units_oversized_decimals() {
        assert_eq!(format_units(Amount::new(42), 60), "42");
    }
}
