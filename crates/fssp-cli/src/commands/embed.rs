//! Embed command implementation

use colored::Colorize;

use fssp_core::{EmbedConfig, Embedder, RejectReason, Verification};

use crate::error::Result;

/// Check a fixed table against its renormalization and print the outcome
///
/// A rejection is a normal answer and is printed, not returned as an error.
pub fn run_embed(config: &EmbedConfig) -> Result<()> {
    let embedder = Embedder::new(config)?;
    println!(
        "{} {} ({} rules, {} seeds)",
        "=>".blue().bold(),
        config.name().bold(),
        config.base_table.len(),
        config.seeds.len()
    );

    match embedder.verify()? {
        Verification::Embedded(embedding) => {
            println!("{} table embeds", "OK".green().bold());
            println!();
            println!("{}", "renaming".cyan());
            for (block, symbol) in &embedding.renaming {
                println!("   {symbol} = {block}");
            }
            println!();
            println!("{} ({} rules)", "aggregate table".cyan(), embedding.table.len());
            println!("{}", embedding.table);
        }
        Verification::Rejected(rejection) => {
            println!(
                "{} window {}",
                "REJECTED".red().bold(),
                rejection.window.to_string().yellow()
            );
            match rejection.reason {
                RejectReason::Unmapped => {
                    println!("   the table does not map every window reached from it");
                }
                RejectReason::Mismatch { expected, found } => {
                    println!("   expected {expected}, simulation gave {found}");
                }
            }
        }
    }
    Ok(())
}
