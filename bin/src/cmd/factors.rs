//! Factor listing command implementation.

use anyhow::Result;
use faro::factors::registry::{available_categories, factors_by_category};

use crate::cmd::banner;

/// List available factors, optionally filtered by category.
pub(crate) fn list_factors(category: Option<&str>, verbose: bool) -> Result<()> {
    banner("Available Factors");

    for cat in available_categories() {
        let cat_name = format!("{cat:?}");
        if let Some(filter) = category
            && !cat_name.to_lowercase().contains(&filter.to_lowercase())
        {
            continue;
        }

        let cat_factors = factors_by_category(&cat);
        if cat_factors.is_empty() {
            continue;
        }

        println!("{cat_name}: {}", cat.description());
        println!("{}", "-".repeat(60));

        for factor in cat_factors {
            if verbose {
                println!(
                    "  {:12} - {} (lookback: {} days)",
                    factor.name, factor.description, factor.typical_lookback
                );
            } else {
                println!("  {}", factor.name);
            }
        }
        println!();
    }

    if !verbose {
        println!("Use --verbose for detailed factor descriptions.\n");
    }

    println!("Any window works: {{mom,rev,vol,amihud,volu_z}}_<days>, e.g. mom_120.");
    println!();

    Ok(())
}
