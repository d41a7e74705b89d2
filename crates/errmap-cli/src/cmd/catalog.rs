use anyhow::{Context, Result};
use clap::Subcommand;
use errmap_server::products::bootstrap;

use crate::output::{print_entries, print_json};

#[derive(Subcommand)]
pub enum CatalogSubcommand {
    /// List every error code in catalog order
    List,
    /// Build the catalog and report whether it is consistent
    Check,
}

pub fn run(subcommand: CatalogSubcommand, json: bool) -> Result<()> {
    match subcommand {
        CatalogSubcommand::List => list(json),
        CatalogSubcommand::Check => check(json),
    }
}

fn list(json: bool) -> Result<()> {
    let (_errors, catalog) = bootstrap().context("building error catalog")?;
    let entries = catalog.summaries();
    if json {
        print_json(&entries)
    } else {
        print_entries(&entries);
        Ok(())
    }
}

fn check(json: bool) -> Result<()> {
    let (_errors, catalog) = bootstrap().context("error catalog is inconsistent")?;
    let sentinels = catalog.iter().filter(|e| e.sentinel().is_some()).count();
    if json {
        print_json(&serde_json::json!({
            "ok": true,
            "entries": catalog.len(),
            "sentinels": sentinels,
        }))
    } else {
        println!(
            "catalog ok: {} entries, {} sentinels mapped",
            catalog.len(),
            sentinels
        );
        Ok(())
    }
}
