use anyhow::{bail, Context, Result};
use errmap_server::products::bootstrap;

use crate::output::{print_entries, print_json};

pub fn run(code: &str, json: bool) -> Result<()> {
    let (_errors, catalog) = bootstrap().context("building error catalog")?;
    let wanted = code.trim().to_ascii_uppercase();
    let Some(entry) = catalog.get(&wanted) else {
        bail!("unknown error code '{code}' (see `errmap catalog list`)");
    };

    let summary = entry.summary();
    if json {
        print_json(&summary)
    } else {
        print_entries(std::slice::from_ref(&summary));
        Ok(())
    }
}
