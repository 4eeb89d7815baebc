//! Variants command - list, export and validate variant catalogs

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;

use abalone_core::VariantCatalog;

#[derive(Args)]
pub struct VariantsArgs {
    /// Variants JSON file (name -> variant); built-ins when omitted
    #[arg(long, value_name = "FILE")]
    pub variants: Option<PathBuf>,

    /// Write the catalog to this file
    #[arg(long, value_name = "FILE")]
    pub save: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: VariantsArgs) -> Result<()> {
    let catalog = load_catalog(args.variants.as_deref())?;

    if let Some(path) = &args.save {
        catalog.save(path)?;
        tracing::info!("Saved {} variants to {}", catalog.len(), path.display());
    }

    if args.json {
        print_json(&catalog)
    } else {
        print_text(&catalog);
        Ok(())
    }
}

/// Built-in catalog, or the file's catalog when a path is given
pub fn load_catalog(path: Option<&Path>) -> Result<VariantCatalog> {
    match path {
        Some(path) => {
            let catalog = VariantCatalog::load(path)?;
            tracing::debug!("Loaded {} variants from {}", catalog.len(), path.display());
            Ok(catalog)
        }
        None => Ok(VariantCatalog::builtin()),
    }
}

fn print_json(catalog: &VariantCatalog) -> Result<()> {
    let variants: Vec<_> = catalog.iter().collect();
    println!("{}", serde_json::to_string_pretty(&variants)?);
    Ok(())
}

fn print_text(catalog: &VariantCatalog) {
    println!("{:<16} {:>7}  marbles", "name", "players");
    for variant in catalog.iter() {
        let counts: Vec<String> = variant
            .marble_counts()
            .iter()
            .map(usize::to_string)
            .collect();
        println!(
            "{:<16} {:>7}  {}",
            variant.name,
            variant.players,
            counts.join("/")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_catalog_defaults_to_builtin() {
        let catalog = load_catalog(None).unwrap();
        assert!(catalog.get("classical").is_some());
        assert!(catalog.get("belgian_daisy").is_some());
    }

    #[test]
    fn test_load_catalog_missing_file_errors() {
        let missing = Path::new("/nonexistent/variants.json");
        let err = load_catalog(Some(missing)).unwrap_err();
        assert!(err.to_string().contains("variants"));
    }
}
