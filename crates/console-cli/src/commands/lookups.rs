use anyhow::{Context, Result};
use clap::ValueEnum;
use console_core::record::EntityKind;

use crate::context::AppContext;

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum LookupKind {
    Categories,
    Countries,
    States,
    Cities,
    Languages,
}

/// Prints one lookup list, one value per line.
///
/// `parent` is the entity for categories, the country for states and the
/// state for cities.
pub async fn run(ctx: &AppContext, kind: LookupKind, parent: Option<String>) -> Result<()> {
    let lookups = ctx.lookup_source()?;
    let values = match kind {
        LookupKind::Categories => {
            let entity: EntityKind = parent.as_deref().unwrap_or("modules").parse()?;
            lookups.categories(entity).await?
        }
        LookupKind::Countries => lookups.countries().await?,
        LookupKind::States => {
            let country = parent.context("states need --parent <country>")?;
            lookups.states(&country).await?
        }
        LookupKind::Cities => {
            let state = parent.context("cities need --parent <state>")?;
            lookups.cities(&state).await?
        }
        LookupKind::Languages => lookups.languages().await?,
    };
    for value in values {
        println!("{value}");
    }
    Ok(())
}
