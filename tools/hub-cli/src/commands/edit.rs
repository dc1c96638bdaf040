//! Route mutations. Each one writes the network file back.

use anyhow::{Context as _, Result};
use hub_core::{Distance, NewRoute, RouteId};

use super::{AddArgs, RemoveArgs, UpdateArgs};
use crate::context::Context;

/// Run the add command.
pub async fn add(args: AddArgs, ctx: &Context) -> Result<()> {
    let from = ctx.hub(&args.from).await?;
    let to = ctx.hub(&args.to).await?;
    let distance = parse_km(&args.km)?;

    let route = NewRoute::new(from, to, distance, args.minutes)?;
    let view = ctx.service.create_route(route).await?;
    ctx.save_network().await?;

    if ctx.output.json(&view) {
        return Ok(());
    }
    ctx.output.success(&format!(
        "Added route {}: {} → {} ({})",
        view.id, view.from.name, view.to.name, view.distance
    ));
    ctx.output.info(&format!("Saved {}", ctx.network_path().display()));
    Ok(())
}

/// Run the update command.
pub async fn update(args: UpdateArgs, ctx: &Context) -> Result<()> {
    let id = RouteId::new(args.route_id.as_str());
    let distance = parse_km(&args.km)?;

    let view = ctx.service.update_route(&id, distance, args.minutes).await?;
    ctx.save_network().await?;

    if ctx.output.json(&view) {
        return Ok(());
    }
    ctx.output.success(&format!(
        "Updated route {}: {} → {} ({})",
        view.id, view.from.name, view.to.name, view.distance
    ));
    Ok(())
}

/// Run the remove command.
pub async fn remove(args: RemoveArgs, ctx: &Context) -> Result<()> {
    let id = RouteId::new(args.route_id.as_str());

    let removed = ctx.service.delete_route(&id).await?;
    ctx.save_network().await?;

    if ctx.output.json(&removed) {
        return Ok(());
    }
    ctx.output.success(&format!(
        "Removed route {} ({} → {})",
        removed.id, removed.from, removed.to
    ));
    Ok(())
}

fn parse_km(input: &str) -> Result<Distance> {
    Distance::parse_km(input).with_context(|| format!("Invalid distance '{}'", input))
}
