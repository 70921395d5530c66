use clap::Args;
use comfy_table::Table;
use meridian_catalog::{catalog::LocationCatalog, location_search::LocationSearch};
use tracing::info;

#[derive(Args)]
pub struct SearchArgs {
    /// Text matched against location names and addresses, case-insensitively
    query: String,

    /// Print the matches as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(args: SearchArgs, catalog: LocationCatalog) -> anyhow::Result<()> {
    let suggestions = catalog.search(&args.query).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&suggestions)?);
        return Ok(());
    }

    if suggestions.is_empty() {
        info!("No location matches {:?}", args.query);
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Id", "Name", "Address", "Latitude", "Longitude"]);
    for suggestion in &suggestions {
        table.add_row(vec![
            suggestion.id.clone(),
            suggestion.name.clone(),
            suggestion.address.clone(),
            format!("{:.4}", suggestion.coordinate.lat),
            format!("{:.4}", suggestion.coordinate.lng),
        ]);
    }

    println!("{table}");

    Ok(())
}
