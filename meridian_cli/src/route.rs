use std::time::Duration;

use anyhow::Context;
use clap::{Args, ValueEnum};
use comfy_table::Table;
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject, JsonValue};
use indicatif::{ProgressBar, ProgressStyle};
use meridian_catalog::{
    catalog::LocationCatalog, location_search::LocationSearch,
    location_suggestion::LocationSuggestion,
};
use meridian_routing::route::Route;
use meridian_session::{session::RouteSession, session_params::SessionParams};
use tracing::info;

use crate::parsers;

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Geojson,
}

#[derive(Args)]
pub struct RouteArgs {
    /// Query for the start location, the first match is used
    #[arg(short, long)]
    from: String,

    /// Query for the destination, the first match is used
    #[arg(short, long)]
    to: String,

    /// Play the marker along the route before printing it
    #[arg(short, long)]
    animate: bool,

    /// Playback duration (e.g., "5s", "PT2S")
    #[arg(long, value_parser = parsers::parse_duration)]
    duration: Option<jiff::SignedDuration>,

    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,
}

async fn resolve(catalog: &LocationCatalog, query: &str) -> anyhow::Result<LocationSuggestion> {
    catalog
        .search(query)
        .await?
        .into_iter()
        .next()
        .with_context(|| format!("No location matches {query:?}"))
}

pub async fn run(
    args: RouteArgs,
    catalog: LocationCatalog,
    mut params: SessionParams,
) -> anyhow::Result<()> {
    if let Some(duration) = args.duration {
        params.animation_duration = Duration::try_from(duration)?;
    }

    let start = resolve(&catalog, &args.from).await?;
    let destination = resolve(&catalog, &args.to).await?;
    info!("Routing from {} to {}", start.name, destination.name);

    let session = RouteSession::with_catalog(catalog, &params);
    session.select_start(start.clone());
    session.select_destination(destination.clone());

    let state = session.wait_until(|s| !s.is_loading).await?;
    if let Some(error) = state.error {
        return Err(error.into());
    }
    let route = state.route.context("No route was computed")?;

    if args.animate {
        animate(&session, &route).await?;
    }

    match args.format {
        OutputFormat::Table => print_table(&start, &destination, &route),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&route)?),
        OutputFormat::Geojson => {
            let geojson = to_geojson(&start, &destination, &route);
            println!("{}", serde_json::to_string_pretty(&geojson)?);
        }
    }

    Ok(())
}

async fn animate(session: &RouteSession, route: &Route) -> anyhow::Result<()> {
    let bar = ProgressBar::new(route.path.len() as u64);
    bar.set_style(ProgressStyle::default_bar().template("[{bar:40}] {pos}/{len} {msg}")?);

    let mut receiver = session.subscribe();
    session.start_animation();

    loop {
        let state = receiver.borrow_and_update().clone();
        if let Some(marker) = state.marker_position {
            if let Some(index) = route.path.iter().position(|point| *point == marker) {
                bar.set_position(index as u64 + 1);
            }
            bar.set_message(marker.to_string());
        }

        if !state.is_animating {
            break;
        }
        receiver.changed().await?;
    }

    bar.finish_and_clear();

    Ok(())
}

fn print_table(start: &LocationSuggestion, destination: &LocationSuggestion, route: &Route) {
    let mut table = Table::new();
    table.set_header(vec!["From", "To", "Distance", "Duration", "Points"]);
    table.add_row(vec![
        start.name.clone(),
        destination.name.clone(),
        route.display_distance(),
        route.display_duration(),
        route.path.len().to_string(),
    ]);

    println!("{table}");
}

fn feature(geometry: Geometry, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

fn location_feature(location: &LocationSuggestion) -> Feature {
    let point = geo_point(location);
    let mut properties = JsonObject::new();
    properties.insert("id".to_string(), JsonValue::from(location.id.as_str()));
    properties.insert("name".to_string(), JsonValue::from(location.name.as_str()));
    properties.insert("address".to_string(), JsonValue::from(location.address.as_str()));

    feature(Geometry::new(geojson::Value::from(&point)), properties)
}

fn geo_point(location: &LocationSuggestion) -> geo_types::Point {
    location.coordinate.into()
}

fn to_geojson(start: &LocationSuggestion, destination: &LocationSuggestion, route: &Route) -> GeoJson {
    let mut properties = JsonObject::new();
    properties.insert("distance_km".to_string(), JsonValue::from(route.distance_km()));
    properties.insert(
        "duration_minutes".to_string(),
        JsonValue::from(route.duration_minutes),
    );

    let path = feature(
        Geometry::new(geojson::Value::from(&route.line_string())),
        properties,
    );

    GeoJson::FeatureCollection(FeatureCollection {
        bbox: None,
        foreign_members: None,
        features: vec![path, location_feature(start), location_feature(destination)],
    })
}
