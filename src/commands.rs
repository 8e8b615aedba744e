use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use itinera_core::interchange::InterchangeFormat;
use itinera_core::model::{Position, StopId, Theme};
use itinera_core::planner::{Command, Confirm, Outcome, Planner};
use itinera_core::search::{GeocodeMatch, Generation, SearchSequencer};
use itinera_core::store::{FileStore, KeyValueStore};
use itinera_core::views::DEFAULT_VIEWPORT;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::cli::{Cli, Commands, ThemeArg};
use crate::config::Config;
use crate::confirm::Prompt;
use crate::debounce::Debouncer;
use crate::render;
use crate::services::{GeocodingClient, WeatherClient};

pub async fn run(cli: Cli, config: Config) -> Result<()> {
    let store = FileStore::new(&config.storage.dir);
    tracing::debug!(dir = %config.storage.dir.display(), "Using storage directory");
    let mut planner = Planner::load(store);
    let mut confirm = Prompt::stdin(cli.yes);

    match cli.command {
        Commands::Add { lat, lng, fields } => {
            let mut draft = planner.draft_at(Position { lat, lng })?;
            fields.apply(&mut draft)?;
            if let Outcome::Added(id) = planner.apply(Command::Add(draft), &mut confirm)? {
                println!("Added stop {id}");
            }
            print_list(&planner);
        }
        Commands::Edit {
            id,
            lat,
            lng,
            fields,
        } => {
            let mut stop = planner
                .store()
                .itinerary()
                .get(&id)
                .cloned()
                .with_context(|| format!("No stop with id {id}"))?;
            stop.position.lat = lat.unwrap_or(stop.position.lat);
            stop.position.lng = lng.unwrap_or(stop.position.lng);
            fields.apply(&mut stop)?;
            planner.apply(Command::Update(stop), &mut confirm)?;
            print_list(&planner);
        }
        Commands::Remove { id } => {
            let outcome = planner.apply(Command::Remove(id.clone()), &mut confirm)?;
            report(&outcome, &id);
            print_list(&planner);
        }
        Commands::Move { from, to } => {
            let (Some(from), Some(to)) = (from.checked_sub(1), to.checked_sub(1)) else {
                bail!("Positions start at 1");
            };
            planner.apply(Command::Reorder { from, to }, &mut confirm)?;
            print_list(&planner);
        }
        Commands::Toggle { id } => {
            let outcome = planner.apply(Command::ToggleEnabled(id.clone()), &mut confirm)?;
            report(&outcome, &id);
            print_list(&planner);
        }
        Commands::Clear => {
            let outcome = planner.apply(Command::Clear, &mut confirm)?;
            if outcome == Outcome::Declined {
                println!("Kept the itinerary");
            }
            print_list(&planner);
        }
        Commands::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&planner.views().list)?);
            } else {
                print_list(&planner);
            }
        }
        Commands::Map { geojson, focus } => {
            let map = &planner.views().map;
            if geojson {
                println!("{}", map.to_geojson_string()?);
            } else {
                let viewport = match focus {
                    Some(id) => planner
                        .focus(&id)
                        .with_context(|| format!("No stop with id {id}"))?,
                    None => DEFAULT_VIEWPORT,
                };
                print!("{}", render::map(map, viewport));
            }
        }
        Commands::Export { format, output } => {
            let format = format.map_or(config.export.format, InterchangeFormat::from);
            export(&planner, format, output)?;
        }
        Commands::Import { path } => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let outcome = planner
                .import(&text, &mut confirm)
                .with_context(|| format!("Failed to import {}", path.display()))?;
            match outcome {
                Outcome::Declined => println!("Import cancelled, itinerary unchanged"),
                _ => println!("Imported {} stops", planner.stops().len()),
            }
            print_list(&planner);
        }
        Commands::Theme { theme } => {
            let command = match theme {
                None => None,
                Some(ThemeArg::Dark) => Some(Command::SetTheme(Theme::Dark)),
                Some(ThemeArg::Light) => Some(Command::SetTheme(Theme::Light)),
                Some(ThemeArg::Toggle) => Some(Command::ToggleTheme),
            };
            if let Some(command) = command {
                planner.apply(command, &mut confirm)?;
            }
            println!("Theme: {}", planner.theme());
        }
        Commands::Weather => {
            let client = WeatherClient::new(&config.weather)?;
            refresh_weather(&mut planner, &client).await;
            print_list(&planner);
        }
        Commands::Search {
            query,
            interactive,
            add,
        } => {
            let client = GeocodingClient::new(&config.geocoding)?;
            if interactive {
                search_interactive(&client, config.search.debounce()).await?;
            } else {
                let query = query.context("A query is required unless --interactive is set")?;
                search_once(&mut planner, &client, &query, add, &mut confirm).await?;
            }
        }
    }

    Ok(())
}

fn print_list<S: KeyValueStore>(planner: &Planner<S>) {
    print!("{}", render::list(&planner.views().list));
}

fn report(outcome: &Outcome, id: &str) {
    match outcome {
        Outcome::Unchanged => println!("No stop with id {id}"),
        Outcome::Declined => println!("Kept stop {id}"),
        Outcome::Toggled { enabled: true } => println!("Enabled stop {id}"),
        Outcome::Toggled { enabled: false } => println!("Disabled stop {id}"),
        Outcome::Applied | Outcome::Added(_) => {}
    }
}

fn export<S: KeyValueStore>(
    planner: &Planner<S>,
    format: InterchangeFormat,
    output: Option<PathBuf>,
) -> Result<()> {
    let file = planner.export(format)?;
    let path = output.unwrap_or_else(|| PathBuf::from(&file.file_name));
    if path.as_os_str() == "-" {
        print!("{}", file.contents);
        return Ok(());
    }

    std::fs::write(&path, &file.contents)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), media_type = file.media_type, "Exported itinerary");
    println!(
        "Wrote {} stops to {} ({format})",
        planner.stops().len(),
        path.display()
    );
    Ok(())
}

/// Looks up weather for every card and patches the results into the list.
async fn refresh_weather<S: KeyValueStore>(planner: &mut Planner<S>, client: &WeatherClient) {
    let revision = planner.revision();
    let targets: Vec<(StopId, Position)> = planner
        .views()
        .list
        .cards
        .iter()
        .map(|card| (card.stop_id.clone(), card.position))
        .collect();

    let mut lookups = JoinSet::new();
    for (id, position) in targets {
        let client = client.clone();
        lookups.spawn(async move { (id, client.slot(position).await) });
    }

    while let Some(joined) = lookups.join_next().await {
        match joined {
            Ok((id, slot)) => {
                planner.patch_weather(revision, &id, slot);
            }
            Err(e) => tracing::warn!(error = %e, "Weather lookup task failed"),
        }
    }
}

/// Short stop name from a geocoder display name, e.g. "Lisboa" from
/// "Lisboa, Portugal".
fn place_name(found: &GeocodeMatch) -> String {
    found
        .name
        .split(',')
        .next()
        .map(str::trim)
        .unwrap_or_default()
        .to_string()
}

async fn search_once<S: KeyValueStore>(
    planner: &mut Planner<S>,
    client: &GeocodingClient,
    query: &str,
    add: bool,
    confirm: &mut dyn Confirm,
) -> Result<()> {
    let Some(found) = client.search(query).await? else {
        println!("No match for {query:?}");
        return Ok(());
    };
    print_match(query, &found);

    if add {
        let mut draft = planner.draft_at(found.position)?;
        draft.name = place_name(&found);
        if let Outcome::Added(id) = planner.apply(Command::Add(draft), confirm)? {
            println!("Added stop {id}");
        }
        print_list(planner);
    }
    Ok(())
}

fn print_match(query: &str, found: &GeocodeMatch) {
    println!(
        "{query} -> {} ({:.4}, {:.4})",
        found.name, found.position.lat, found.position.lng
    );
}

type SearchResponse = (Generation, String, Result<Option<GeocodeMatch>>);

/// Search-as-you-type over stdin: one query per line, sent after the
/// debounce period, answers printed newest-wins.
async fn search_interactive(client: &GeocodingClient, delay: Duration) -> Result<()> {
    let (mut debouncer, mut ready) = Debouncer::new(delay);
    let (responses_tx, mut responses) = mpsc::unbounded_channel::<SearchResponse>();
    let mut sequencer = SearchSequencer::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut input_open = true;
    let mut in_flight = 0usize;

    loop {
        tokio::select! {
            line = lines.next_line(), if input_open => {
                match line.context("Failed to read stdin")? {
                    Some(query) if !query.trim().is_empty() => debouncer.push(query.trim().to_string()),
                    Some(_) => debouncer.cancel(),
                    None => input_open = false,
                }
            }
            Some(query) = ready.recv() => {
                let generation = sequencer.issue();
                tracing::debug!(query, generation = generation.get(), "Searching");
                let client = client.clone();
                let tx = responses_tx.clone();
                in_flight += 1;
                tokio::spawn(async move {
                    let result = client.search(&query).await;
                    let _ = tx.send((generation, query, result));
                });
            }
            Some((generation, query, result)) = responses.recv() => {
                in_flight -= 1;
                if !sequencer.accept(generation) {
                    continue;
                }
                match result {
                    Ok(Some(found)) => print_match(&query, &found),
                    Ok(None) => println!("No match for {query:?}"),
                    Err(e) => tracing::warn!(error = %e, query, "Search failed"),
                }
            }
            else => break,
        }

        if !input_open && !debouncer.is_pending() && ready.is_empty() && in_flight == 0 {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use itinera_core::store::MemoryStore;

    #[test]
    fn test_place_name() {
        let found = GeocodeMatch {
            position: Position { lat: 0.0, lng: 0.0 },
            name: "Lisboa, Portugal".to_string(),
        };
        assert_eq!(place_name(&found), "Lisboa");
    }

    #[test]
    fn test_export_writes_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut planner = Planner::load(MemoryStore::new());
        let draft = planner.draft_at(Position { lat: 1.0, lng: 2.0 }).unwrap();
        planner
            .apply(Command::Add(draft), &mut |_: &str| true)
            .unwrap();

        let path = dir.path().join("trip.kml");
        export(&planner, InterchangeFormat::Kml, Some(path.clone())).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("<Placemark>"));
        assert!(written.contains("<coordinates>2,1,0</coordinates>"));
    }
}
