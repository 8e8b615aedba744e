//! KML 2.2 form: one `Placemark` per stop.
//!
//! Stop fields other than the name and position travel as
//! `<ExtendedData><Data name="..."><value>...</value></Data>` entries.

use std::fmt::Write as _;

use roxmltree::{Document, Node};

use crate::Error;
use crate::model::de::parse_bool;
use crate::model::{DEFAULT_STOP_NAME, Position, Stop, TravelMode};

const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";
const DOCUMENT_NAME: &str = "Travel Itinerary";

pub(super) fn encode(stops: &[Stop]) -> Result<String, Error> {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let _ = writeln!(out, "<kml xmlns=\"{KML_NAMESPACE}\">");
    out.push_str("  <Document>\n");
    let _ = writeln!(out, "    <name>{DOCUMENT_NAME}</name>");

    for (index, stop) in stops.iter().enumerate() {
        write_placemark(&mut out, stop)
            .map_err(|e| Error::InvalidData(format!("stop {}: {e}", index + 1)))?;
    }

    out.push_str("  </Document>\n");
    out.push_str("</kml>\n");
    Ok(out)
}

fn write_placemark(out: &mut String, stop: &Stop) -> Result<(), String> {
    out.push_str("    <Placemark>\n");
    let _ = writeln!(out, "      <name>{}</name>", escape("name", &stop.name)?);
    let _ = writeln!(
        out,
        "      <Point><coordinates>{},{},0</coordinates></Point>",
        stop.position.lng, stop.position.lat
    );
    out.push_str("      <ExtendedData>\n");
    for (name, value) in extended_data(stop) {
        let _ = writeln!(
            out,
            "        <Data name=\"{name}\"><value>{}</value></Data>",
            escape(name, value)?
        );
    }
    out.push_str("      </ExtendedData>\n");
    out.push_str("    </Placemark>\n");
    Ok(())
}

fn extended_data(stop: &Stop) -> [(&'static str, &str); 12] {
    [
        ("id", stop.id.as_str()),
        ("imageUrl", stop.image_url.as_str()),
        ("travelTime", stop.travel_time.as_str()),
        ("travelMode", stop.travel_mode.map_or("", TravelMode::as_str)),
        ("placeToStay", stop.place_to_stay.as_str()),
        ("activities.morning", stop.activities.morning.as_str()),
        ("activities.afternoon", stop.activities.afternoon.as_str()),
        ("activities.allDay", stop.activities.all_day.as_str()),
        ("kidsActivity", stop.kids_activity.as_str()),
        ("foodOptions", stop.food_options.as_str()),
        ("funFact", stop.fun_fact.as_str()),
        ("disabled", if stop.disabled { "true" } else { "false" }),
    ]
}

/// Escapes markup characters. `\r` goes out as a character reference so
/// that readers do not fold it into `\n`.
fn escape(field: &str, text: &str) -> Result<String, String> {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\'' => escaped.push_str("&apos;"),
            '"' => escaped.push_str("&quot;"),
            '\r' => escaped.push_str("&#13;"),
            c if is_xml_char(c) => escaped.push(c),
            c => return Err(format!("{field} holds {c:?}, which KML cannot carry")),
        }
    }
    Ok(escaped)
}

/// The XML 1.0 `Char` production.
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..
    )
}

pub(super) fn decode(text: &str) -> Result<Vec<Stop>, Error> {
    let doc = Document::parse(text)?;
    let root = doc.root_element();
    if !root.has_tag_name("kml") {
        return Err(Error::UnsupportedFormat(format!(
            "expected a kml root element, found {:?}",
            root.tag_name().name()
        )));
    }

    root.descendants()
        .filter(|node| node.has_tag_name("Placemark"))
        .enumerate()
        .map(|(index, placemark)| {
            read_placemark(placemark)
                .map_err(|e| Error::InvalidData(format!("placemark {}: {e}", index + 1)))
        })
        .collect()
}

fn read_placemark(placemark: Node) -> Result<Stop, String> {
    let position = placemark
        .descendants()
        .find(|node| node.has_tag_name("coordinates"))
        .ok_or("missing coordinates")?
        .text()
        .map(parse_coordinates)
        .ok_or("empty coordinates")??;

    let mut stop = Stop::new(position);
    stop.name = match child(placemark, "name") {
        Some(name) => name.text().unwrap_or_default().to_string(),
        None => DEFAULT_STOP_NAME.to_string(),
    };

    for data in placemark
        .descendants()
        .filter(|node| node.has_tag_name("Data"))
    {
        let Some(name) = data.attribute("name") else {
            continue;
        };
        let value = child(data, "value")
            .and_then(|value| value.text())
            .unwrap_or_default()
            .to_string();

        match name {
            "id" => stop.id = value,
            "imageUrl" => stop.image_url = value,
            "travelTime" => stop.travel_time = value,
            "travelMode" => stop.travel_mode = TravelMode::parse(&value),
            "placeToStay" => stop.place_to_stay = value,
            "activities.morning" => stop.activities.morning = value,
            "activities.afternoon" => stop.activities.afternoon = value,
            "activities.allDay" => stop.activities.all_day = value,
            "kidsActivity" => stop.kids_activity = value,
            "foodOptions" => stop.food_options = value,
            "funFact" => stop.fun_fact = value,
            "disabled" => stop.disabled = parse_bool(&value).unwrap_or(false),
            other => log::debug!("Ignoring KML data field {other:?}"),
        }
    }

    Ok(stop)
}

fn child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|child| child.has_tag_name(tag))
}

/// Parses `lng,lat[,alt]`.
fn parse_coordinates(text: &str) -> Result<Position, String> {
    let mut parts = text.trim().split(',').map(str::trim);
    let mut next = |axis: &str| -> Result<f64, String> {
        let raw = parts.next().ok_or_else(|| format!("missing {axis}"))?;
        raw.parse()
            .map_err(|_| format!("invalid {axis} {raw:?}"))
    };
    let lng = next("longitude")?;
    let lat = next("latitude")?;
    Ok(Position { lat, lng })
}
