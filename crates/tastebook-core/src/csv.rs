//! Spreadsheet export of tastings
//!
//! Rows are rendered from the stored bodies, so a tasting whose fields do not
//! fit the typed model (a vintage stored as text, say) still gets its row.

use chrono::{DateTime, Utc};
use serde_json::Value;

use tastebook_storage::{Record, Table};

use crate::store::Store;
use crate::Result;

enum Column {
    Field(&'static str),
    Stock,
    Favorite,
    Created,
    Lists,
}

static COLUMNS: [(&str, Column); 22] = [
    ("Name", Column::Field("name")),
    ("Producer", Column::Field("producer")),
    ("Variety", Column::Field("variety")),
    ("Label", Column::Field("label")),
    ("Batch", Column::Field("batch")),
    ("Category", Column::Field("category")),
    ("Subcategory", Column::Field("subcategory")),
    ("Country", Column::Field("country")),
    ("Region", Column::Field("region")),
    ("Purchase Location", Column::Field("purchaseLocation")),
    ("Vintage", Column::Field("vintage")),
    ("ABV", Column::Field("abv")),
    ("Price", Column::Field("price")),
    ("Stock", Column::Stock),
    ("Score", Column::Field("score")),
    ("Favorite", Column::Favorite),
    ("Notes", Column::Field("notes")),
    ("Pairing", Column::Field("pairing")),
    ("Created", Column::Created),
    ("Drink From", Column::Field("drinkFrom")),
    ("Drink To", Column::Field("drinkTo")),
    ("Lists", Column::Lists),
];

impl Store {
    pub fn export_csv(&self) -> Result<String> {
        let tastings = self.list_all(Table::Tastings)?;
        let lists = self.list_all(Table::Lists)?;
        tracing::info!(rows = tastings.len(), "Exporting CSV");
        Ok(render_csv(&tastings, &lists))
    }
}

/// One header row, then one row per tasting record. Every field is quoted.
pub fn render_csv(tastings: &[Record], lists: &[Record]) -> String {
    let mut out = String::new();
    push_row(&mut out, COLUMNS.iter().map(|(header, _)| header.to_string()));

    for record in tastings {
        let row = COLUMNS.iter().map(|(_, column)| match column {
            Column::Field(key) => scalar(record.body.get(*key)),
            Column::Stock => match record.body.get("stock") {
                None | Some(Value::Null) => "0".to_string(),
                value => scalar(value),
            },
            Column::Favorite => match record.body.get("isFavorite").and_then(Value::as_bool) {
                Some(true) => "Yes".to_string(),
                _ => "No".to_string(),
            },
            Column::Created => DateTime::<Utc>::from_timestamp_millis(record.created_at)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            Column::Lists => memberships(&record.id, lists),
        });
        push_row(&mut out, row);
    }

    out
}

fn scalar(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn memberships(tasting_id: &str, lists: &[Record]) -> String {
    lists
        .iter()
        .filter(|list| {
            list.body
                .get("itemIds")
                .and_then(Value::as_array)
                .is_some_and(|items| items.iter().any(|item| item.as_str() == Some(tasting_id)))
        })
        .map(|list| list.body.get("name").and_then(Value::as_str).unwrap_or(list.id.as_str()))
        .collect::<Vec<_>>()
        .join("; ")
}

fn push_row(out: &mut String, fields: impl IntoIterator<Item = String>) {
    let row = fields
        .into_iter()
        .map(|f| format!("\"{}\"", f.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(",");
    out.push_str(&row);
    out.push('\n');
}
