//! Result Renderer
//!
//! Pure conversion of a [`ParameterMap`] into `name: value` rows. Entries
//! keep the order the service returned them in.

use crate::models::ParameterMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterRow {
    pub name: String,
    pub value: String,
}

pub fn render_rows(parameters: Option<&ParameterMap>) -> Vec<ParameterRow> {
    parameters
        .map(|map| {
            map.iter()
                .map(|(name, value)| ParameterRow {
                    name: name.to_string(),
                    value: value.to_string(),
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Plain-text listing, one `name: value` line per parameter.
pub fn render_listing(parameters: Option<&ParameterMap>) -> String {
    render_rows(parameters)
        .iter()
        .map(|row| format!("{}: {}", row.name, row.value))
        .collect::<Vec<_>>()
        .join("\n")
}
