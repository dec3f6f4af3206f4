//! Selectable categories derived once from the full dataset.

use crate::data::Dataset;
use std::collections::HashSet;
use std::fmt;

/// 24-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLUE: Rgb = Rgb(0x00, 0x00, 0xff);
}

/// `#rrggbb`
impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Qualitative "tab10" palette. Authorities past the tenth wrap around to the
/// start, so the color of the n-th authority is `PALETTE[n % 10]`.
pub const PALETTE: [Rgb; 10] = [
    Rgb(0x1f, 0x77, 0xb4),
    Rgb(0xff, 0x7f, 0x0e),
    Rgb(0x2c, 0xa0, 0x2c),
    Rgb(0xd6, 0x27, 0x28),
    Rgb(0x94, 0x67, 0xbd),
    Rgb(0x8c, 0x56, 0x4b),
    Rgb(0xe3, 0x77, 0xc2),
    Rgb(0x7f, 0x7f, 0x7f),
    Rgb(0xbc, 0xbd, 0x22),
    Rgb(0x17, 0xbe, 0xcf),
];

/// Universe of filter options plus the authority color assignment.
///
/// Built once at startup; the color of an authority never changes for the
/// rest of the session, whatever the filters show.
#[derive(Debug, Clone, Default)]
pub struct CategoryIndex {
    /// Distinct non-null type values, column by column in first-seen order
    type_values: Vec<String>,
    /// Distinct authorities in first-seen order with their colors
    authority_colors: Vec<(String, Rgb)>,
    /// Distinct regions in first-seen order
    regions: Vec<String>,
}

impl CategoryIndex {
    pub fn build(dataset: &Dataset) -> Self {
        let records = &dataset.records;

        let mut seen = HashSet::new();
        let mut type_values = Vec::new();
        for col in 0..dataset.schema.len() {
            for record in records {
                if let Some(Some(value)) = record.types.get(col) {
                    if seen.insert(value.as_str()) {
                        type_values.push(value.clone());
                    }
                }
            }
        }

        let authority_colors = unique_in_order(records.iter().map(|r| r.authority.as_str()))
            .into_iter()
            .enumerate()
            .map(|(i, authority)| (authority, PALETTE[i % PALETTE.len()]))
            .collect();

        let regions = unique_in_order(records.iter().map(|r| r.region.as_str()));

        Self {
            type_values,
            authority_colors,
            regions,
        }
    }

    pub fn type_values(&self) -> &[String] {
        &self.type_values
    }

    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    /// Authorities with their assigned colors, in assignment order
    pub fn authority_colors(&self) -> &[(String, Rgb)] {
        &self.authority_colors
    }

    /// Color assigned to an authority
    pub fn color_of(&self, authority: &str) -> Option<Rgb> {
        self.authority_colors
            .iter()
            .find(|(a, _)| a == authority)
            .map(|(_, c)| *c)
    }
}

/// Distinct values preserving first occurrence order
pub fn unique_in_order<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}
