use crate::config::ColumnConfig;
use crate::error::DataError;
use crate::geo::LatLon;
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// One school from the register, immutable after load
#[derive(Debug, Clone, PartialEq)]
pub struct SchoolRecord {
    pub name: String,
    pub authority: String,
    pub region: String,
    pub coordinates: LatLon,
    /// Type values, positionally aligned with the dataset's [`TypeSchema`]
    pub types: Vec<Option<String>>,
}

impl SchoolRecord {
    /// Non-null type values in column order
    pub fn type_values(&self) -> impl Iterator<Item = &str> {
        self.types.iter().filter_map(|t| t.as_deref())
    }
}

/// Ordered set of school type columns, fixed when the header is read
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeSchema {
    columns: Vec<String>,
}

impl TypeSchema {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// All schools with a usable coordinate
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub schema: TypeSchema,
    pub records: Vec<SchoolRecord>,
    /// Rows dropped for a missing or malformed coordinate or an unreadable record
    pub skipped: usize,
}

/// Header positions of the columns the loader reads
struct ColumnLayout {
    name: usize,
    authority: usize,
    region: usize,
    coordinates: usize,
    types: Vec<usize>,
}

impl ColumnLayout {
    fn resolve(
        headers: &StringRecord,
        columns: &ColumnConfig,
    ) -> Result<(Self, TypeSchema), DataError> {
        let find = |wanted: &str| {
            headers
                .iter()
                .position(|h| h == wanted)
                .ok_or_else(|| DataError::MissingColumn(wanted.to_string()))
        };

        let layout_base = (
            find(&columns.name)?,
            find(&columns.authority)?,
            find(&columns.region)?,
            find(&columns.coordinates)?,
        );

        let (types, names): (Vec<usize>, Vec<String>) = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| h.starts_with(&columns.type_prefix) && *h != columns.name)
            .map(|(i, h)| (i, h.to_string()))
            .unzip();

        if types.is_empty() {
            warn!(prefix = %columns.type_prefix, "dataset has no school type columns");
        }

        let (name, authority, region, coordinates) = layout_base;
        Ok((
            Self {
                name,
                authority,
                region,
                coordinates,
                types,
            },
            TypeSchema::new(names),
        ))
    }

    /// Build a record, or None when the coordinate is missing or malformed
    fn parse(&self, row: &StringRecord) -> Option<SchoolRecord> {
        let coordinates = field(row, self.coordinates).and_then(parse_coordinates)?;

        Some(SchoolRecord {
            name: field(row, self.name).unwrap_or_default().to_string(),
            authority: field(row, self.authority).unwrap_or_default().to_string(),
            region: field(row, self.region).unwrap_or_default().to_string(),
            coordinates,
            types: self
                .types
                .iter()
                .map(|&i| field(row, i).map(str::to_string))
                .collect(),
        })
    }
}

/// Empty fields are nulls
fn field(row: &StringRecord, idx: usize) -> Option<&str> {
    row.get(idx).filter(|v| !v.is_empty())
}

/// Parse coordinate text such as `(50.08, 14.42)`, `[50.08, 14.42]` or
/// `50.08, 14.42` into a latitude/longitude pair.
pub fn parse_coordinates(text: &str) -> Option<LatLon> {
    let trimmed = text.trim();
    let inner = trimmed
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .or_else(|| trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']')))
        .unwrap_or(trimmed);

    let mut parts = inner.split(',');
    let lat = parts.next()?.trim().parse::<f64>().ok()?;
    let lon = parts.next()?.trim().parse::<f64>().ok()?;

    // A single trailing comma is still a pair
    match (parts.next(), parts.next()) {
        (None, _) => {}
        (Some(rest), None) if rest.trim().is_empty() => {}
        _ => return None,
    }

    let point = LatLon::new(lat, lon);
    point.is_valid().then_some(point)
}

/// Load the school dataset from a delimited file
pub fn load_schools(
    path: &Path,
    columns: &ColumnConfig,
    delimiter: u8,
) -> Result<Dataset, DataError> {
    let file = File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "loading school dataset");
    read_schools(file, columns, delimiter)
}

/// Read the school dataset from any reader
pub fn read_schools<R: Read>(
    reader: R,
    columns: &ColumnConfig,
    delimiter: u8,
) -> Result<Dataset, DataError> {
    let mut rdr = ReaderBuilder::new().delimiter(delimiter).from_reader(reader);
    let headers = rdr.headers()?.clone();
    let (layout, schema) = ColumnLayout::resolve(&headers, columns)?;

    let mut records = Vec::new();
    let mut skipped = 0;

    for result in rdr.records() {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                skipped += 1;
                debug!(error = %e, "skipping unreadable row");
                continue;
            }
        };

        match layout.parse(&row) {
            Some(record) => records.push(record),
            None => {
                skipped += 1;
                debug!(
                    line = row.position().map(|p| p.line()),
                    "skipping row without a valid coordinate"
                );
            }
        }
    }

    info!(
        loaded = records.len(),
        skipped,
        type_columns = schema.len(),
        "school dataset ready"
    );
    debug!(columns = ?schema.columns(), "school type columns");

    Ok(Dataset {
        schema,
        records,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
nazev#zrizovatel_dropdown#Region#Coordinates#nazev_1#nazev_2#poznamka
ZŠ Praha#obec#Hlavní město Praha#(50.08, 14.42)#Základní škola#Školní družina#x
MŠ Brno#kraj#Jihomoravský kraj#[49.19, 16.61]#Mateřská škola##
Bez souřadnic#obec#Zlínský kraj##Základní škola##
Rozbité#obec#Zlínský kraj#(49.2, abc)#Základní škola##
";

    fn read(text: &str) -> Dataset {
        read_schools(text.as_bytes(), &ColumnConfig::default(), b'#').unwrap()
    }

    #[test]
    fn test_rows_without_coordinates_are_dropped() {
        let dataset = read(SAMPLE);
        assert_eq!(dataset.records.len(), 2);
        assert_eq!(dataset.skipped, 2);
        assert!(dataset.records.iter().all(|r| r.coordinates.is_valid()));
    }

    #[test]
    fn test_type_schema_excludes_name_column() {
        let dataset = read(SAMPLE);
        assert_eq!(dataset.schema.columns(), &["nazev_1", "nazev_2"]);

        let brno = &dataset.records[1];
        assert_eq!(brno.types, vec![Some("Mateřská škola".to_string()), None]);
        assert_eq!(brno.type_values().collect::<Vec<_>>(), vec!["Mateřská škola"]);
    }

    #[test]
    fn test_record_fields() {
        let dataset = read(SAMPLE);
        let praha = &dataset.records[0];
        assert_eq!(praha.name, "ZŠ Praha");
        assert_eq!(praha.authority, "obec");
        assert_eq!(praha.region, "Hlavní město Praha");
        assert_eq!(praha.coordinates, LatLon::new(50.08, 14.42));
    }

    #[test]
    fn test_short_row_is_skipped_not_fatal() {
        let text = "nazev#zrizovatel_dropdown#Region#Coordinates#nazev_1\n\
                    A#obec#Kraj#(50.0, 14.0)#ZŠ\n\
                    B#obec\n\
                    C#obec#Kraj#(49.0, 15.0)#MŠ\n";
        let dataset = read(text);
        assert_eq!(dataset.records.len(), 2);
        assert_eq!(dataset.skipped, 1);
    }

    #[test]
    fn test_missing_required_column() {
        let text = "nazev#Region#Coordinates\nA#Kraj#(50.0, 14.0)\n";
        let err = read_schools(text.as_bytes(), &ColumnConfig::default(), b'#').unwrap_err();
        assert!(matches!(err, DataError::MissingColumn(col) if col == "zrizovatel_dropdown"));
    }

    #[test]
    fn test_parse_coordinates_forms() {
        assert_eq!(parse_coordinates("(50.1, 14.4)"), Some(LatLon::new(50.1, 14.4)));
        assert_eq!(parse_coordinates(" [50.1,14.4] "), Some(LatLon::new(50.1, 14.4)));
        assert_eq!(parse_coordinates("50.1, 14.4"), Some(LatLon::new(50.1, 14.4)));
        assert_eq!(parse_coordinates("(50.1, 14.4,)"), Some(LatLon::new(50.1, 14.4)));
    }

    #[test]
    fn test_parse_coordinates_rejects_malformed() {
        assert_eq!(parse_coordinates("None"), None);
        assert_eq!(parse_coordinates("(50.1)"), None);
        assert_eq!(parse_coordinates("(50.1, 14.4, 3.0)"), None);
        assert_eq!(parse_coordinates("(50.1, 14.4"), None);
        assert_eq!(parse_coordinates("(nan, 14.4)"), None);
        assert_eq!(parse_coordinates("(150.0, 14.4)"), None);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let dataset = load_schools(file.path(), &ColumnConfig::default(), b'#').unwrap();
        assert_eq!(dataset.records.len(), 2);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.csv");
        let err = load_schools(&path, &ColumnConfig::default(), b'#').unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
    }
}
