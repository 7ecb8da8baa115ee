use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::{
    ActivityClassification, Bracket, BracketTable, BracketTableError, RatioRouting, ReferenceData,
};
use thiserror::Error;
use tracing::{debug, warn};

const BUNDLED_BRACKET_TABLES: &str = include_str!("../data/bracket_tables.csv");
const BUNDLED_CLASSIFICATIONS: &str = include_str!("../data/classifications.csv");

/// Table used for ratio-routed codes when payroll is a large share of revenue.
pub const DEFAULT_HIGH_RATIO_TABLE: &str = "III";
/// Table used for ratio-routed codes below the payroll ratio threshold.
pub const DEFAULT_LOW_RATIO_TABLE: &str = "V";

/// Errors that can occur when loading reference data.
#[derive(Debug, Error)]
pub enum ReferenceDataError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("duplicate classification code '{0}'")]
    DuplicateClassification(String),

    #[error("bracket table '{0}' loaded more than once")]
    DuplicateBracketTable(String),

    #[error(transparent)]
    InvalidTable(#[from] BracketTableError),
}

impl From<csv::Error> for ReferenceDataError {
    fn from(err: csv::Error) -> Self {
        ReferenceDataError::CsvParse(err.to_string())
    }
}

/// A single record from the bracket tables CSV file.
///
/// - `table_id`: identifier the classifications refer to (e.g. `III`)
/// - `order_index`: position of the bracket within its table, starting at 1
/// - `min_revenue` / `max_revenue`: inclusive trailing-12-month revenue range
/// - `nominal_rate`: nominal rate as a decimal (e.g. `0.06` for 6%)
/// - `deduction`: fixed amount subtracted before dividing by trailing revenue
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub table_id: String,
    pub order_index: u32,
    pub min_revenue: Decimal,
    pub max_revenue: Decimal,
    pub nominal_rate: Decimal,
    pub deduction: Decimal,
}

/// A single record from the activity classifications CSV file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ClassificationRecord {
    pub code: String,
    pub bracket_table_id: String,
    pub requires_ratio_routing: bool,
    #[serde(default)]
    pub description: String,
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

fn open(path: &Path) -> Result<File, ReferenceDataError> {
    File::open(path).map_err(|source| ReferenceDataError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Loader for bracket table data from CSV files.
pub struct BracketTableLoader;

impl BracketTableLoader {
    /// Parse bracket records from a CSV reader, in file order.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<BracketRecord>, ReferenceDataError> {
        let mut records = Vec::new();
        for result in csv_reader(reader).deserialize() {
            let record: BracketRecord = result?;
            records.push(record);
        }
        Ok(records)
    }

    /// Group records by table id into [`BracketTable`]s.
    ///
    /// Tables come back sorted by id. No validation happens here; see
    /// [`ReferenceDataBuilder::build`].
    pub fn into_tables(records: Vec<BracketRecord>) -> Vec<BracketTable> {
        let mut grouped: BTreeMap<String, Vec<Bracket>> = BTreeMap::new();
        for record in records {
            grouped.entry(record.table_id).or_default().push(Bracket {
                order_index: record.order_index,
                min_revenue: record.min_revenue,
                max_revenue: record.max_revenue,
                nominal_rate: record.nominal_rate,
                deduction: record.deduction,
            });
        }
        grouped
            .into_iter()
            .map(|(id, brackets)| BracketTable::new(id, brackets))
            .collect()
    }
}

/// Loader for activity classifications from CSV files.
pub struct ClassificationLoader;

impl ClassificationLoader {
    /// Parse classifications from a CSV reader, in file order.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<ActivityClassification>, ReferenceDataError> {
        let mut classifications = Vec::new();
        for result in csv_reader(reader).deserialize() {
            let record: ClassificationRecord = result?;
            classifications.push(
                ActivityClassification::new(
                    record.code,
                    record.bracket_table_id,
                    record.requires_ratio_routing,
                )
                .with_description(record.description),
            );
        }
        Ok(classifications)
    }
}

/// Assembles and validates a [`ReferenceData`] set.
///
/// Every bracket table is validated, and both table ids and classification
/// codes must be unique. References to tables that were never loaded are only logged:
/// the engine reports them per request as an unknown bracket table.
#[derive(Debug, Clone)]
pub struct ReferenceDataBuilder {
    classifications: Vec<ActivityClassification>,
    bracket_tables: Vec<BracketTable>,
    ratio_routing: RatioRouting,
}

impl Default for ReferenceDataBuilder {
    fn default() -> Self {
        Self {
            classifications: Vec::new(),
            bracket_tables: Vec::new(),
            ratio_routing: RatioRouting {
                high_ratio_table_id: DEFAULT_HIGH_RATIO_TABLE.to_string(),
                low_ratio_table_id: DEFAULT_LOW_RATIO_TABLE.to_string(),
            },
        }
    }
}

impl ReferenceDataBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bracket_tables(
        mut self,
        tables: impl IntoIterator<Item = BracketTable>,
    ) -> Self {
        self.bracket_tables.extend(tables);
        self
    }

    pub fn with_classifications(
        mut self,
        classifications: impl IntoIterator<Item = ActivityClassification>,
    ) -> Self {
        self.classifications.extend(classifications);
        self
    }

    pub fn with_ratio_routing(
        mut self,
        high_ratio_table_id: impl Into<String>,
        low_ratio_table_id: impl Into<String>,
    ) -> Self {
        self.ratio_routing = RatioRouting {
            high_ratio_table_id: high_ratio_table_id.into(),
            low_ratio_table_id: low_ratio_table_id.into(),
        };
        self
    }

    /// Parse and add bracket tables from CSV text.
    pub fn bracket_tables_csv(
        self,
        input: &str,
    ) -> Result<Self, ReferenceDataError> {
        let records = BracketTableLoader::parse(input.as_bytes())?;
        Ok(self.with_bracket_tables(BracketTableLoader::into_tables(records)))
    }

    /// Parse and add classifications from CSV text.
    pub fn classifications_csv(
        self,
        input: &str,
    ) -> Result<Self, ReferenceDataError> {
        let classifications = ClassificationLoader::parse(input.as_bytes())?;
        Ok(self.with_classifications(classifications))
    }

    /// Add the bracket tables compiled into this crate.
    pub fn bundled_bracket_tables(self) -> Result<Self, ReferenceDataError> {
        self.bracket_tables_csv(BUNDLED_BRACKET_TABLES)
    }

    /// Add the classifications compiled into this crate.
    pub fn bundled_classifications(self) -> Result<Self, ReferenceDataError> {
        self.classifications_csv(BUNDLED_CLASSIFICATIONS)
    }

    /// Parse and add bracket tables from a CSV file on disk.
    pub fn bracket_tables_file(
        self,
        path: &Path,
    ) -> Result<Self, ReferenceDataError> {
        let records = BracketTableLoader::parse(open(path)?)?;
        Ok(self.with_bracket_tables(BracketTableLoader::into_tables(records)))
    }

    /// Parse and add classifications from a CSV file on disk.
    pub fn classifications_file(
        self,
        path: &Path,
    ) -> Result<Self, ReferenceDataError> {
        let classifications = ClassificationLoader::parse(open(path)?)?;
        Ok(self.with_classifications(classifications))
    }

    /// Validate and build the reference data.
    ///
    /// # Errors
    ///
    /// * [`ReferenceDataError::InvalidTable`] if any table is empty, has
    ///   gaps or overlaps, or does not start at zero.
    /// * [`ReferenceDataError::DuplicateBracketTable`] if a table id was
    ///   added from more than one source.
    /// * [`ReferenceDataError::DuplicateClassification`] if a code appears
    ///   twice.
    pub fn build(self) -> Result<ReferenceData, ReferenceDataError> {
        let mut table_ids = HashSet::new();
        for table in &self.bracket_tables {
            table.validate()?;
            if !table_ids.insert(table.id.as_str()) {
                return Err(ReferenceDataError::DuplicateBracketTable(table.id.clone()));
            }
        }

        let mut seen = HashSet::new();
        for classification in &self.classifications {
            if !seen.insert(classification.code.as_str()) {
                return Err(ReferenceDataError::DuplicateClassification(
                    classification.code.clone(),
                ));
            }
        }

        let data = ReferenceData::new(
            self.classifications,
            self.bracket_tables,
            self.ratio_routing,
        );

        for id in data.dangling_table_ids() {
            warn!(table = id, "bracket table referenced but not loaded");
        }
        debug!(
            classifications = data.classification_codes().len(),
            tables = data.bracket_table_ids().len(),
            "reference data loaded"
        );

        Ok(data)
    }
}

/// The bundled reference data set.
///
/// Four bracket tables: a commerce table (`I`), an industry table (`II`)
/// and two service tables (`III`, `V`) that ratio-routed codes choose
/// between.
pub fn default_reference_data() -> Result<ReferenceData, ReferenceDataError> {
    ReferenceDataBuilder::new()
        .bundled_bracket_tables()?
        .bundled_classifications()?
        .build()
}
