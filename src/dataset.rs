use crate::error::{BsidesError, Result};
use std::fmt;
use tabular::{Row, Table};

/// Field values read as missing, the same set dataframe readers treat as NaN.
const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// A single typed value of a column.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Int(i64),
    Float(f64),
    Text(String),
    Null,
}

impl Cell {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Cell::Int(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            // exact up to 2^53
            Cell::Int(v) => Some(*v as f64),
            Cell::Float(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Int(v) => write!(f, "{v}"),
            Cell::Float(v) => write!(f, "{v}"),
            Cell::Text(v) => write!(f, "{v}"),
            Cell::Null => write!(f, "NaN"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DType {
    Int64,
    Float64,
    Text,
}

/// A named column whose cells all share one `DType`.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    dtype: DType,
    cells: Vec<Cell>,
}

impl Column {
    /// Types raw CSV fields.
    ///
    /// Empty fields and NA markers (`NA`, `null`, `NaN`, ...) are nulls. If
    /// every other field is an integer the column
    /// is `Int64`, or `Float64` when nulls are present; if every other field
    /// is a number it is `Float64`; otherwise it is `Text`.
    #[must_use]
    pub fn infer<S: AsRef<str>>(name: &str, raw: &[S]) -> Self {
        let fields: Vec<Option<&str>> = raw
            .iter()
            .map(|s| Some(s.as_ref()).filter(|s| !NA_VALUES.contains(s)))
            .collect();
        let present = || fields.iter().flatten();
        let has_nulls = fields.iter().any(Option::is_none);

        let all_ints = present().all(|s| s.trim().parse::<i64>().is_ok());
        let all_floats = present().all(|s| s.trim().parse::<f64>().is_ok());

        let dtype = if all_ints && !has_nulls {
            DType::Int64
        } else if all_floats {
            DType::Float64
        } else {
            DType::Text
        };

        let cells = fields
            .into_iter()
            .map(|field| match (field, dtype) {
                (None, _) => Cell::Null,
                (Some(s), DType::Int64) => s.trim().parse().map_or(Cell::Null, Cell::Int),
                (Some(s), DType::Float64) => s.trim().parse().map_or(Cell::Null, Cell::Float),
                (Some(s), DType::Text) => Cell::Text(s.to_string()),
            })
            .collect();

        Column {
            name: name.to_string(),
            dtype,
            cells,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// In-memory table of equally long named columns.
#[derive(Debug, Clone, PartialEq)]
pub struct DataFrame {
    columns: Vec<Column>,
}

impl DataFrame {
    /// # Errors
    /// Returns `BsidesError::Other` if the columns differ in length.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        if let Some(first) = columns.first() {
            if let Some(bad) = columns.iter().find(|c| c.len() != first.len()) {
                return Err(BsidesError::Other(format!(
                    "column {} has {} rows, expected {}",
                    bad.name,
                    bad.len(),
                    first.len()
                )));
            }
        }

        Ok(DataFrame { columns })
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    #[must_use]
    pub fn row(&self, index: usize) -> Option<Vec<&Cell>> {
        if index >= self.len() {
            return None;
        }

        Some(self.columns.iter().map(|c| &c.cells[index]).collect())
    }
}

impl fmt::Display for DataFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let spec = vec!["{:<}"; self.columns.len()].join("  ");
        let mut table = Table::new(&spec);

        let mut header = Row::new();
        for name in self.column_names() {
            header.add_cell(name);
        }
        table.add_row(header);

        for index in 0..self.len() {
            let mut row = Row::new();
            for column in &self.columns {
                row.add_cell(&column.cells[index]);
            }
            table.add_row(row);
        }

        write!(f, "{table}")
    }
}
