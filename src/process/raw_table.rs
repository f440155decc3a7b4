/// One cell as it came out of the loader.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Column was recognised as locale-numeric and the value already parsed.
    Number(f64),
    Text(String),
    Missing,
}

#[derive(Debug)]
pub struct RawTable {
    /// Column names from the header row, in file order.
    pub headers: Vec<String>,
    /// Each data row, one `Cell` per header (short rows are padded with `Missing`).
    pub rows: Vec<Vec<Cell>>,
}
