use std::fs::File;
use std::io::{
    Read,
    Write,
};
use std::path::Path;
use std::str::FromStr;

use anyhow::{
    anyhow,
    Context,
};
use itertools::Itertools;
use log::{
    debug,
    info,
};

use crate::data_structs::{
    DmrRecord,
    DmrTable,
    MethCode,
    Pattern,
    PATTERN_SEP,
    TO_BE_CONFIRMED,
};
use crate::tools::dmtree::LabelMode;
use crate::with_field_fn;

pub const CHR_COL: &str = "chr";
pub const START_COL: &str = "start";
pub const END_COL: &str = "end";
pub const MEANDIFF_COL: &str = "meandiff";
pub const MEAN_COL: &str = "mean";
pub const SIG_COL: &str = "sig.comparison";
/// Column holding the tree labels of every DMR.
pub const DMTREE_COL: &str = "DMTree";

const SUMMARY_COLS: [&str; 7] = [
    "meandiffabs",
    "#Hypo",
    "#Int",
    "#Hyper",
    "meanHypo",
    "meanInt",
    "meanHyper",
];

const REQUIRED_COLS: [&str; 6] = [
    CHR_COL,
    START_COL,
    END_COL,
    MEANDIFF_COL,
    MEAN_COL,
    SIG_COL,
];

/// Reader of the segmentation DMR table.
///
/// Rows whose comparison is `TBC` are skipped. With `raw_codes` enabled the
/// comparison column is decoded from the segmentation step's raw `0..=4`
/// alphabet, otherwise it must already use `0..=3`.
#[derive(Debug, Clone)]
pub struct DmrTableReader {
    delimiter: u8,
    raw_codes: bool,
}

impl Default for DmrTableReader {
    fn default() -> Self {
        Self {
            delimiter: b'\t',
            raw_codes: false,
        }
    }
}

struct ColumnIdx {
    chr:      usize,
    start:    usize,
    end:      usize,
    meandiff: usize,
    mean:     usize,
    sig:      usize,
}

impl ColumnIdx {
    fn from_header(header: &[String]) -> anyhow::Result<Self> {
        let find = |name: &str| {
            header
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| anyhow!("Required column '{}' not found in DMR table", name))
        };
        Ok(Self {
            chr:      find(CHR_COL)?,
            start:    find(START_COL)?,
            end:      find(END_COL)?,
            meandiff: find(MEANDIFF_COL)?,
            mean:     find(MEAN_COL)?,
            sig:      find(SIG_COL)?,
        })
    }
}

impl DmrTableReader {
    with_field_fn!(delimiter, u8);
    with_field_fn!(raw_codes, bool);

    pub fn read<R: Read>(
        &self,
        source: R,
    ) -> anyhow::Result<DmrTable> {
        let mut reader = csv::ReaderBuilder::default()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(false)
            .from_reader(source);

        let header = reader
            .headers()
            .context("Failed to read DMR table header")?
            .iter()
            .map(String::from)
            .collect_vec();
        let cols = ColumnIdx::from_header(&header)?;

        let mut records = Vec::new();
        let mut n_tbc = 0usize;
        for (line, row) in reader.records().enumerate() {
            let row = row.with_context(|| format!("Failed to read DMR row {}", line + 1))?;
            match self
                .parse_row(&row, &cols)
                .with_context(|| format!("Malformed DMR row {}", line + 1))?
            {
                Some(record) => records.push(record),
                None => n_tbc += 1,
            }
        }
        if n_tbc > 0 {
            debug!("Skipped {} DMRs marked {}", n_tbc, TO_BE_CONFIRMED);
        }
        info!("Read {} DMRs", records.len());

        DmrTable::try_new(header, records)
    }

    pub fn read_path<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> anyhow::Result<DmrTable> {
        let file = File::open(path.as_ref())
            .with_context(|| format!("Failed to open {}", path.as_ref().display()))?;
        self.read(file)
    }

    fn parse_row(
        &self,
        row: &csv::StringRecord,
        cols: &ColumnIdx,
    ) -> anyhow::Result<Option<DmrRecord>> {
        let field = |idx: usize| {
            row.get(idx)
                .map(str::trim)
                .ok_or_else(|| anyhow!("Missing field {}", idx))
        };

        let sig = field(cols.sig)?;
        if sig == TO_BE_CONFIRMED {
            return Ok(None);
        }
        let meandiff: f64 = field(cols.meandiff)?
            .parse()
            .context("Invalid meandiff")?;
        let pattern = if self.raw_codes {
            match Pattern::from_raw_comparison(sig, meandiff)? {
                Some(pattern) => pattern,
                None => return Ok(None),
            }
        }
        else {
            Pattern::from_str(sig)?
        };
        let means = field(cols.mean)?
            .split(PATTERN_SEP)
            .map(|m| {
                m.trim()
                    .parse::<f64>()
                    .with_context(|| format!("Invalid group mean '{}'", m))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(Some(DmrRecord {
            chr: field(cols.chr)?.to_string(),
            start: field(cols.start)?
                .parse()
                .context("Invalid start")?,
            end: field(cols.end)?
                .parse()
                .context("Invalid end")?,
            meandiff,
            means,
            pattern,
            raw: row.iter().map(String::from).collect(),
        }))
    }
}

/// Writes `table` with a trailing [`DMTREE_COL`] column.
///
/// Records read from a file keep their source columns; records built in
/// memory are written with the required columns only. The comparison column
/// always carries the decoded pattern, the one the labels were computed on.
pub fn write_labeled_dmrs<W: Write>(
    sink: W,
    table: &DmrTable,
    labels: &[String],
) -> anyhow::Result<()> {
    check_labels(table, labels)?;
    let mut writer = tsv_writer(sink);
    writer.write_record(
        base_header(table)
            .iter()
            .map(String::as_str)
            .chain([DMTREE_COL]),
    )?;

    let source = RowSource::of(table);
    for (record, label) in table.iter().zip(labels) {
        writer.write_record(
            source
                .row(record)
                .into_iter()
                .chain([label.clone()]),
        )?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes `table` with per-code statistics and group memberships appended,
/// then the [`DMTREE_COL`] column.
///
/// Appended columns: `meandiffabs`, `#Hypo`, `#Int`, `#Hyper`, `meanHypo`,
/// `meanInt`, `meanHyper` (empty when no group carries the code), and
/// `Hypo-<kind>`, `Int-<kind>`, `Hyper-<kind>` listing the sorted `names`
/// of the member groups. An empty intermediate list is written as `-`.
/// `kind` is `samples` for unsupervised tables and `groups` for supervised
/// ones.
pub fn write_processed_dmrs<W: Write>(
    sink: W,
    table: &DmrTable,
    labels: &[String],
    names: &[String],
    mode: LabelMode,
) -> anyhow::Result<()> {
    check_labels(table, labels)?;
    anyhow::ensure!(
        table.is_empty() || names.len() == table.n_groups(),
        "Got {} group names for {} groups",
        names.len(),
        table.n_groups()
    );
    let kind = match mode {
        LabelMode::Unsupervised => "samples",
        LabelMode::Supervised => "groups",
    };
    let mut writer = tsv_writer(sink);
    writer.write_record(
        base_header(table)
            .into_iter()
            .chain(SUMMARY_COLS.iter().map(|c| c.to_string()))
            .chain(
                ["Hypo", "Int", "Hyper"]
                    .iter()
                    .map(|code| format!("{}-{}", code, kind)),
            )
            .chain([DMTREE_COL.to_string()]),
    )?;

    let source = RowSource::of(table);
    let fmt_mean = |mean: Option<f64>| mean.map(|m| m.to_string()).unwrap_or_default();
    for (record, label) in table.iter().zip(labels) {
        let summary = record.code_summary();
        let members = |code: MethCode| record.members(code, names).join(",");
        let intermediate = match members(MethCode::Intermediate) {
            list if list.is_empty() => "-".to_string(),
            list => list,
        };
        writer.write_record(
            source
                .row(record)
                .into_iter()
                .chain([
                    record.weight().to_string(),
                    summary.n_hypo.to_string(),
                    summary.n_int.to_string(),
                    summary.n_hyper.to_string(),
                    fmt_mean(summary.mean_hypo),
                    fmt_mean(summary.mean_int),
                    fmt_mean(summary.mean_hyper),
                    members(MethCode::Hypo),
                    intermediate,
                    members(MethCode::Hyper),
                    label.clone(),
                ]),
        )?;
    }
    writer.flush()?;
    Ok(())
}

fn check_labels(
    table: &DmrTable,
    labels: &[String],
) -> anyhow::Result<()> {
    anyhow::ensure!(
        labels.len() == table.len(),
        "Got {} labels for {} DMRs",
        labels.len(),
        table.len()
    );
    Ok(())
}

fn tsv_writer<W: Write>(sink: W) -> csv::Writer<W> {
    csv::WriterBuilder::default()
        .delimiter(b'\t')
        .has_headers(false)
        .from_writer(sink)
}

fn base_header(table: &DmrTable) -> Vec<String> {
    if table.header().is_empty() {
        REQUIRED_COLS
            .iter()
            .map(|c| c.to_string())
            .collect()
    }
    else {
        table.header().clone()
    }
}

/// Where the source columns of a table's records come from.
enum RowSource {
    /// Records are written from their raw rows, with the comparison column
    /// (if any) replaced by the decoded pattern.
    File { sig: Option<usize> },
    Memory,
}

impl RowSource {
    fn of(table: &DmrTable) -> Self {
        if table.header().is_empty() {
            RowSource::Memory
        }
        else {
            RowSource::File {
                sig: table
                    .header()
                    .iter()
                    .position(|h| h.trim() == SIG_COL),
            }
        }
    }

    fn row(
        &self,
        record: &DmrRecord,
    ) -> Vec<String> {
        match self {
            RowSource::File { sig } if !record.raw.is_empty() => {
                let mut row = record.raw.clone();
                if let Some(field) = sig.and_then(|idx| row.get_mut(idx)) {
                    *field = record.pattern.to_string();
                }
                row
            },
            _ => vec![
                record.chr.clone(),
                record.start.to_string(),
                record.end.to_string(),
                record.meandiff.to_string(),
                record.means.iter().join(&PATTERN_SEP.to_string()),
                record.pattern.to_string(),
            ],
        }
    }
}
