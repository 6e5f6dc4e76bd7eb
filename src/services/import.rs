//! CSV import service
//!
//! Imports expenses from a `;`-delimited file with the columns
//! `description;bucket;tags;date;amount`. Rows that cannot be imported are
//! written back to the same file so it can be fixed and imported again.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use csv::{ByteRecord, ReaderBuilder, StringRecord, WriterBuilder};

use crate::audit::AuditEntry;
use crate::config::UserConfig;
use crate::error::{ScroogeError, ScroogeResult};
use crate::models::{Bucket, Expense, ExpenseSource, Money, TagId};
use crate::storage::{CreatedLog, Repository};

use super::expense::ExpenseService;
use super::monthly_log::{LogAccess, MonthlyLogService};

/// Columns of an import file, in order
pub const CSV_HEADER: [&str; 5] = ["description", "bucket", "tags", "date", "amount"];

const DELIMITER: u8 = b';';

/// A row ready to be booked
#[derive(Debug, Clone)]
pub struct ParsedRow {
    pub description: Option<String>,
    pub bucket: Bucket,
    pub tags: Vec<TagId>,
    pub date: NaiveDate,
    pub amount: Money,
}

/// A row that could not be imported
#[derive(Debug)]
pub struct FailedRow {
    /// 1-based line in the file where the row starts, the header being line 1
    pub row_number: usize,
    /// The row as read, written back unchanged to the retry file
    pub record: ByteRecord,
    pub error: ScroogeError,
}

/// Result of importing a batch of rows
#[derive(Debug, Default)]
pub struct ImportSummary {
    pub imported: Vec<Expense>,
    pub failed: Vec<FailedRow>,
    /// Logs created for months that had none
    pub created_logs: Vec<CreatedLog>,
}

impl ImportSummary {
    /// Number of rows looked at
    pub fn rows(&self) -> usize {
        self.imported.len() + self.failed.len()
    }
}

/// What importing a file did
#[derive(Debug)]
pub enum ImportOutcome {
    /// The file did not exist; an empty template was written
    SampleWritten,
    Imported(ImportSummary),
}

/// Service for CSV import
pub struct ImportService<'a, R: Repository> {
    repo: &'a R,
}

impl<'a, R: Repository> ImportService<'a, R> {
    /// Create a new import service
    pub fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    /// Import a file, or write a template if it does not exist
    ///
    /// After importing, the file holds the header and the failed rows only.
    pub fn import_file(&self, path: &Path, config: &UserConfig) -> ScroogeResult<ImportOutcome> {
        if !path.is_file() {
            write_sample_file(path)?;
            return Ok(ImportOutcome::SampleWritten);
        }

        let file = File::open(path)
            .map_err(|e| ScroogeError::Io(format!("Failed to open {}: {}", path.display(), e)))?;
        let summary = self.import_reader(file, config)?;

        let file = File::create(path).map_err(|e| {
            ScroogeError::Io(format!("Failed to rewrite {}: {}", path.display(), e))
        })?;
        write_rows(file, summary.failed.iter().map(|f| &f.record))?;

        Ok(ImportOutcome::Imported(summary))
    }

    /// Import rows from a reader; the first line has to be the header
    ///
    /// A failing row is collected and the remaining rows are still imported.
    /// Missing monthly logs are created from `config`. Only a read error of
    /// the underlying reader aborts the import.
    pub fn import_reader<Rd: Read>(
        &self,
        mut input: Rd,
        config: &UserConfig,
    ) -> ScroogeResult<ImportSummary> {
        let mut content = Vec::new();
        input.read_to_end(&mut content)?;

        let mut reader = ReaderBuilder::new()
            .delimiter(DELIMITER)
            .has_headers(true)
            .flexible(true)
            .from_reader(content.as_slice());

        let mut summary = ImportSummary::default();

        for (idx, result) in reader.byte_records().enumerate() {
            let record = result?;
            let row_number = record
                .position()
                .map_or(idx + 2, |pos| line_at(&content, pos.byte() as usize));

            match self.import_record(&record, config) {
                Ok((expense, created)) => {
                    summary.imported.push(expense);
                    summary.created_logs.extend(created);
                }
                Err(error) => summary.failed.push(FailedRow {
                    row_number,
                    record,
                    error,
                }),
            }
        }

        self.repo.persist()?;
        self.repo.record_all(
            summary
                .imported
                .iter()
                .map(AuditEntry::expense_created)
                .collect(),
        )?;

        Ok(summary)
    }

    /// Parse the five fields of a row
    pub fn parse_record(&self, record: &StringRecord) -> ScroogeResult<ParsedRow> {
        if record.len() != CSV_HEADER.len() {
            return Err(ScroogeError::Import(format!(
                "Expected {} columns, found {}",
                CSV_HEADER.len(),
                record.len()
            )));
        }
        let field = |i: usize| record.get(i).unwrap_or_default().trim();

        let description = Some(field(0).to_string()).filter(|d| !d.is_empty());
        let bucket: Bucket = field(1).parse()?;

        let names: Vec<&str> = field(2)
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect();
        let tags = ExpenseService::new(self.repo).resolve_tags(&names)?;

        let date = NaiveDate::parse_from_str(field(3), "%Y-%m-%d").map_err(|_| {
            ScroogeError::Import(format!("Invalid date '{}': expected YYYY-MM-DD", field(3)))
        })?;

        let amount = Money::parse(field(4)).map_err(|e| ScroogeError::Import(e.to_string()))?;
        if amount.is_negative() {
            return Err(ScroogeError::Import(format!(
                "Amount cannot be negative ({})",
                amount
            )));
        }

        Ok(ParsedRow {
            description,
            bucket,
            tags,
            date,
            amount,
        })
    }

    fn import_record(
        &self,
        record: &ByteRecord,
        config: &UserConfig,
    ) -> ScroogeResult<(Expense, Option<CreatedLog>)> {
        let record = StringRecord::from_byte_record(record.clone()).map_err(|e| {
            ScroogeError::Import(format!("Row is not valid UTF-8: {}", e.utf8_error()))
        })?;
        let row = self.parse_record(&record)?;

        let access = MonthlyLogService::new(self.repo).get_or_create(
            row.date.month(),
            row.date.year(),
            config,
            true,
        )?;

        let expense = Expense::new(access.log().id, row.amount, row.date, row.bucket)
            .with_description(row.description)
            .with_tags(row.tags)
            .with_source(ExpenseSource::Import);
        self.repo.insert_expense(expense.clone())?;

        let created = match access {
            LogAccess::Created(created) => Some(created),
            LogAccess::Existing(_) => None,
        };
        Ok((expense, created))
    }
}

/// 1-based line of the first record byte at or after `offset`
///
/// Blank lines skipped by the reader are counted, as are line breaks inside
/// quoted fields of earlier rows.
fn line_at(content: &[u8], offset: usize) -> usize {
    let start = content
        .iter()
        .skip(offset)
        .position(|b| *b != b'\n' && *b != b'\r')
        .map_or(content.len(), |skipped| offset + skipped);
    1 + content[..start].iter().filter(|b| **b == b'\n').count()
}

/// Write an import file holding only the header
pub fn write_sample_file(path: &Path) -> ScroogeResult<()> {
    let file = File::create(path)
        .map_err(|e| ScroogeError::Io(format!("Failed to create {}: {}", path.display(), e)))?;
    write_rows(file, std::iter::empty())
}

fn write_rows<'r, W: Write>(
    out: W,
    rows: impl IntoIterator<Item = &'r ByteRecord>,
) -> ScroogeResult<()> {
    let mut writer = WriterBuilder::new()
        .delimiter(DELIMITER)
        .flexible(true)
        .from_writer(out);
    writer.write_record(CSV_HEADER)?;
    for row in rows {
        writer.write_byte_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::TagService;
    use crate::storage::MemoryRepository;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> MemoryRepository {
        let repo = MemoryRepository::new();
        let tags = TagService::new(&repo);
        tags.create("food", None).unwrap();
        tags.create("travel", None).unwrap();
        repo
    }

    #[test]
    fn test_import_rows() {
        let repo = setup();
        let service = ImportService::new(&repo);
        let data = "description;bucket;tags;date;amount\n\
                    Rewe;essential;food;2024-05-17;15.37\n\
                    ; fun ; food, travel ;2024-06-01;3\n";

        let summary = service
            .import_reader(data.as_bytes(), &UserConfig::default())
            .unwrap();

        assert_eq!(summary.rows(), 2);
        assert!(summary.failed.is_empty());
        assert_eq!(summary.created_logs.len(), 2);

        let first = &summary.imported[0];
        assert_eq!(first.description.as_deref(), Some("Rewe"));
        assert_eq!(first.amount, Money::from_cents(1537));
        assert_eq!(first.source, Some(ExpenseSource::Import));

        let second = &summary.imported[1];
        assert!(second.description.is_none());
        assert_eq!(second.bucket, Bucket::Fun);
        assert_eq!(second.tags.len(), 2);

        assert_eq!(repo.all_logs().unwrap().len(), 2);
        assert_eq!(repo.every_expense().unwrap().len(), 2);
    }

    #[test]
    fn test_failed_rows_are_collected_with_row_numbers() {
        let repo = setup();
        let service = ImportService::new(&repo);
        let data = "description;bucket;tags;date;amount\n\
                    ok;fun;;2024-01-02;1\n\
                    bad bucket;luxury;;2024-01-02;1\n\
                    bad tag;fun;ghost;2024-01-02;1\n\
                    too few;fun;2024-01-02;1\n\
                    bad date;fun;;2024-13-02;1\n\
                    bad amount;fun;;2024-01-02;lots\n";

        let summary = service
            .import_reader(data.as_bytes(), &UserConfig::default())
            .unwrap();

        assert_eq!(summary.imported.len(), 1);
        let rows: Vec<usize> = summary.failed.iter().map(|f| f.row_number).collect();
        assert_eq!(rows, vec![3, 4, 5, 6, 7]);
        assert!(matches!(summary.failed[0].error, ScroogeError::UnknownBucket(_)));
        assert!(matches!(summary.failed[1].error, ScroogeError::UnknownTag(_)));
        assert!(matches!(summary.failed[2].error, ScroogeError::Import(_)));
    }

    #[test]
    fn test_missing_file_gets_sample() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("import.csv");
        let repo = setup();

        let outcome = ImportService::new(&repo)
            .import_file(&path, &UserConfig::default())
            .unwrap();
        assert!(matches!(outcome, ImportOutcome::SampleWritten));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "description;bucket;tags;date;amount\n"
        );
    }

    #[test]
    fn test_import_file_keeps_failed_rows() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("import.csv");
        fs::write(
            &path,
            "description;bucket;tags;date;amount\n\
             Rewe;essential;food;2024-05-17;15.37\n\
             Cinema;fun;ghost;2024-05-18;9\n",
        )
        .unwrap();
        let repo = setup();

        let outcome = ImportService::new(&repo)
            .import_file(&path, &UserConfig::default())
            .unwrap();
        let summary = match outcome {
            ImportOutcome::Imported(summary) => summary,
            ImportOutcome::SampleWritten => panic!("file existed"),
        };
        assert_eq!(summary.imported.len(), 1);
        assert_eq!(summary.failed.len(), 1);

        let retry = fs::read_to_string(&path).unwrap();
        assert_eq!(
            retry,
            "description;bucket;tags;date;amount\nCinema;fun;ghost;2024-05-18;9\n"
        );
    }

    #[test]
    fn test_row_numbers_follow_file_lines() {
        let repo = setup();
        let data = "description;bucket;tags;date;amount\n\
                    \n\
                    ok;fun;;2024-01-02;1\n\
                    bad;luxury;;2024-01-02;1\n\
                    \"two\nlines\";luxury;;2024-01-02;1\n\
                    last;luxury;;2024-01-02;1\n";

        let summary = ImportService::new(&repo)
            .import_reader(data.as_bytes(), &UserConfig::default())
            .unwrap();

        let rows: Vec<usize> = summary.failed.iter().map(|f| f.row_number).collect();
        assert_eq!(rows, vec![4, 5, 7]);
    }

    #[test]
    fn test_non_utf8_row_kept_for_retry() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("import.csv");
        fs::write(
            &path,
            b"description;bucket;tags;date;amount\nok;fun;;2024-01-02;1\nCaf\xe9;fun;;2024-01-03;4\n",
        )
        .unwrap();
        let repo = setup();

        let outcome = ImportService::new(&repo)
            .import_file(&path, &UserConfig::default())
            .unwrap();
        let summary = match outcome {
            ImportOutcome::Imported(summary) => summary,
            ImportOutcome::SampleWritten => panic!("file existed"),
        };
        assert_eq!(summary.imported.len(), 1);
        assert_eq!(summary.failed[0].row_number, 3);
        assert!(matches!(summary.failed[0].error, ScroogeError::Import(ref m) if m.contains("UTF-8")));

        assert_eq!(
            fs::read(&path).unwrap(),
            b"description;bucket;tags;date;amount\nCaf\xe9;fun;;2024-01-03;4\n".to_vec()
        );
    }

    #[test]
    fn test_sub_cent_amount_rejected() {
        let repo = setup();
        let data = "description;bucket;tags;date;amount\n\
                    Rewe;essential;food;2024-05-17;15.379\n";

        let summary = ImportService::new(&repo)
            .import_reader(data.as_bytes(), &UserConfig::default())
            .unwrap();

        assert!(summary.imported.is_empty());
        assert!(matches!(summary.failed[0].error, ScroogeError::Import(ref m) if m.contains("15.379")));
    }
}
