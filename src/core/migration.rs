//! Row-by-row migration driver
//!
//! Each row goes through four calls against the target, each depending on the
//! id returned by the previous one:
//!
//! 1. create the manual test
//! 2. upload its step script
//! 3. upload the parameter table
//! 4. attach the table to the test
//!
//! Nothing is rolled back. A failure after step 1 leaves a partially built
//! test behind and stops the run; `--start-record` resumes from that row.

use crate::core::error::MigrationError;
use crate::core::source::SourceRow;
use crate::core::transform::TransformedRow;
use crate::octane::entities::ManualTest;

/// Operations the migrator needs from the target system
///
/// Implementations report what the server returned; deciding whether that
/// counts as a failure is left to the [`Migrator`].
pub trait TestApi {
    /// Create a manual test, returning it with its server id if one came back
    fn create_manual_test(&mut self, test: &ManualTest)
        -> Result<Option<ManualTest>, MigrationError>;

    fn upload_steps(&mut self, test_id: &str, steps_json: &str) -> Result<(), MigrationError>;

    /// Create a parameter table, returning its id if one came back
    fn upload_parameters_table(
        &mut self,
        table_name: &str,
        parameters_json: &str,
    ) -> Result<Option<String>, MigrationError>;

    /// Point the test at its parameter table, returning the number of updated entities
    fn attach_parameters_table(
        &mut self,
        test: &ManualTest,
        table_id: &str,
    ) -> Result<usize, MigrationError>;
}

impl<T: TestApi + ?Sized> TestApi for &mut T {
    fn create_manual_test(
        &mut self,
        test: &ManualTest,
    ) -> Result<Option<ManualTest>, MigrationError> {
        (**self).create_manual_test(test)
    }

    fn upload_steps(&mut self, test_id: &str, steps_json: &str) -> Result<(), MigrationError> {
        (**self).upload_steps(test_id, steps_json)
    }

    fn upload_parameters_table(
        &mut self,
        table_name: &str,
        parameters_json: &str,
    ) -> Result<Option<String>, MigrationError> {
        (**self).upload_parameters_table(table_name, parameters_json)
    }

    fn attach_parameters_table(
        &mut self,
        test: &ManualTest,
        table_id: &str,
    ) -> Result<usize, MigrationError> {
        (**self).attach_parameters_table(test, table_id)
    }
}

/// Result of migrating one row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigratedTest {
    pub record: u64,
    pub name: String,
    pub test_id: String,
    pub table_id: String,
}

/// Progress of a run, kept up to date even when the run fails
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationStats {
    pub rows_read: usize,
    pub tests_migrated: usize,
    /// Record number of the last fully migrated row
    pub last_record: Option<u64>,
    /// Record number of the row that stopped the run
    pub failed_record: Option<u64>,
}

pub struct Migrator<A> {
    api: A,
    stats: MigrationStats,
}

impl<A: TestApi> Migrator<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            stats: MigrationStats::default(),
        }
    }

    pub fn stats(&self) -> &MigrationStats {
        &self.stats
    }

    /// Migrate every row in order, stopping at the first error
    ///
    /// `on_migrated` is called after each row that completed all four steps.
    pub fn run<I, F>(&mut self, rows: I, mut on_migrated: F) -> Result<(), MigrationError>
    where
        I: IntoIterator<Item = Result<SourceRow, MigrationError>>,
        F: FnMut(&MigratedTest),
    {
        for row in rows {
            let row = row?;
            self.stats.rows_read += 1;

            match self.migrate_row(&row) {
                Ok(migrated) => {
                    self.stats.tests_migrated += 1;
                    self.stats.last_record = Some(row.number());
                    on_migrated(&migrated);
                }
                Err(e) => {
                    log::error!("Record {} failed: {}", row.number(), e);
                    self.stats.failed_record = Some(row.number());
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    pub fn migrate_row(&mut self, row: &SourceRow) -> Result<MigratedTest, MigrationError> {
        let transformed = TransformedRow::from_row(row)?;
        let name = transformed.test.name.clone();

        log::info!("Uploading test {}", name);
        let created = self
            .api
            .create_manual_test(&transformed.test)?
            .and_then(|test| test.id.clone().map(|id| (test, id)));
        let (created, test_id) = created.ok_or_else(|| MigrationError::CreateFailed {
            name: name.clone(),
        })?;
        log::info!("Uploaded test {} with id {}", name, test_id);

        log::info!("Uploading steps for test id {}", test_id);
        self.api.upload_steps(&test_id, &transformed.steps_json)?;
        log::info!("Successfully uploaded steps for test id {}", test_id);

        let (table_name, parameters_json) = transformed.parameters_for(&test_id);
        log::info!("Uploading parameters table with name {}", table_name);
        let table_id = self
            .api
            .upload_parameters_table(&table_name, &parameters_json)?
            .ok_or(MigrationError::TableCreateFailed { name: table_name })?;

        let updated = self.api.attach_parameters_table(&created, &table_id)?;
        if updated == 0 {
            return Err(MigrationError::UpdateFailed { test_id });
        }
        log::debug!("Attached parameters table {} to test {}", table_id, test_id);

        Ok(MigratedTest {
            record: row.number(),
            name,
            test_id,
            table_id,
        })
    }
}
