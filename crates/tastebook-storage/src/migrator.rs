//! One-shot copy of legacy key-value data into the primary engine
//!
//! Every write is an upsert keyed by the original id, so a run interrupted
//! half way can simply be repeated. The completion flag is written last.
//! Legacy data is left in place after a successful run.

use serde::Serialize;

use crate::adapter::EngineAdapter;
use crate::record::Table;
use crate::Result;

pub const MIGRATION_FLAG: &str = "migration.fallback_to_primary";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MigrationOutcome {
    AlreadyComplete,
    NothingToMigrate,
    Migrated {
        tastings: usize,
        categories: usize,
        lists: usize,
        images: usize,
    },
}

pub struct Migrator<'a> {
    primary: &'a dyn EngineAdapter,
    legacy: &'a dyn EngineAdapter,
}

impl<'a> Migrator<'a> {
    pub fn new(primary: &'a dyn EngineAdapter, legacy: &'a dyn EngineAdapter) -> Self {
        Self { primary, legacy }
    }

    pub fn is_complete(&self) -> Result<bool> {
        Ok(self.primary.get_setting(MIGRATION_FLAG)?.is_some())
    }

    pub fn run(&self) -> Result<MigrationOutcome> {
        if self.is_complete()? {
            return Ok(MigrationOutcome::AlreadyComplete);
        }

        if self.legacy.is_empty()? {
            tracing::debug!("No legacy tastings, skipping migration");
            return Ok(MigrationOutcome::NothingToMigrate);
        }

        tracing::info!("Migrating legacy data into primary engine");

        let tastings = self.copy_table(Table::Tastings)?;
        let categories = self.copy_table(Table::Categories)?;
        let lists = self.copy_table(Table::Lists)?;
        let images = self.copy_images()?;

        self.primary.set_setting(MIGRATION_FLAG, "true")?;

        tracing::info!(tastings, categories, lists, images, "Migration complete");

        Ok(MigrationOutcome::Migrated {
            tastings,
            categories,
            lists,
            images,
        })
    }

    fn copy_table(&self, table: Table) -> Result<usize> {
        let records = self.legacy.get_all(table)?;
        if !records.is_empty() {
            self.primary.save_bulk(table, &records)?;
        }
        tracing::debug!(table = %table, count = records.len(), "Copied legacy table");
        Ok(records.len())
    }

    fn copy_images(&self) -> Result<usize> {
        let mut images = Vec::new();
        for id in self.legacy.image_ids()? {
            match self.legacy.get_image(&id)? {
                Some(payload) => images.push((id, payload)),
                None => tracing::warn!(blob_id = %id, "Legacy image vanished during migration"),
            }
        }

        if !images.is_empty() {
            self.primary.save_images_bulk(&images)?;
        }
        Ok(images.len())
    }
}
