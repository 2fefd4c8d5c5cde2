//! Tabular form of the condensed tree: one CSV row per record with the header
//! `parent,child,lambda,child_size`.

use std::io::{Read, Write};

use tracing::{debug, instrument};

use super::{CondensedTree, CondensedTreeRecord};
use crate::error::TreeError;

impl CondensedTree {
    /// Reads and validates a condensed tree from CSV.
    ///
    /// # Errors
    /// Returns [`TreeError::Table`] when a row cannot be parsed, and any other
    /// [`TreeError`] raised by [`CondensedTree::from_records`].
    ///
    /// # Examples
    /// ```
    /// use tsurara_core::CondensedTree;
    ///
    /// let csv = "parent,child,lambda,child_size\n0,1,0.5,1\n0,2,0.5,1\n";
    /// let tree = CondensedTree::read_csv(csv.as_bytes())?;
    /// assert_eq!(tree.records().len(), 2);
    /// # Ok::<(), tsurara_core::TreeError>(())
    /// ```
    #[instrument(name = "core.tree.read_csv", err, skip(reader))]
    pub fn read_csv<R: Read>(reader: R) -> Result<Self, TreeError> {
        let records = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader)
            .deserialize::<CondensedTreeRecord>()
            .collect::<Result<Vec<_>, _>>()?;
        debug!(records = records.len(), "parsed condensed tree table");
        Self::from_records(records)
    }

    /// Writes every record as one CSV row, preceded by a header row.
    ///
    /// # Errors
    /// Returns [`TreeError::Table`] when serialisation or the writer fails.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), TreeError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(true)
            .from_writer(writer);
        for record in self.records() {
            writer.serialize(record)?;
        }
        writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }
}
