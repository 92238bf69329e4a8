//! Column renames applied to a server-side table and mirrored in its metadata.

use serde::Serialize;

use super::image_table::ImageTable;

/// Image-table metadata fields that a rename can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageColumn {
    Image,
    Dimension,
    Resolution,
    ImageFormat,
}

impl ImageColumn {
    fn current(self, table: &ImageTable) -> &str {
        match self {
            ImageColumn::Image => &table.image,
            ImageColumn::Dimension => &table.dimension,
            ImageColumn::Resolution => &table.resolution,
            ImageColumn::ImageFormat => &table.image_format,
        }
    }

    fn slot(self, table: &mut ImageTable) -> &mut String {
        match self {
            ImageColumn::Image => &mut table.image,
            ImageColumn::Dimension => &mut table.dimension,
            ImageColumn::Resolution => &mut table.resolution,
            ImageColumn::ImageFormat => &mut table.image_format,
        }
    }
}

/// One `{name, rename}` directive of `table.alterTable`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDirective {
    pub name: String,
    pub rename: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRename {
    pub column: ImageColumn,
    pub from: String,
    pub to: String,
}

/// A set of renames taken from one table's current column names.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnRenames {
    renames: Vec<ColumnRename>,
}

impl ColumnRenames {
    /// Renames mapping each `(column, new name)` pair from its current name in `table`.
    pub fn from_table(table: &ImageTable, targets: &[(ImageColumn, &str)]) -> Self {
        let renames = targets
            .iter()
            .map(|&(column, to)| ColumnRename {
                column,
                from: column.current(table).to_string(),
                to: to.to_string(),
            })
            .collect();
        Self { renames }
    }

    pub fn len(&self) -> usize {
        self.renames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renames.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnRename> {
        self.renames.iter()
    }

    /// New name of `column`, if it is renamed.
    pub fn target(&self, column: ImageColumn) -> Option<&str> {
        self.renames
            .iter()
            .find(|r| r.column == column)
            .map(|r| r.to.as_str())
    }

    /// The `columns` parameter of `table.alterTable`.
    pub fn directives(&self) -> Vec<ColumnDirective> {
        self.renames
            .iter()
            .map(|r| ColumnDirective {
                name: r.from.clone(),
                rename: r.to.clone(),
            })
            .collect()
    }

    /// Directives that undo [`ColumnRenames::directives`].
    pub fn reverse_directives(&self) -> Vec<ColumnDirective> {
        self.renames
            .iter()
            .map(|r| ColumnDirective {
                name: r.to.clone(),
                rename: r.from.clone(),
            })
            .collect()
    }

    /// `table` with the renamed fields pointing at the new column names.
    pub fn apply(&self, table: &ImageTable) -> ImageTable {
        let mut renamed = table.clone();
        for r in &self.renames {
            *r.column.slot(&mut renamed) = r.to.clone();
        }
        renamed
    }
}
