//! FedSQL statements run through `fedSql.execDirect`.

use log::info;
use serde_json::json;

use crate::client::Session;
use crate::error::Result;
use crate::table::{CasTable, ColumnRenames, ImageTable};

pub const EXEC_DIRECT: &str = "fedSql.execDirect";

/// Run one SQL statement synchronously on the server.
pub async fn exec_direct<S: Session>(session: &mut S, query: &str) -> Result<()> {
    session.invoke(EXEC_DIRECT, json!({ "query": query })).await?;
    info!("Executed SQL: {}", query.split_whitespace().collect::<Vec<_>>().join(" "));
    Ok(())
}

/// `create table <out>` projecting path, perimeter, content and the derived
/// sphericity `(pi^(1/3) * (6*content)^(2/3)) / perimeter` from `source`.
pub fn sphericity_query(out: &CasTable, source: &CasTable, path_column: &str) -> String {
    format!(
        "create table {out}{options} as \
         select {path}, _perimeter_, _content_, \
         (power(pi(), 1.0/3.0) * power(6*_content_, 2.0/3.0))/_perimeter_ as sphericity \
         from {source}",
        out = out.sql_name(),
        options = replace_option(out),
        path = path_column,
        source = source.sql_name(),
    )
}

/// Table option clause for `create table`, set when the table may be replaced.
fn replace_option(table: &CasTable) -> &'static str {
    if table.replace {
        " {options replace=true}"
    } else {
        ""
    }
}

/// How the image table is joined to the renamed mask table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    /// Only images that have a mask
    Inner,
    /// Every image, with null mask columns where no mask matches
    Right,
}

impl JoinKind {
    fn keyword(self) -> &'static str {
        match self {
            JoinKind::Inner => "inner join",
            JoinKind::Right => "right join",
        }
    }
}

/// `create table <temp>` holding the renamed mask columns next to every column
/// of the image table, matched on the id columns.
pub fn mask_join_query(
    temp: &CasTable,
    mask: &ImageTable,
    image: &ImageTable,
    renames: &ColumnRenames,
    join: JoinKind,
) -> String {
    let mask_columns: Vec<String> = renames.iter().map(|r| format!("a.{}", r.to)).collect();

    format!(
        "create table {temp}{options} as \
         select {columns}, b.* \
         from {mask} as a {join} {image} as b \
         on a.{mask_id}=b.{image_id}",
        temp = temp.sql_name(),
        options = replace_option(temp),
        columns = mask_columns.join(", "),
        mask = mask.table.sql_name(),
        join = join.keyword(),
        image = image.table.sql_name(),
        mask_id = mask.id,
        image_id = image.id,
    )
}
