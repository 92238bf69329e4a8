//! Actions of the `table` action set.

use log::info;
use serde_json::{json, Value};

use crate::client::Session;
use crate::error::{CasError, Result};
use crate::table::{CasTable, ColumnDirective};

pub const DROP_TABLE: &str = "table.dropTable";
pub const ALTER_TABLE: &str = "table.alterTable";
pub const COLUMN_INFO: &str = "table.columnInfo";
pub const TABLE_INFO: &str = "table.tableInfo";
pub const FETCH: &str = "table.fetch";
pub const UPLOAD: &str = "table.upload";
pub const SAVE: &str = "table.save";
pub const LOAD_TABLE: &str = "table.loadTable";

fn named(table: &CasTable) -> Value {
    let mut params = json!({ "name": table.name });
    if let Some(caslib) = &table.caslib {
        params["caslib"] = json!(caslib);
    }
    params
}

/// Drop `table` from the server.
pub async fn drop_table<S: Session>(session: &mut S, table: &CasTable) -> Result<()> {
    session.invoke(DROP_TABLE, named(table)).await?;
    info!("Dropped table {}", table.name);
    Ok(())
}

/// Rename columns of `table` in place on the server.
pub async fn alter_table<S: Session>(
    session: &mut S,
    table: &CasTable,
    columns: &[ColumnDirective],
) -> Result<()> {
    let mut params = named(table);
    params["columns"] = serde_json::to_value(columns)?;
    session.invoke(ALTER_TABLE, params).await?;
    info!("Renamed {} column(s) of {}", columns.len(), table.name);
    Ok(())
}

/// Names of the columns of `table`, in server order.
pub async fn column_names<S: Session>(session: &mut S, table: &CasTable) -> Result<Vec<String>> {
    let result = session
        .invoke(COLUMN_INFO, json!({ "table": table }))
        .await?;

    let rows = result
        .get("ColumnInfo")
        .and_then(|info| info.as_array())
        .ok_or_else(|| CasError::MissingColumnInfo(table.name.clone()))?;

    Ok(rows
        .iter()
        .filter_map(|row| row.get("Column").and_then(|c| c.as_str()))
        .map(str::to_string)
        .collect())
}

/// Number of rows in `table`.
pub async fn row_count<S: Session>(session: &mut S, table: &CasTable) -> Result<u64> {
    let result = session.invoke(TABLE_INFO, named(table)).await?;

    result
        .get("TableInfo")
        .and_then(|info| info.as_array())
        .and_then(|rows| rows.first())
        .and_then(|row| row.get("Rows"))
        .and_then(|rows| rows.as_u64())
        .ok_or_else(|| CasError::UnexpectedResponse {
            action: TABLE_INFO.to_string(),
            detail: format!("no row count for {}", table.name),
        })
}

/// The first `to` rows of `table`, each as a column-name keyed object.
pub async fn fetch_rows<S: Session>(
    session: &mut S,
    table: &CasTable,
    to: usize,
) -> Result<Vec<Value>> {
    let result = session
        .invoke(FETCH, json!({ "table": table.as_input(), "to": to }))
        .await?;

    result
        .get("Fetch")
        .and_then(|rows| rows.as_array())
        .cloned()
        .ok_or_else(|| CasError::UnexpectedResponse {
            action: FETCH.to_string(),
            detail: format!("no rows fetched from {}", table.name),
        })
}

/// Upload CSV text into `casout`, typing every column as varchar.
pub async fn upload_csv<S: Session>(
    session: &mut S,
    casout: &CasTable,
    columns: &[&str],
    data: &str,
) -> Result<()> {
    let vars: Vec<Value> = columns
        .iter()
        .map(|name| json!({ "name": name, "type": "VARCHAR" }))
        .collect();
    let params = json!({
        "casOut": casout,
        "importOptions": { "fileType": "CSV", "vars": vars },
        "data": data,
    });

    session.invoke(UPLOAD, params).await?;
    info!("Uploaded {} bytes into {}", data.len(), casout.name);
    Ok(())
}

/// Persist `table` as `path` (relative to `caslib`) on the server's storage.
pub async fn save_table<S: Session>(
    session: &mut S,
    table: &CasTable,
    caslib: &str,
    path: &str,
    replace: bool,
) -> Result<()> {
    let params = json!({
        "table": table.as_input(),
        "name": path,
        "caslib": caslib,
        "replace": replace,
    });
    session.invoke(SAVE, params).await?;
    info!("Saved {} to {}:{}", table.name, caslib, path);
    Ok(())
}

/// Load the file at `path` (relative to `caslib`) into `casout`.
pub async fn load_table<S: Session>(
    session: &mut S,
    caslib: &str,
    path: &str,
    casout: &CasTable,
) -> Result<()> {
    let params = json!({ "path": path, "caslib": caslib, "casOut": casout });
    session.invoke(LOAD_TABLE, params).await?;
    info!("Loaded {}:{} into {}", caslib, path, casout.name);
    Ok(())
}
