//! Cleanup of temporary server-side tables on every exit path.

use log::warn;

use super::cas_table::CasTable;
use crate::actions::table::drop_table;
use crate::client::Session;
use crate::error::Result;

/// Drop `temp` whatever `outcome` is, then hand `outcome` back.
///
/// A drop failure becomes the error when `outcome` succeeded. When `outcome`
/// already failed, its error wins and the drop failure is only logged.
pub async fn drop_after<S: Session, T>(
    session: &mut S,
    temp: &CasTable,
    outcome: Result<T>,
) -> Result<T> {
    let dropped = drop_table(session, temp).await;

    match (outcome, dropped) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(e)) => Err(e),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(drop_err)) => {
            warn!(
                "Temporary table {} may remain on the server: {}",
                temp.name, drop_err
            );
            Err(e)
        }
    }
}
