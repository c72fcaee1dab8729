use adforge_core::error::CoreError;
use adforge_core::types::DbId;
use adforge_db::StoreError;

use crate::error::AppResult;

pub mod angle;
pub mod product;
pub mod project;
pub mod script;

/// Parent check for listing endpoints.
///
/// A missing parent is a 404. A failed lookup is only logged: the listing
/// that follows degrades to an empty result on its own.
pub(crate) fn ensure_listing_parent<T>(
    entity: &'static str,
    id: DbId,
    lookup: Result<Option<T>, StoreError>,
) -> AppResult<()> {
    match lookup {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(CoreError::NotFound { entity, id }.into()),
        Err(e) => {
            tracing::warn!(entity, id, error = %e, "Parent lookup failed; listing anyway");
            Ok(())
        }
    }
}
