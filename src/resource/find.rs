//! Name-or-id lookup

use super::manager::{Manager, ResourceKind};
use super::model::Resource;
use crate::sgs::error::{Error, Result};

/// Resolve a user-supplied reference to a single resource.
///
/// The reference is first tried as an id. When the server does not know it,
/// it is matched against resource names: exactly one match resolves, none is
/// [`Error::NotFound`] and several are [`Error::NoUniqueMatch`]. Any other
/// failure of the id lookup is returned as is.
pub async fn find_resource<K: ResourceKind>(
    manager: &Manager<K>,
    reference: &str,
) -> Result<Resource> {
    match manager.get(reference, None).await {
        Ok(resource) => return Ok(resource),
        Err(err) if err.is_lookup_miss() => {
            tracing::debug!("{} '{}' not found by id, trying name", K::DISPLAY, reference);
        }
        Err(err) => return Err(err),
    }

    let mut matches = manager.find_by_name(reference).await?;
    match matches.len() {
        0 => Err(Error::NotFound {
            message: format!(
                "No {} with a name or ID of '{}' exists.",
                K::DISPLAY.to_lowercase(),
                reference
            ),
        }),
        1 => Ok(matches.remove(0)),
        _ => Err(Error::NoUniqueMatch {
            kind: K::DISPLAY.to_lowercase(),
            reference: reference.to_string(),
        }),
    }
}

/// Resolve a reference and return only its id
pub async fn find_id<K: ResourceKind>(manager: &Manager<K>, reference: &str) -> Result<String> {
    let resource = find_resource(manager, reference).await?;
    resource
        .id()
        .ok_or_else(|| Error::Decode(format!("{} '{}' has no id", K::DISPLAY, reference)))
}
