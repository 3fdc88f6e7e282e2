//! SQLite-backed record gateway for the pets table.

use super::address::{AddressTable, Target};
use super::{GatewayError, GatewayResult, ListQuery, RecordGateway};
use crate::contract::{CONTENT_ITEM_TYPE, CONTENT_LIST_TYPE, COLUMN_ID, TABLE_NAME};
use crate::db::{Selection, Session};
use crate::model::fields::FieldMap;
use crate::model::pet::{normalize_fields, validate_insert, validate_update, PetId};
use crate::model::row::RowSet;
use log::{debug, warn};

/// Gateway over a borrowed storage session.
pub struct PetGateway<'s> {
    session: &'s Session,
    addresses: AddressTable,
}

impl<'s> PetGateway<'s> {
    /// Creates a gateway with the standard pets address table.
    pub fn new(session: &'s Session) -> Self {
        Self::with_addresses(session, AddressTable::pets())
    }

    pub fn with_addresses(session: &'s Session, addresses: AddressTable) -> Self {
        Self { session, addresses }
    }

    pub fn session(&self) -> &'s Session {
        self.session
    }

    fn resolve(&self, address: &str, operation: &str) -> GatewayResult<Target> {
        self.addresses.resolve(address).ok_or_else(|| {
            warn!("event=gateway_{operation} module=gateway status=error error_code=invalid_address");
            GatewayError::InvalidAddress(address.to_string())
        })
    }
}

fn row_selection(id: PetId) -> Selection {
    Selection::equals(COLUMN_ID, id)
}

impl RecordGateway for PetGateway<'_> {
    fn list(&self, address: &str, query: &ListQuery) -> GatewayResult<RowSet> {
        let selection = match self.resolve(address, "list")? {
            Target::Table => query.selection.clone(),
            // Caller selection is dropped in favor of the id predicate.
            Target::Row(id) => Some(row_selection(id)),
        };
        let projection: Vec<&str> = query.projection.iter().map(String::as_str).collect();

        let rows = self.session.query(
            TABLE_NAME,
            &projection,
            selection.as_ref(),
            query.sort_order.as_deref(),
        )?;
        Ok(rows)
    }

    fn insert(&self, address: &str, values: &FieldMap) -> GatewayResult<Option<PetId>> {
        match self.resolve(address, "insert")? {
            Target::Table => {}
            Target::Row(_) => {
                warn!("event=gateway_insert module=gateway status=error error_code=row_address");
                return Err(GatewayError::InvalidAddress(address.to_string()));
            }
        }

        validate_insert(values)?;
        let row_id = self.session.insert(TABLE_NAME, &normalize_fields(values))?;
        match row_id {
            Some(id) => debug!("event=gateway_insert module=gateway status=ok row_id={id}"),
            None => warn!("event=gateway_insert module=gateway status=error error_code=no_row_id"),
        }
        Ok(row_id)
    }

    fn update(
        &self,
        address: &str,
        values: &FieldMap,
        selection: Option<&Selection>,
    ) -> GatewayResult<usize> {
        let selection = match self.resolve(address, "update")? {
            Target::Table => selection.cloned(),
            Target::Row(id) => Some(row_selection(id)),
        };

        validate_update(values)?;
        if values.is_empty() {
            return Ok(0);
        }

        let changed = self
            .session
            .update(TABLE_NAME, &normalize_fields(values), selection.as_ref())?;
        debug!("event=gateway_update module=gateway status=ok changed={changed}");
        Ok(changed)
    }

    fn delete(&self, address: &str, selection: Option<&Selection>) -> GatewayResult<usize> {
        let selection = match self.resolve(address, "delete")? {
            Target::Table => selection.cloned(),
            Target::Row(id) => Some(row_selection(id)),
        };

        let deleted = self.session.delete(TABLE_NAME, selection.as_ref())?;
        debug!("event=gateway_delete module=gateway status=ok deleted={deleted}");
        Ok(deleted)
    }

    fn content_type(&self, address: &str) -> GatewayResult<&'static str> {
        match self.resolve(address, "content_type")? {
            Target::Table => Ok(CONTENT_LIST_TYPE),
            Target::Row(_) => Ok(CONTENT_ITEM_TYPE),
        }
    }
}
