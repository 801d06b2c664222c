//! Read-only dictionary interface consumed at bind time

use parking_lot::RwLock;

use super::{
    AggregateRegistration, Catalog, CatalogResult, ObjectDescriptor, ObjectId, SchemaDescriptor,
    SchemaId,
};
use crate::sql::privileges::GrantRecord;

/// Transaction the dictionary reads are performed in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxnContext {
    pub txn_id: u64,
}

impl TxnContext {
    pub fn new(txn_id: u64) -> Self {
        Self { txn_id }
    }
}

/// Read-only view of the data dictionary
///
/// Every method reflects the dictionary state as of the call; implementors
/// must not cache across calls. `Err` means the read itself failed, `Ok(None)`
/// means the row does not exist.
pub trait DataDictionary: Send + Sync {
    /// Grant record for (object, grantee), if any
    fn lookup_grant(
        &self,
        txn: &TxnContext,
        object: ObjectId,
        grantee: &str,
    ) -> CatalogResult<Option<GrantRecord>>;

    /// Descriptor of a live object
    fn resolve_object(
        &self,
        txn: &TxnContext,
        object: ObjectId,
    ) -> CatalogResult<Option<ObjectDescriptor>>;

    /// Descriptor of a live schema
    fn resolve_schema(
        &self,
        txn: &TxnContext,
        schema: SchemaId,
    ) -> CatalogResult<Option<SchemaDescriptor>>;

    /// Registration of a user-defined aggregate
    fn lookup_aggregate(
        &self,
        txn: &TxnContext,
        alias: ObjectId,
    ) -> CatalogResult<Option<AggregateRegistration>>;
}

impl DataDictionary for RwLock<Catalog> {
    fn lookup_grant(
        &self,
        txn: &TxnContext,
        object: ObjectId,
        grantee: &str,
    ) -> CatalogResult<Option<GrantRecord>> {
        self.read().lookup_grant(txn, object, grantee)
    }

    fn resolve_object(
        &self,
        txn: &TxnContext,
        object: ObjectId,
    ) -> CatalogResult<Option<ObjectDescriptor>> {
        self.read().resolve_object(txn, object)
    }

    fn resolve_schema(
        &self,
        txn: &TxnContext,
        schema: SchemaId,
    ) -> CatalogResult<Option<SchemaDescriptor>> {
        self.read().resolve_schema(txn, schema)
    }

    fn lookup_aggregate(
        &self,
        txn: &TxnContext,
        alias: ObjectId,
    ) -> CatalogResult<Option<AggregateRegistration>> {
        self.read().lookup_aggregate(txn, alias)
    }
}
