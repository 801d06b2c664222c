//! Shared test utilities
//!
//! Note: clippy reports false-positive dead_code warnings because it can't
//! trace usage across test binaries. These utilities are used by multiple tests.

#![allow(dead_code)]

use std::sync::Once;

use bindguard::catalog::{Catalog, DataType, ObjectId, ObjectKind, SchemaId, TxnContext};
use bindguard::loader::{Aggregator, Artifact, ClassPath, AGGREGATOR_CONTRACT};
use bindguard::sql::{GrantRecord, Privilege, RuntimeType};
use parking_lot::RwLock;
use tracing_subscriber::EnvFilter;

pub const MODE_CLASS: &str = "acme.agg.Mode";
pub const AVGPLUS_CLASS: &str = "acme.agg.AvgPlus";
pub const LONGEST_CLASS: &str = "acme.agg.Longest";

static TRACING: Once = Once::new();

/// Install a test subscriber once per binary (RUST_LOG controls output)
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Most frequent value
#[derive(Default)]
pub struct Mode {
    counts: Vec<(i32, u64)>,
}

impl Aggregator for Mode {
    type Input = i32;
    type Return = i32;

    fn init(&mut self) {
        self.counts.clear();
    }

    fn accumulate(&mut self, value: i32) {
        match self.counts.iter_mut().find(|(v, _)| *v == value) {
            Some((_, n)) => *n += 1,
            None => self.counts.push((value, 1)),
        }
    }

    fn merge(&mut self, other: &Self) {
        for (value, n) in &other.counts {
            match self.counts.iter_mut().find(|(v, _)| v == value) {
                Some((_, mine)) => *mine += n,
                None => self.counts.push((*value, *n)),
            }
        }
    }

    fn terminate(&self) -> Option<i32> {
        self.counts
            .iter()
            .max_by_key(|(v, n)| (*n, -*v))
            .map(|(v, _)| *v)
    }
}

/// Catalog objects created by [`test_catalog`]
pub struct TestObjects {
    pub app: SchemaId,
    pub routine: ObjectId,
    pub orders: ObjectId,
    pub mode: ObjectId,
    pub avgplus: ObjectId,
    pub longest: ObjectId,
}

/// Create a test catalog with sample objects
///
/// - schema APP owned by `dba`
/// - function APP.R; bob holds EXECUTE
/// - table APP.ORDERS
/// - aggregate APP.MODE (INTEGER -> INTEGER), bob holds EXECUTE
/// - aggregate APP.AVGPLUS (DECIMAL -> DECIMAL), bob holds EXECUTE
/// - aggregate APP.LONGEST (VARCHAR -> VARCHAR), granted to PUBLIC
pub fn test_catalog() -> (RwLock<Catalog>, TestObjects) {
    let mut catalog = Catalog::new();
    let dec = DataType::Decimal {
        precision: 31,
        scale: 5,
    };

    let app = catalog.create_schema("APP", "dba").unwrap();
    let routine = catalog
        .create_object(app, "R", ObjectKind::Function)
        .unwrap();
    let orders = catalog
        .create_object(app, "ORDERS", ObjectKind::Table)
        .unwrap();
    let mode = catalog
        .create_aggregate(app, "MODE", DataType::Int, DataType::Int, MODE_CLASS)
        .unwrap();
    let avgplus = catalog
        .create_aggregate(app, "AVGPLUS", dec.clone(), dec, AVGPLUS_CLASS)
        .unwrap();
    let longest = catalog
        .create_aggregate(
            app,
            "LONGEST",
            DataType::Varchar(100),
            DataType::Varchar(100),
            LONGEST_CLASS,
        )
        .unwrap();

    for object in [routine, mode, avgplus] {
        catalog
            .grant(GrantRecord::new("bob", object, vec![Privilege::Execute], "dba"))
            .unwrap();
    }
    catalog
        .grant(GrantRecord::new(
            bindguard::sql::PUBLIC,
            longest,
            vec![Privilege::Execute],
            "dba",
        ))
        .unwrap();

    (
        RwLock::new(catalog),
        TestObjects {
            app,
            routine,
            orders,
            mode,
            avgplus,
            longest,
        },
    )
}

/// Class path where MODE conforms and AVGPLUS is declared over i32 input
pub fn test_class_path() -> ClassPath {
    let cp = ClassPath::new();
    cp.deploy_aggregator::<Mode>(MODE_CLASS);
    cp.deploy(Artifact::new(AVGPLUS_CLASS).implementing(
        &AGGREGATOR_CONTRACT,
        vec![
            Some(RuntimeType::Int32),
            Some(RuntimeType::Decimal),
            Some(RuntimeType::Opaque("acme.agg.AvgPlus".to_string())),
        ],
    ));
    cp.deploy(Artifact::new(LONGEST_CLASS).implementing(
        &AGGREGATOR_CONTRACT,
        vec![
            Some(RuntimeType::String),
            Some(RuntimeType::String),
            Some(RuntimeType::Opaque("acme.agg.Longest".to_string())),
        ],
    ));
    cp
}

pub fn txn() -> TxnContext {
    TxnContext::new(1)
}
