//! Operation names recognized by the platform.

/// Any operation.
pub const WILDCARD: &str = "*";

/// `CREATE` DDL.
pub const DDL_CREATE: &str = "ddl_create";
/// `ALTER` DDL.
pub const DDL_ALTER: &str = "ddl_alter";
/// `DROP` DDL.
pub const DDL_DROP: &str = "ddl_drop";

/// `INSERT` DML.
pub const DML_INSERT: &str = "dml_insert";
/// `UPDATE` DML.
pub const DML_UPDATE: &str = "dml_update";
/// `MERGE` DML.
pub const DML_MERGE: &str = "dml_merge";
/// `DELETE` DML.
pub const DML_DELETE: &str = "dml_delete";

/// `SELECT` DQL.
pub const DQL_SELECT: &str = "dql_select";

/// Create a Kafka infrastructure connection mapping.
pub const KAFKA_ICM_CREATE: &str = "kafka_icm_create";
/// Read a Kafka infrastructure connection mapping.
pub const KAFKA_ICM_READ: &str = "kafka_icm_read";
/// Update a Kafka infrastructure connection mapping.
pub const KAFKA_ICM_UPDATE: &str = "kafka_icm_update";
/// Delete a Kafka infrastructure connection mapping.
pub const KAFKA_ICM_DELETE: &str = "kafka_icm_delete";

/// Every named operation, wildcard last.
pub const ALL: [&str; 13] = [
    DDL_CREATE,
    DDL_ALTER,
    DDL_DROP,
    DML_INSERT,
    DML_UPDATE,
    DML_MERGE,
    DML_DELETE,
    DQL_SELECT,
    KAFKA_ICM_CREATE,
    KAFKA_ICM_READ,
    KAFKA_ICM_UPDATE,
    KAFKA_ICM_DELETE,
    WILDCARD,
];

/// Whether `name` is one of the platform's operation names.
///
/// Tokens may still carry other names; the platform decides what they mean.
#[must_use]
pub fn is_known(name: &str) -> bool {
    ALL.contains(&name)
}
