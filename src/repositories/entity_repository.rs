//! Repositorio genérico de módulos
//!
//! Todas las consultas reciben un `Predicate` ya acotado por sucursal y por
//! borrado lógico; este repositorio nunca arma condiciones por su cuenta salvo
//! el `id` de la fila que escribe. Los registros cruzan la frontera como JSON
//! (`to_jsonb`), sin las columnas ocultas del módulo.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::{PgConnection, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::lifecycle::LifecycleState;
use crate::models::module::ResourceModule;
use crate::query::Predicate;
use crate::utils::errors::{AppError, AppResult};

const ALIAS: &str = "t";

/// Registro bloqueado para escritura junto con su estado de ciclo de vida
#[derive(Debug, Clone)]
pub struct LockedRecord {
    pub record: Value,
    pub state: LifecycleState,
}

pub struct EntityRepository;

impl EntityRepository {
    pub async fn count(conn: &mut PgConnection, module: ResourceModule, predicate: &Predicate) -> AppResult<i64> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT COUNT(*) FROM {} AS {} WHERE ",
            module.table(),
            ALIAS
        ));
        predicate.push_sql(&mut builder, ALIAS);

        let total = builder
            .build_query_scalar::<i64>()
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| store_error(e, module))?;

        Ok(total)
    }

    pub async fn list(
        conn: &mut PgConnection,
        module: ResourceModule,
        predicate: &Predicate,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<Value>> {
        let mut builder = select(module);
        predicate.push_sql(&mut builder, ALIAS);
        builder.push(format!(" ORDER BY {}.created_at DESC, {}.id", ALIAS, ALIAS));
        builder.push(" LIMIT ").push_bind(limit);
        builder.push(" OFFSET ").push_bind(offset);

        let rows = builder
            .build_query_scalar::<Value>()
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| store_error(e, module))?;

        Ok(rows)
    }

    pub async fn find(conn: &mut PgConnection, module: ResourceModule, predicate: &Predicate) -> AppResult<Option<Value>> {
        let mut builder = select(module);
        predicate.push_sql(&mut builder, ALIAS);

        let row = builder
            .build_query_scalar::<Value>()
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| store_error(e, module))?;

        Ok(row)
    }

    /// `SELECT ... FOR UPDATE` dentro de la transacción de quien llama
    pub async fn lock(
        conn: &mut PgConnection,
        module: ResourceModule,
        predicate: &Predicate,
    ) -> AppResult<Option<LockedRecord>> {
        let mut builder = lock_query(module, predicate);

        let row = builder
            .build_query_as::<(Value, bool, Option<DateTime<Utc>>)>()
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| store_error(e, module))?;

        Ok(row.map(|(record, estado, deleted_at)| LockedRecord {
            record,
            state: LifecycleState::from_columns(estado, deleted_at),
        }))
    }

    /// Inserta sólo las columnas presentes en el payload; el resto toma su DEFAULT
    pub async fn insert(conn: &mut PgConnection, module: ResourceModule, payload: &Map<String, Value>) -> AppResult<Value> {
        let columns = payload_columns(module, payload)?;

        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "INSERT INTO {table} AS {alias} ({cols}) SELECT {cols} FROM jsonb_populate_record(NULL::{table}, ",
            table = module.table(),
            alias = ALIAS,
            cols = columns.join(", ")
        ));
        builder.push_bind(Value::Object(payload.clone()));
        builder.push(format!(") RETURNING {}", record_expr(module)));

        let row = builder
            .build_query_scalar::<Value>()
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| store_error(e, module))?;

        Ok(row)
    }

    pub async fn update(
        conn: &mut PgConnection,
        module: ResourceModule,
        id: Uuid,
        payload: &Map<String, Value>,
    ) -> AppResult<Value> {
        let columns = payload_columns(module, payload)?;
        let assignments: Vec<String> = columns.iter().map(|c| format!("{} = r.{}", c, c)).collect();

        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "UPDATE {table} AS {alias} SET {sets}, updated_at = now() FROM jsonb_populate_record(NULL::{table}, ",
            table = module.table(),
            alias = ALIAS,
            sets = assignments.join(", ")
        ));
        builder.push_bind(Value::Object(payload.clone()));
        builder.push(format!(") AS r WHERE {}.id = ", ALIAS));
        builder.push_bind(id);
        builder.push(format!(" RETURNING {}", record_expr(module)));

        let row = builder
            .build_query_scalar::<Value>()
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| store_error(e, module))?;

        Ok(row)
    }

    /// Persiste un estado de ciclo de vida con una única sentencia
    pub async fn write_lifecycle(
        conn: &mut PgConnection,
        module: ResourceModule,
        id: Uuid,
        state: LifecycleState,
    ) -> AppResult<Value> {
        let (estado, deleted_at) = state.to_columns();

        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "UPDATE {} AS {} SET estado = ",
            module.table(),
            ALIAS
        ));
        builder.push_bind(estado);
        builder.push(", deleted_at = ").push_bind(deleted_at);
        builder.push(format!(", updated_at = now() WHERE {}.id = ", ALIAS));
        builder.push_bind(id);
        builder.push(format!(" RETURNING {}", record_expr(module)));

        let row = builder
            .build_query_scalar::<Value>()
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| store_error(e, module))?;

        Ok(row)
    }

    /// Borrado físico e irreversible
    pub async fn hard_delete(conn: &mut PgConnection, module: ResourceModule, id: Uuid) -> AppResult<u64> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", module.table()))
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(|e| store_error(e, module))?;

        Ok(result.rows_affected())
    }
}

fn select(module: ResourceModule) -> QueryBuilder<'static, Postgres> {
    QueryBuilder::new(format!(
        "SELECT {} FROM {} AS {} WHERE ",
        record_expr(module),
        module.table(),
        ALIAS
    ))
}

/// Registro más las dos columnas de ciclo de vida, con la fila bloqueada
fn lock_query<'a>(module: ResourceModule, predicate: &'a Predicate) -> QueryBuilder<'a, Postgres> {
    let mut builder = QueryBuilder::<Postgres>::new(format!(
        "SELECT {}, {alias}.estado, {alias}.deleted_at FROM {} AS {alias} WHERE ",
        record_expr(module),
        module.table(),
        alias = ALIAS
    ));
    predicate.push_sql(&mut builder, ALIAS);
    builder.push(format!(" FOR UPDATE OF {}", ALIAS));
    builder
}

/// `to_jsonb(t.*) - 'password_hash' ...`
fn record_expr(module: ResourceModule) -> String {
    let mut expr = format!("to_jsonb({}.*)", ALIAS);
    for column in module.hidden_columns() {
        expr.push_str(&format!(" - '{}'", column));
    }
    expr
}

/// Columnas del payload, todas dentro de la lista blanca del módulo
fn payload_columns(module: ResourceModule, payload: &Map<String, Value>) -> AppResult<Vec<&'static str>> {
    if payload.is_empty() {
        return Err(AppError::InvalidArgument("el payload no tiene campos".to_string()));
    }

    let writable = module.writable_columns();
    let unknown: Vec<&str> = payload
        .keys()
        .map(String::as_str)
        .filter(|key| !writable.contains(key))
        .collect();
    if !unknown.is_empty() {
        return Err(AppError::InvalidArgument(format!(
            "campos no permitidos en {}: {}",
            module,
            unknown.join(", ")
        )));
    }

    Ok(writable
        .iter()
        .copied()
        .filter(|column| payload.contains_key(*column))
        .collect())
}

/// Traduce violaciones de restricciones a errores de la taxonomía
fn store_error(error: sqlx::Error, module: ResourceModule) -> AppError {
    if let sqlx::Error::Database(db_error) = &error {
        match db_error.code().as_deref() {
            Some("23505") => {
                return AppError::Conflict(format!("{} duplicado: {}", module.singular(), db_error.message()))
            }
            Some("23503") => {
                return AppError::Conflict(format!(
                    "{} referencia o es referenciado por otro registro: {}",
                    module.singular(),
                    db_error.message()
                ))
            }
            Some("23502") | Some("22P02") | Some("23514") => {
                return AppError::InvalidArgument(db_error.message().to_string())
            }
            _ => {}
        }
    }
    AppError::Database(error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn test_record_expression_hides_password_hash() {
        assert_eq!(record_expr(ResourceModule::Usuarios), "to_jsonb(t.*) - 'password_hash'");
        assert_eq!(record_expr(ResourceModule::Vehiculos), "to_jsonb(t.*)");
    }

    #[test]
    fn test_payload_columns_follow_whitelist_order() {
        let payload = object(json!({ "sucursal_id": Uuid::nil().to_string(), "placa": "ABC-123" }));
        let columns = payload_columns(ResourceModule::Vehiculos, &payload).unwrap();
        assert_eq!(columns, vec!["placa", "sucursal_id"]);
    }

    #[test]
    fn test_payload_with_lifecycle_columns_is_rejected() {
        let payload = object(json!({ "placa": "ABC-123", "deleted_at": null }));
        let err = payload_columns(ResourceModule::Vehiculos, &payload).unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(msg) if msg.contains("deleted_at")));
    }

    #[test]
    fn test_empty_payload_is_rejected() {
        assert!(payload_columns(ResourceModule::Clientes, &Map::new()).is_err());
    }

    #[test]
    fn test_select_is_scoped_by_predicate() {
        let branch = Uuid::new_v4();
        let predicate = Predicate::new().equals("sucursal_id", branch);
        let mut builder = select(ResourceModule::Vehiculos);
        predicate.push_sql(&mut builder, ALIAS);
        assert_eq!(
            builder.sql(),
            "SELECT to_jsonb(t.*) FROM vehiculos AS t WHERE t.sucursal_id = $1"
        );
    }

    #[test]
    fn test_lock_selects_record_and_lifecycle_columns_only() {
        let id = Uuid::new_v4();
        let predicate = Predicate::new().equals("id", id);
        let builder = lock_query(ResourceModule::Usuarios, &predicate);
        assert_eq!(
            builder.sql(),
            "SELECT to_jsonb(t.*) - 'password_hash', t.estado, t.deleted_at FROM usuarios AS t WHERE t.id = $1 FOR UPDATE OF t"
        );
    }
}
