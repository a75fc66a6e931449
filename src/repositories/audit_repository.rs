use serde_json::Value;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::models::module::ResourceModule;
use crate::models::session::SessionContext;
use crate::utils::errors::AppResult;

/// Entrada del registro de auditoría
#[derive(Debug, Clone)]
pub struct AuditEntry<'a> {
    pub ctx: &'a SessionContext,
    pub module: ResourceModule,
    pub record_id: Uuid,
    pub action: &'static str,
    pub detail: Value,
}

pub struct AuditRepository;

impl AuditRepository {
    /// Se escribe en la misma transacción que la mutación auditada
    pub async fn record(conn: &mut PgConnection, entry: AuditEntry<'_>) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO auditoria (usuario_id, modulo, registro_id, accion, detalle)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(entry.ctx.user_id())
        .bind(entry.module.as_str())
        .bind(entry.record_id)
        .bind(entry.action)
        .bind(entry.detail)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }
}
