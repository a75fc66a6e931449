//! Controlador genérico de módulos
//!
//! Orquesta cada operación en el mismo orden: permiso por rol, predicado
//! efectivo (sucursal + borrado lógico), bloqueo del registro, permiso sobre el
//! registro concreto, escritura y auditoría dentro de una única transacción.

use bcrypt::{hash, DEFAULT_COST};
use chrono::Utc;
use serde_json::{json, Map, Value};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::entity_dto::{ListQuery, ListResponse};
use crate::dto::ApiResponse;
use crate::models::lifecycle::LifecycleAction;
use crate::models::module::{BranchShape, RecordBranches, ResourceModule};
use crate::models::role::UserRole;
use crate::models::session::SessionContext;
use crate::query::{effective_predicate, FilterMode, Predicate};
use crate::repositories::{AuditEntry, AuditRepository, EntityRepository};
use crate::services::AuthorizationService;
use crate::utils::errors::{invalid_argument, not_found_error, AppError, AppResult, AuthorizationError};

const MIN_PASSWORD_LENGTH: usize = 8;

pub struct EntityController {
    pool: PgPool,
}

impl EntityController {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, ctx: &SessionContext, module: ResourceModule, query: ListQuery) -> AppResult<ListResponse> {
        query.validate()?;
        let filter = FilterMode::from_param(query.estado.as_deref())?;
        let predicate = effective_predicate(ctx, module, Predicate::new(), filter)?;

        let mut conn = self.pool.acquire().await?;
        let total = EntityRepository::count(&mut *conn, module, &predicate).await?;
        let items = EntityRepository::list(&mut *conn, module, &predicate, query.per_page(), query.offset()).await?;

        tracing::debug!("📋 {} {} de {} para {}", items.len(), module, total, ctx.user_id());

        Ok(ListResponse {
            items,
            total,
            page: query.page(),
            per_page: query.per_page(),
            filter,
        })
    }

    pub async fn get(
        &self,
        ctx: &SessionContext,
        module: ResourceModule,
        id: Uuid,
        estado: Option<&str>,
    ) -> AppResult<Value> {
        let filter = FilterMode::from_param(estado)?;
        let predicate = effective_predicate(ctx, module, Predicate::new().equals("id", id), filter)?;

        let mut conn = self.pool.acquire().await?;
        EntityRepository::find(&mut *conn, module, &predicate)
            .await?
            .ok_or_else(|| not_found(module, id))
    }

    pub async fn create(
        &self,
        ctx: &SessionContext,
        module: ResourceModule,
        payload: Value,
    ) -> AppResult<ApiResponse<Value>> {
        AuthorizationService::require_create(ctx, module)?;

        let mut fields = into_fields(payload)?;
        prepare_fields(ctx, module, &mut fields, WriteKind::Create)?;
        default_branch(ctx, module, &mut fields);
        require_write_scope(ctx, module, &RecordBranches::from_json(module, &Value::Object(fields.clone())))?;

        let mut tx = self.pool.begin().await?;
        let record = EntityRepository::insert(&mut *tx, module, &fields).await?;
        let record_id = record_id(&record)?;
        AuditRepository::record(
            &mut *tx,
            AuditEntry {
                ctx,
                module,
                record_id,
                action: "crear",
                detail: audit_detail(&fields),
            },
        )
        .await?;
        tx.commit().await?;

        tracing::info!("✅ {} {} creado por {}", module.singular(), record_id, ctx.user_id());

        Ok(ApiResponse::success_with_message(
            record,
            format!("Registro creado en {}", module),
        ))
    }

    /// Edita un registro no eliminado. El resultado tiene que seguir dentro de
    /// la sucursal de quien edita.
    pub async fn update(
        &self,
        ctx: &SessionContext,
        module: ResourceModule,
        id: Uuid,
        payload: Value,
    ) -> AppResult<ApiResponse<Value>> {
        AuthorizationService::require_edit(ctx, module, None)?;

        let mut fields = into_fields(payload)?;
        prepare_fields(ctx, module, &mut fields, WriteKind::Update)?;
        let predicate = effective_predicate(ctx, module, Predicate::new().equals("id", id), FilterMode::ActiveOnly)?;

        let mut tx = self.pool.begin().await?;
        let locked = EntityRepository::lock(&mut *tx, module, &predicate)
            .await?
            .ok_or_else(|| not_found(module, id))?;

        AuthorizationService::require_edit(ctx, module, Some(&RecordBranches::from_json(module, &locked.record)))?;
        require_account_control(ctx, module, &locked.record)?;
        let merged = merge(&locked.record, &fields);
        require_write_scope(ctx, module, &RecordBranches::from_json(module, &merged))?;

        let record = EntityRepository::update(&mut *tx, module, id, &fields).await?;
        AuditRepository::record(
            &mut *tx,
            AuditEntry {
                ctx,
                module,
                record_id: id,
                action: "editar",
                detail: audit_detail(&fields),
            },
        )
        .await?;
        tx.commit().await?;

        tracing::info!("✏️ {} {} editado por {}", module.singular(), id, ctx.user_id());

        Ok(ApiResponse::success_with_message(
            record,
            format!("Registro actualizado en {}", module),
        ))
    }

    /// Aplica una acción de ciclo de vida. Un no-op no escribe nada ni audita.
    pub async fn transition(
        &self,
        ctx: &SessionContext,
        module: ResourceModule,
        id: Uuid,
        action: LifecycleAction,
    ) -> AppResult<ApiResponse<Value>> {
        match action {
            LifecycleAction::SoftDelete | LifecycleAction::Restore => {
                AuthorizationService::require_delete(ctx, module)?
            }
            LifecycleAction::Deactivate | LifecycleAction::Reactivate => {
                AuthorizationService::require_edit(ctx, module, None)?
            }
        }

        let predicate = effective_predicate(ctx, module, Predicate::new().equals("id", id), FilterMode::All)?;

        let mut tx = self.pool.begin().await?;
        let locked = EntityRepository::lock(&mut *tx, module, &predicate)
            .await?
            .ok_or_else(|| not_found(module, id))?;

        AuthorizationService::require_edit(ctx, module, Some(&RecordBranches::from_json(module, &locked.record)))?;
        require_account_control(ctx, module, &locked.record)?;

        let transition = locked.state.apply(action, Utc::now())?;
        if !transition.changed {
            tx.rollback().await?;
            tracing::debug!("↩️ {} sobre {} {} sin cambios ({})", action.as_str(), module, id, locked.state.name());
            return Ok(ApiResponse::success_with_message(
                locked.record,
                format!("El registro ya estaba {}", locked.state.name()),
            ));
        }

        let record = EntityRepository::write_lifecycle(&mut *tx, module, id, transition.state).await?;
        AuditRepository::record(
            &mut *tx,
            AuditEntry {
                ctx,
                module,
                record_id: id,
                action: action.as_str(),
                detail: json!({ "desde": locked.state.name(), "hacia": transition.state.name() }),
            },
        )
        .await?;
        tx.commit().await?;

        tracing::info!(
            "🔄 {} {}: {} -> {} por {}",
            module.singular(),
            id,
            locked.state.name(),
            transition.state.name(),
            ctx.user_id()
        );

        Ok(ApiResponse::success_with_message(
            record,
            format!("Acción '{}' aplicada en {}", action.as_str(), module),
        ))
    }

    /// Borrado físico; la fila eliminada queda copiada en la auditoría
    pub async fn hard_delete(
        &self,
        ctx: &SessionContext,
        module: ResourceModule,
        id: Uuid,
    ) -> AppResult<ApiResponse<Value>> {
        AuthorizationService::require_hard_delete(ctx, module)?;

        let predicate = effective_predicate(ctx, module, Predicate::new().equals("id", id), FilterMode::All)?;

        let mut tx = self.pool.begin().await?;
        let locked = EntityRepository::lock(&mut *tx, module, &predicate)
            .await?
            .ok_or_else(|| not_found(module, id))?;

        EntityRepository::hard_delete(&mut *tx, module, id).await?;
        AuditRepository::record(
            &mut *tx,
            AuditEntry {
                ctx,
                module,
                record_id: id,
                action: "eliminar_permanente",
                detail: locked.record,
            },
        )
        .await?;
        tx.commit().await?;

        tracing::warn!("🗑️ {} {} eliminado permanentemente por {}", module.singular(), id, ctx.user_id());

        Ok(ApiResponse::success_with_message(
            json!({ "id": id }),
            format!("Registro eliminado permanentemente de {}", module),
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteKind {
    Create,
    Update,
}

fn not_found(module: ResourceModule, id: Uuid) -> AppError {
    not_found_error(module.singular(), &id.to_string())
}

fn into_fields(payload: Value) -> AppResult<Map<String, Value>> {
    match payload {
        Value::Object(fields) => Ok(fields),
        _ => Err(invalid_argument("el cuerpo debe ser un objeto JSON")),
    }
}

/// Normaliza el payload antes de escribirlo: rol validado, contraseña
/// convertida en hash. El hash nunca llega desde el cliente.
fn prepare_fields(
    ctx: &SessionContext,
    module: ResourceModule,
    fields: &mut Map<String, Value>,
    kind: WriteKind,
) -> AppResult<()> {
    if fields.contains_key("password_hash") {
        return Err(invalid_argument("password_hash no se puede escribir directamente"));
    }
    if module != ResourceModule::Usuarios {
        return Ok(());
    }

    if let Some(raw) = fields.get("rol") {
        let role: UserRole = raw
            .as_str()
            .ok_or_else(|| invalid_argument("rol debe ser texto"))?
            .parse()?;

        if !AuthorizationService::can_assign_role(ctx, role) {
            tracing::warn!("🚫 {} ({}) intentó asignar {}", ctx.user_id(), ctx.role(), role);
            return Err(AuthorizationError::Forbidden {
                role: ctx.role().to_string(),
                action: "asignar el rol SUPER_ADMIN",
                module: module.as_str(),
            }
            .into());
        }
        fields.insert("rol".to_string(), Value::String(role.as_str().to_string()));
    }

    match fields.remove("password") {
        Some(Value::String(password)) => {
            if password.chars().count() < MIN_PASSWORD_LENGTH {
                return Err(invalid_argument(format!(
                    "la contraseña debe tener al menos {} caracteres",
                    MIN_PASSWORD_LENGTH
                )));
            }
            let password_hash = hash(&password, DEFAULT_COST)
                .map_err(|e| AppError::Hash(format!("Error generando hash: {}", e)))?;
            fields.insert("password_hash".to_string(), Value::String(password_hash));
        }
        Some(_) => return Err(invalid_argument("password debe ser texto")),
        None if kind == WriteKind::Create => return Err(invalid_argument("password es obligatorio")),
        None => {}
    }

    Ok(())
}

/// Los registros que crea una sesión de sucursal nacen en su sucursal
fn default_branch(ctx: &SessionContext, module: ResourceModule, fields: &mut Map<String, Value>) {
    let Some(branch_id) = ctx.branch_id().filter(|_| ctx.role().requires_branch_scope()) else {
        return;
    };

    match module.branch_shape() {
        BranchShape::Column(column) if !fields.contains_key(column) => {
            fields.insert(column.to_string(), json!(branch_id));
        }
        BranchShape::OriginDestination { origin, destination }
            if !fields.contains_key(origin) && !fields.contains_key(destination) =>
        {
            fields.insert(origin.to_string(), json!(branch_id));
        }
        _ => {}
    }
}

/// El registro resultante de una escritura debe quedar visible para quien la hace
fn require_write_scope(
    ctx: &SessionContext,
    module: ResourceModule,
    branches: &RecordBranches,
) -> Result<(), AuthorizationError> {
    let scoped = ctx.role().requires_branch_scope() && module.branch_shape() != BranchShape::Unscoped;
    if scoped && ctx.branch_id().is_none() {
        return Err(AuthorizationError::MissingBranchContext);
    }

    AuthorizationService::require_edit(ctx, module, Some(branches))?;

    if scoped && branches.is_unbranched() {
        return Err(AuthorizationError::BranchMismatch);
    }
    Ok(())
}

/// En `usuarios` el rol guardado del registro también limita quién lo toca
fn require_account_control(ctx: &SessionContext, module: ResourceModule, record: &Value) -> AppResult<()> {
    if module != ResourceModule::Usuarios {
        return Ok(());
    }

    let stored = record
        .get("rol")
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::Internal("la cuenta no tiene rol".to_string()))?;
    let target: UserRole = stored
        .parse()
        .map_err(|_| AppError::Internal(format!("rol desconocido en la cuenta: {}", stored)))?;

    AuthorizationService::require_account_control(ctx, target)?;
    Ok(())
}

fn merge(record: &Value, fields: &Map<String, Value>) -> Value {
    let mut merged = match record {
        Value::Object(existing) => existing.clone(),
        _ => Map::new(),
    };
    for (key, value) in fields {
        merged.insert(key.clone(), value.clone());
    }
    Value::Object(merged)
}

fn record_id(record: &Value) -> AppResult<Uuid> {
    record
        .get("id")
        .and_then(Value::as_str)
        .and_then(|raw| Uuid::parse_str(raw).ok())
        .ok_or_else(|| AppError::Internal("el registro insertado no tiene id".to_string()))
}

fn audit_detail(fields: &Map<String, Value>) -> Value {
    let mut detail = fields.clone();
    detail.remove("password_hash");
    Value::Object(detail)
}
