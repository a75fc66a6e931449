//! Frontera de datos por rol
//!
//! Decide qué filas ve o muta una sesión: SUPER_ADMIN todas, el resto sólo las
//! de su sucursal. Se aplica antes del filtro de borrado lógico; como ambos sólo
//! añaden cláusulas a un conjunto, el orden de aplicación no altera el resultado.

use super::predicate::{FieldFilter, Predicate};
use super::soft_delete::{apply_soft_delete_filter, FilterMode};
use crate::models::module::{BranchShape, ResourceModule};
use crate::models::role::UserRole;
use crate::models::session::SessionContext;
use crate::utils::errors::AuthorizationError;

/// Restringe `base` a las filas visibles para la sesión en el módulo dado
pub fn scope_query(
    ctx: &SessionContext,
    module: ResourceModule,
    base: Predicate,
) -> Result<Predicate, AuthorizationError> {
    match ctx.role() {
        UserRole::SuperAdmin => Ok(base),
        UserRole::AdminSucursal | UserRole::Operador | UserRole::Conductor => {
            let shape = module.branch_shape();
            if shape == BranchShape::Unscoped {
                return Ok(base);
            }

            let branch_id = ctx
                .branch_id()
                .ok_or(AuthorizationError::MissingBranchContext)?;

            Ok(match shape {
                BranchShape::Unscoped => base,
                BranchShape::SelfId => base.equals("id", branch_id),
                BranchShape::Column(column) => base.equals(column, branch_id),
                BranchShape::OriginDestination { origin, destination } => base.with_any_of([
                    (origin, FieldFilter::Equals(branch_id.into())),
                    (destination, FieldFilter::Equals(branch_id.into())),
                ]),
            })
        }
    }
}

/// Predicado efectivo de una lectura: frontera por sucursal y luego filtro de borrado
pub fn effective_predicate(
    ctx: &SessionContext,
    module: ResourceModule,
    base: Predicate,
    mode: FilterMode,
) -> Result<Predicate, AuthorizationError> {
    let scoped = scope_query(ctx, module, base)?;
    Ok(apply_soft_delete_filter(scoped, mode))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    fn session(role: UserRole, branch_id: Option<Uuid>) -> SessionContext {
        SessionContext::new(Uuid::new_v4(), "test@logistica.pe", role, branch_id)
    }

    #[test]
    fn test_super_admin_sees_everything() {
        let ctx = session(UserRole::SuperAdmin, None);
        for module in ResourceModule::ALL {
            let scoped = scope_query(&ctx, module, Predicate::new()).unwrap();
            assert!(scoped.is_empty());
        }
    }

    #[test]
    fn test_branch_roles_are_pinned_to_their_branch() {
        let branch = Uuid::new_v4();
        for role in [UserRole::AdminSucursal, UserRole::Operador, UserRole::Conductor] {
            let ctx = session(role, Some(branch));
            let scoped = scope_query(&ctx, ResourceModule::Vehiculos, Predicate::new()).unwrap();
            assert_eq!(scoped.to_json(), json!({ "sucursalId": branch.to_string() }));
        }
    }

    #[test]
    fn test_routes_use_origin_or_destination() {
        let branch = Uuid::new_v4();
        let ctx = session(UserRole::AdminSucursal, Some(branch));
        let scoped = scope_query(&ctx, ResourceModule::Rutas, Predicate::new()).unwrap();
        assert_eq!(
            scoped.to_json(),
            json!({ "OR": [
                { "sucursalDestinoId": branch.to_string() },
                { "sucursalOrigenId": branch.to_string() }
            ]})
        );
    }

    #[test]
    fn test_branches_are_scoped_by_their_own_id() {
        let branch = Uuid::new_v4();
        let ctx = session(UserRole::Operador, Some(branch));
        let scoped = scope_query(&ctx, ResourceModule::Sucursales, Predicate::new()).unwrap();
        assert_eq!(scoped.to_json(), json!({ "id": branch.to_string() }));
    }

    #[test]
    fn test_missing_branch_fails_instead_of_returning_rows() {
        let ctx = session(UserRole::AdminSucursal, None);
        let result = scope_query(&ctx, ResourceModule::Envios, Predicate::new());
        assert_eq!(result, Err(AuthorizationError::MissingBranchContext));
    }

    #[test]
    fn test_shared_catalog_is_not_pinned() {
        let ctx = session(UserRole::Conductor, None);
        let scoped = scope_query(&ctx, ResourceModule::Clientes, Predicate::new()).unwrap();
        assert!(scoped.is_empty());
    }

    #[test]
    fn test_scope_and_soft_delete_commute() {
        let branch = Uuid::new_v4();
        let ctx = session(UserRole::AdminSucursal, Some(branch));
        let base = Predicate::new().equals("placa", "ABC-123");

        for module in ResourceModule::ALL {
            for mode in [FilterMode::ActiveOnly, FilterMode::DeletedOnly, FilterMode::All] {
                let scope_first = effective_predicate(&ctx, module, base.clone(), mode).unwrap();
                let filter_first =
                    scope_query(&ctx, module, apply_soft_delete_filter(base.clone(), mode)).unwrap();
                assert_eq!(scope_first, filter_first, "{} / {:?}", module, mode);
            }
        }
    }
}
