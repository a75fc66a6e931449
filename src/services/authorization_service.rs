use serde::Serialize;

use crate::models::module::{RecordBranches, ResourceModule};
use crate::models::role::UserRole;
use crate::models::session::SessionContext;
use crate::utils::errors::AuthorizationError;

/// Módulos donde ADMIN_SUCURSAL puede crear registros
const BRANCH_ADMIN_CREATE: &[ResourceModule] = &[
    ResourceModule::Vehiculos,
    ResourceModule::Rutas,
    ResourceModule::Clientes,
    ResourceModule::Envios,
];

/// Módulos donde ADMIN_SUCURSAL puede eliminar (siempre borrado lógico) y restaurar
const BRANCH_ADMIN_DELETE: &[ResourceModule] = &[
    ResourceModule::Vehiculos,
    ResourceModule::Rutas,
    ResourceModule::Clientes,
];

/// Motor de predicados de autorización.
///
/// Funciones puras de (sesión, módulo, registro opcional). El rol se evalúa
/// siempre antes que la sucursal del registro: un rol sin permisos devuelve
/// `false` sin mirar el registro.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Verifica si la sesión puede crear registros en el módulo
    pub fn can_create(ctx: &SessionContext, module: ResourceModule) -> bool {
        match ctx.role() {
            UserRole::SuperAdmin => true,
            UserRole::AdminSucursal => BRANCH_ADMIN_CREATE.contains(&module),
            UserRole::Operador | UserRole::Conductor => false,
        }
    }

    /// Verifica si la sesión puede editar un registro del módulo.
    /// Sin registro (o registro sin sucursal) decide el permiso a nivel de módulo.
    pub fn can_edit(ctx: &SessionContext, _module: ResourceModule, record: Option<&RecordBranches>) -> bool {
        match ctx.role() {
            UserRole::SuperAdmin => true,
            UserRole::AdminSucursal => match record {
                None | Some(RecordBranches::Unbranched) => true,
                Some(branches) => ctx.branch_id().map_or(false, |id| branches.involves(id)),
            },
            UserRole::Operador | UserRole::Conductor => false,
        }
    }

    /// Verifica si la sesión puede eliminar (borrado lógico) en el módulo
    pub fn can_delete(ctx: &SessionContext, module: ResourceModule) -> bool {
        match ctx.role() {
            UserRole::SuperAdmin => true,
            UserRole::AdminSucursal => BRANCH_ADMIN_DELETE.contains(&module),
            UserRole::Operador | UserRole::Conductor => false,
        }
    }

    /// El borrado físico queda reservado a SUPER_ADMIN
    pub fn can_hard_delete(ctx: &SessionContext) -> bool {
        matches!(ctx.role(), UserRole::SuperAdmin)
    }

    /// Sólo SUPER_ADMIN puede otorgar el rol SUPER_ADMIN
    pub fn can_assign_role(ctx: &SessionContext, role: UserRole) -> bool {
        match role {
            UserRole::SuperAdmin => matches!(ctx.role(), UserRole::SuperAdmin),
            _ => true,
        }
    }

    /// Una cuenta SUPER_ADMIN solo la gestiona otro SUPER_ADMIN, aunque esté en la sucursal de quien edita
    pub fn can_manage_account(ctx: &SessionContext, target: UserRole) -> bool {
        Self::can_assign_role(ctx, target)
    }

    pub fn require_account_control(ctx: &SessionContext, target: UserRole) -> Result<(), AuthorizationError> {
        if Self::can_manage_account(ctx, target) {
            return Ok(());
        }

        tracing::warn!("🚫 {} ({}) intentó modificar una cuenta {}", ctx.user_id(), ctx.role(), target);
        Err(AuthorizationError::Forbidden {
            role: ctx.role().to_string(),
            action: "modificar una cuenta SUPER_ADMIN",
            module: ResourceModule::Usuarios.as_str(),
        })
    }

    pub fn require_create(ctx: &SessionContext, module: ResourceModule) -> Result<(), AuthorizationError> {
        Self::check(Self::can_create(ctx, module), ctx, "crear", module)
    }

    pub fn require_delete(ctx: &SessionContext, module: ResourceModule) -> Result<(), AuthorizationError> {
        Self::check(Self::can_delete(ctx, module), ctx, "eliminar", module)
    }

    pub fn require_hard_delete(ctx: &SessionContext, module: ResourceModule) -> Result<(), AuthorizationError> {
        Self::check(Self::can_hard_delete(ctx), ctx, "eliminar permanentemente", module)
    }

    /// Permiso de edición en dos pasos: primero el rol, luego la sucursal del registro
    pub fn require_edit(
        ctx: &SessionContext,
        module: ResourceModule,
        record: Option<&RecordBranches>,
    ) -> Result<(), AuthorizationError> {
        Self::check(Self::can_edit(ctx, module, None), ctx, "editar", module)?;

        if Self::can_edit(ctx, module, record) {
            Ok(())
        } else {
            tracing::warn!(
                "🚫 {} ({}) intentó editar un registro de otra sucursal en {}",
                ctx.user_id(),
                ctx.role(),
                module
            );
            Err(AuthorizationError::BranchMismatch)
        }
    }

    fn check(
        allowed: bool,
        ctx: &SessionContext,
        action: &'static str,
        module: ResourceModule,
    ) -> Result<(), AuthorizationError> {
        if allowed {
            return Ok(());
        }

        tracing::warn!("🚫 {} ({}) no puede {} en {}", ctx.user_id(), ctx.role(), action, module);
        Err(AuthorizationError::Forbidden {
            role: ctx.role().to_string(),
            action,
            module: module.as_str(),
        })
    }

    /// Obtiene el nivel de acceso de una sesión
    pub fn access_level(ctx: &SessionContext) -> AccessLevel {
        match ctx.role() {
            UserRole::SuperAdmin => AccessLevel::Full,
            UserRole::AdminSucursal | UserRole::Operador | UserRole::Conductor => AccessLevel::Branch,
        }
    }

    /// Resumen de permisos por módulo, para que el cliente adapte su interfaz
    pub fn permissions_for(ctx: &SessionContext) -> Vec<ModulePermissions> {
        ResourceModule::ALL
            .into_iter()
            .map(|module| ModulePermissions {
                module,
                create: Self::can_create(ctx, module),
                edit: Self::can_edit(ctx, module, None),
                delete: Self::can_delete(ctx, module),
            })
            .collect()
    }
}

/// Niveles de acceso del sistema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    /// Acceso a todas las sucursales
    Full,
    /// Acceso a la sucursal propia
    Branch,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModulePermissions {
    pub module: ResourceModule,
    pub create: bool,
    pub edit: bool,
    pub delete: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn session(role: UserRole, branch_id: Option<Uuid>) -> SessionContext {
        SessionContext::new(Uuid::new_v4(), "test@logistica.pe", role, branch_id)
    }

    #[test]
    fn test_super_admin_can_do_everything() {
        let ctx = session(UserRole::SuperAdmin, None);
        let foreign = RecordBranches::Single(Uuid::new_v4());
        for module in ResourceModule::ALL {
            assert!(AuthorizationService::can_create(&ctx, module));
            assert!(AuthorizationService::can_edit(&ctx, module, Some(&foreign)));
            assert!(AuthorizationService::can_edit(&ctx, module, None));
            assert!(AuthorizationService::can_delete(&ctx, module));
        }
        assert!(AuthorizationService::can_hard_delete(&ctx));
    }

    #[test]
    fn test_branch_admin_create_allow_list() {
        let ctx = session(UserRole::AdminSucursal, Some(Uuid::new_v4()));
        assert!(!AuthorizationService::can_create(&ctx, ResourceModule::Sucursales));
        assert!(AuthorizationService::can_create(&ctx, ResourceModule::Vehiculos));
        assert!(AuthorizationService::can_create(&ctx, ResourceModule::Rutas));
        assert!(!AuthorizationService::can_create(&ctx, ResourceModule::Usuarios));
    }

    #[test]
    fn test_branch_admin_delete_is_soft_only() {
        let ctx = session(UserRole::AdminSucursal, Some(Uuid::new_v4()));
        assert!(AuthorizationService::can_delete(&ctx, ResourceModule::Vehiculos));
        assert!(!AuthorizationService::can_delete(&ctx, ResourceModule::Sucursales));
        assert!(!AuthorizationService::can_hard_delete(&ctx));
    }

    #[test]
    fn test_branch_admin_edit_depends_on_record_branch() {
        let b1 = Uuid::new_v4();
        let b2 = Uuid::new_v4();
        let ctx = session(UserRole::AdminSucursal, Some(b1));

        let own = RecordBranches::Single(b1);
        let foreign = RecordBranches::Single(b2);
        assert!(AuthorizationService::can_edit(&ctx, ResourceModule::Vehiculos, Some(&own)));
        assert!(!AuthorizationService::can_edit(&ctx, ResourceModule::Vehiculos, Some(&foreign)));
    }

    #[test]
    fn test_branch_admin_edit_routes_by_origin_or_destination() {
        let b1 = Uuid::new_v4();
        let ctx = session(UserRole::AdminSucursal, Some(b1));

        let inbound = RecordBranches::OriginDestination { origin: Some(Uuid::new_v4()), destination: Some(b1) };
        let outbound = RecordBranches::OriginDestination { origin: Some(b1), destination: None };
        let unrelated = RecordBranches::OriginDestination {
            origin: Some(Uuid::new_v4()),
            destination: Some(Uuid::new_v4()),
        };
        assert!(AuthorizationService::can_edit(&ctx, ResourceModule::Rutas, Some(&inbound)));
        assert!(AuthorizationService::can_edit(&ctx, ResourceModule::Rutas, Some(&outbound)));
        assert!(!AuthorizationService::can_edit(&ctx, ResourceModule::Rutas, Some(&unrelated)));
    }

    #[test]
    fn test_unbranched_record_falls_back_to_module_permission() {
        let ctx = session(UserRole::AdminSucursal, Some(Uuid::new_v4()));
        assert!(AuthorizationService::can_edit(
            &ctx,
            ResourceModule::Clientes,
            Some(&RecordBranches::Unbranched)
        ));
    }

    #[test]
    fn test_branch_admin_without_branch_cannot_edit_branched_records() {
        let ctx = session(UserRole::AdminSucursal, None);
        let record = RecordBranches::Single(Uuid::new_v4());
        assert!(!AuthorizationService::can_edit(&ctx, ResourceModule::Vehiculos, Some(&record)));
    }

    #[test]
    fn test_other_roles_short_circuit_before_record() {
        let b1 = Uuid::new_v4();
        let own = RecordBranches::Single(b1);
        for role in [UserRole::Operador, UserRole::Conductor] {
            let ctx = session(role, Some(b1));
            for module in ResourceModule::ALL {
                assert!(!AuthorizationService::can_create(&ctx, module));
                assert!(!AuthorizationService::can_edit(&ctx, module, Some(&own)));
                assert!(!AuthorizationService::can_delete(&ctx, module));
            }
            assert_eq!(
                AuthorizationService::require_edit(&ctx, ResourceModule::Vehiculos, Some(&own)),
                Err(AuthorizationError::Forbidden {
                    role: role.to_string(),
                    action: "editar",
                    module: "vehiculos",
                })
            );
        }
    }

    #[test]
    fn test_require_edit_reports_branch_mismatch() {
        let ctx = session(UserRole::AdminSucursal, Some(Uuid::new_v4()));
        let foreign = RecordBranches::Single(Uuid::new_v4());
        assert_eq!(
            AuthorizationService::require_edit(&ctx, ResourceModule::Vehiculos, Some(&foreign)),
            Err(AuthorizationError::BranchMismatch)
        );
    }

    #[test]
    fn test_only_super_admin_grants_super_admin() {
        let admin = session(UserRole::AdminSucursal, Some(Uuid::new_v4()));
        assert!(!AuthorizationService::can_assign_role(&admin, UserRole::SuperAdmin));
        assert!(AuthorizationService::can_assign_role(&admin, UserRole::Conductor));
    }

    #[test]
    fn test_super_admin_accounts_are_out_of_reach_for_branch_admins() {
        let branch = Uuid::new_v4();
        let admin = session(UserRole::AdminSucursal, Some(branch));

        assert!(!AuthorizationService::can_manage_account(&admin, UserRole::SuperAdmin));
        assert!(AuthorizationService::can_manage_account(&admin, UserRole::Operador));
        assert!(matches!(
            AuthorizationService::require_account_control(&admin, UserRole::SuperAdmin),
            Err(AuthorizationError::Forbidden { .. })
        ));

        let root = session(UserRole::SuperAdmin, None);
        assert!(AuthorizationService::require_account_control(&root, UserRole::SuperAdmin).is_ok());
    }

    #[test]
    fn test_access_levels() {
        assert_eq!(
            AuthorizationService::access_level(&session(UserRole::SuperAdmin, None)),
            AccessLevel::Full
        );
        assert_eq!(
            AuthorizationService::access_level(&session(UserRole::Conductor, Some(Uuid::new_v4()))),
            AccessLevel::Branch
        );
    }
}
