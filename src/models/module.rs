//! Módulos de recursos
//!
//! Cada módulo describe su tabla, cómo se relaciona con las sucursales y qué
//! columnas se pueden escribir desde la API. Los nombres de tabla y columna
//! son estáticos: nunca llegan del cliente al SQL.

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::utils::errors::AppError;

/// Recursos gestionados por la API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceModule {
    Clientes,
    Sucursales,
    Vehiculos,
    Rutas,
    Usuarios,
    Envios,
}

/// Forma en que un registro referencia a sus sucursales
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchShape {
    /// Catálogo compartido entre sucursales
    Unscoped,
    /// El propio `id` es la sucursal
    SelfId,
    /// Una columna `sucursal_id`
    Column(&'static str),
    /// Par origen/destino (rutas, envíos)
    OriginDestination {
        origin: &'static str,
        destination: &'static str,
    },
}

impl ResourceModule {
    pub const ALL: [ResourceModule; 6] = [
        ResourceModule::Clientes,
        ResourceModule::Sucursales,
        ResourceModule::Vehiculos,
        ResourceModule::Rutas,
        ResourceModule::Usuarios,
        ResourceModule::Envios,
    ];

    /// Nombre del módulo tal como aparece en las rutas HTTP
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceModule::Clientes => "clientes",
            ResourceModule::Sucursales => "sucursales",
            ResourceModule::Vehiculos => "vehiculos",
            ResourceModule::Rutas => "rutas",
            ResourceModule::Usuarios => "usuarios",
            ResourceModule::Envios => "envios",
        }
    }

    /// Las tablas comparten nombre con el módulo
    pub fn table(&self) -> &'static str {
        self.as_str()
    }

    pub fn singular(&self) -> &'static str {
        match self {
            ResourceModule::Clientes => "Cliente",
            ResourceModule::Sucursales => "Sucursal",
            ResourceModule::Vehiculos => "Vehículo",
            ResourceModule::Rutas => "Ruta",
            ResourceModule::Usuarios => "Usuario",
            ResourceModule::Envios => "Envío",
        }
    }

    pub fn branch_shape(&self) -> BranchShape {
        match self {
            ResourceModule::Clientes => BranchShape::Unscoped,
            ResourceModule::Sucursales => BranchShape::SelfId,
            ResourceModule::Vehiculos | ResourceModule::Usuarios => BranchShape::Column("sucursal_id"),
            ResourceModule::Rutas | ResourceModule::Envios => BranchShape::OriginDestination {
                origin: "sucursal_origen_id",
                destination: "sucursal_destino_id",
            },
        }
    }

    /// Columnas que create/update pueden tocar. `estado` y `deleted_at`
    /// quedan fuera: sólo cambian por operaciones de ciclo de vida.
    pub fn writable_columns(&self) -> &'static [&'static str] {
        match self {
            ResourceModule::Clientes => &[
                "nombre",
                "tipo_documento",
                "numero_documento",
                "email",
                "telefono",
                "direccion",
            ],
            ResourceModule::Sucursales => &["nombre", "codigo", "direccion", "ciudad", "telefono"],
            ResourceModule::Vehiculos => &["placa", "marca", "modelo", "capacidad_kg", "sucursal_id"],
            ResourceModule::Rutas => &[
                "nombre",
                "sucursal_origen_id",
                "sucursal_destino_id",
                "distancia_km",
            ],
            ResourceModule::Usuarios => &["nombre", "email", "rol", "sucursal_id", "password_hash"],
            ResourceModule::Envios => &[
                "codigo_seguimiento",
                "cliente_id",
                "ruta_id",
                "sucursal_origen_id",
                "sucursal_destino_id",
                "descripcion",
                "peso_kg",
                "estado_envio",
            ],
        }
    }

    /// Columnas nunca devueltas al cliente
    pub fn hidden_columns(&self) -> &'static [&'static str] {
        match self {
            ResourceModule::Usuarios => &["password_hash"],
            _ => &[],
        }
    }
}

impl fmt::Display for ResourceModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceModule {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceModule::ALL
            .into_iter()
            .find(|module| module.as_str() == s)
            .ok_or_else(|| AppError::InvalidArgument(format!("módulo desconocido: '{}'", s)))
    }
}

/// Sucursales a las que pertenece un registro concreto
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordBranches {
    /// Sin referencia a sucursal
    Unbranched,
    Single(Uuid),
    OriginDestination {
        origin: Option<Uuid>,
        destination: Option<Uuid>,
    },
}

impl RecordBranches {
    /// Extrae las referencias de sucursal de un registro o payload JSON
    pub fn from_json(module: ResourceModule, record: &Value) -> Self {
        let uuid_at = |column: &str| {
            record
                .get(column)
                .and_then(Value::as_str)
                .and_then(|raw| Uuid::parse_str(raw).ok())
        };

        match module.branch_shape() {
            BranchShape::Unscoped => RecordBranches::Unbranched,
            BranchShape::SelfId => uuid_at("id").map_or(RecordBranches::Unbranched, RecordBranches::Single),
            BranchShape::Column(column) => {
                uuid_at(column).map_or(RecordBranches::Unbranched, RecordBranches::Single)
            }
            BranchShape::OriginDestination { origin, destination } => {
                match (uuid_at(origin), uuid_at(destination)) {
                    (None, None) => RecordBranches::Unbranched,
                    (origin, destination) => RecordBranches::OriginDestination { origin, destination },
                }
            }
        }
    }

    /// ¿Referencia el registro a la sucursal dada?
    pub fn involves(&self, branch_id: Uuid) -> bool {
        match self {
            RecordBranches::Unbranched => false,
            RecordBranches::Single(id) => *id == branch_id,
            RecordBranches::OriginDestination { origin, destination } => {
                *origin == Some(branch_id) || *destination == Some(branch_id)
            }
        }
    }

    pub fn is_unbranched(&self) -> bool {
        matches!(self, RecordBranches::Unbranched)
    }
}
