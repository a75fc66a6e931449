use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use logistica_backend::config::{database::mask_database_url, DatabaseConfig, EnvironmentConfig};
use logistica_backend::routes::create_router;
use logistica_backend::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env().context("Configuración inválida")?;

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_target(false)
        .init();

    info!("🚚 Logística - API de envíos multi-sucursal");
    info!("============================================");
    info!("🌍 Entorno: {}", config.environment);

    // Inicializar base de datos
    let db_config = DatabaseConfig::from(&config);
    info!("🗄️ Conectando a {}", mask_database_url(&db_config.url));

    let pool = match db_config.create_pool().await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    DatabaseConfig::run_migrations(&pool)
        .await
        .context("Error ejecutando migraciones")?;
    info!("✅ Migraciones aplicadas");

    let addr: SocketAddr = config.server_url().parse().context("HOST/PORT inválidos")?;
    let app = create_router(AppState::new(pool, config));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🔐 Autenticación:");
    info!("   POST /auth/login - Login con email y contraseña");
    info!("   GET  /auth/me - Sesión actual y permisos");
    info!("📦 Módulos (clientes, sucursales, vehiculos, rutas, usuarios, envios):");
    info!("   GET    /api/:module?estado=activos|eliminados|todos - Listar");
    info!("   GET    /api/:module/:id - Obtener");
    info!("   POST   /api/:module - Crear");
    info!("   PUT    /api/:module/:id - Editar");
    info!("   DELETE /api/:module/:id - Eliminar (lógico)");
    info!("   POST   /api/:module/:id/restaurar|desactivar|activar - Ciclo de vida");
    info!("   DELETE /api/:module/:id/permanente - Eliminar permanentemente");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo escuchar Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el manejador de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
