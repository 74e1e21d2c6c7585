use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use car_rental_web::config::environment::EnvironmentConfig;
use car_rental_web::routes::create_app;
use car_rental_web::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();
    let config = EnvironmentConfig::from_env()?;

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    info!("🚗 Car Rental - Vehicle Listings");
    info!("================================");
    info!("🌍 Entorno: {}", config.environment);
    info!("🔗 Vehicle service: {}", config.cars_api_base_url);

    let addr: SocketAddr = config.server_url().parse()?;
    let app = create_app(AppState::from_config(config));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /               - Listado de vehículos");
    info!("   GET  /add-car        - Formulario de alta");
    info!("   POST /add-car        - Adjuntar/quitar imágenes o guardar");
    info!("   GET  /health         - Health check");
    info!("   GET  /api/cars       - Listado (JSON)");
    info!("   PATCH  /api/cars/:id - Actualizar vehículo");
    info!("   DELETE /api/cars/:id - Eliminar vehículo");

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
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
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
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
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
