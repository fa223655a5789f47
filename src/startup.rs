//! src/startup.rs
use crate::configuration::Settings;
use crate::registry::SubscriberRegistry;
use crate::routes::{health_check, json_error_handler, subscribe, subscribers_count};
use crate::store::JsonFileStore;
use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run(self) -> std::io::Result<()> {
        self.server.await
    }
}

pub fn build(config: Settings) -> Result<Application, std::io::Error> {
    let address = format!("{}:{}", config.application.host, config.application.port);
    let tcp_listener = TcpListener::bind(address)?;
    let port = tcp_listener.local_addr()?.port();

    tracing::info!(
        "Serving the subscriber registry at {} on port {}",
        config.registry.path.display(),
        port
    );
    let registry = SubscriberRegistry::new(JsonFileStore::new(config.registry.path));

    let server = run(tcp_listener, registry)?;

    Ok(Application { port, server })
}

pub fn run(listener: TcpListener, registry: SubscriberRegistry) -> Result<Server, std::io::Error> {
    let registry = web::Data::new(registry);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .route("/api/health", web::get().to(health_check))
            .route("/api/subscribe", web::post().to(subscribe))
            .route("/api/subscribers/count", web::get().to(subscribers_count))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(registry.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
