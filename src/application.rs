use std::{net::TcpListener, time::Duration};

use actix_cors::Cors;
use actix_web::{dev::Server, web, web::Data, App, HttpServer};
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing_actix_web::TracingLogger;

use crate::{
    daemon::DaemonClient,
    repository::ServerRepository,
    routes::{health_check, servers},
    settings::{DatabaseSettings, Settings},
};

pub struct ApplicationBaseUrl(pub String);

pub struct Application {
    server: Server,
    port: u16,
}

impl Application {
    pub async fn build(settings: Settings) -> Result<Self, std::io::Error> {
        let db_pool = get_db_pool(&settings.database)
            .await
            .expect("Could not connect to database.");

        let daemon = DaemonClient::new(&settings.daemon);

        let address = format!(
            "{}:{}",
            settings.application.host, settings.application.port
        );

        let listener = TcpListener::bind(&address)?;
        let port = listener.local_addr().unwrap().port();

        let server = run(listener, db_pool, daemon, settings.application.base_url)?;

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub async fn get_db_pool(settings: &DatabaseSettings) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .connect_timeout(Duration::from_secs(5))
        .connect_with(settings.with_db())
        .await
}

fn run(
    listener: TcpListener,
    db_pool: PgPool,
    daemon: DaemonClient,
    base_url: String,
) -> Result<Server, std::io::Error> {
    let repository = Data::new(ServerRepository::new(db_pool.clone(), daemon));
    let db_pool = Data::new(db_pool);
    let base_url = Data::new(ApplicationBaseUrl(base_url));

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(
                Cors::default()
                    .allow_any_header()
                    .allow_any_method()
                    .allow_any_origin(),
            )
            .app_data(db_pool.clone())
            .app_data(base_url.clone())
            .app_data(repository.clone())
            .route("/health_check", web::get().to(health_check))
            .route("/servers", web::get().to(servers::list))
            .route("/servers", web::post().to(servers::create))
            .route("/servers/{id}", web::get().to(servers::get))
            .route("/servers/{id}", web::delete().to(servers::delete))
            .route("/servers/{id}/{force}", web::delete().to(servers::delete_force))
            .route("/servers/{id}/suspend", web::post().to(servers::suspend))
            .route("/servers/{id}/unsuspend", web::post().to(servers::unsuspend))
    })
    .listen(listener)?
    .run();

    Ok(server)
}
