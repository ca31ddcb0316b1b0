use std::{
    net::TcpListener,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
};

use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use once_cell::sync::Lazy;
use sqlx::{types::Uuid, Connection, Executor, PgConnection, PgPool};
use wyvern::{
    application::{get_db_pool, Application},
    settings::{get_settings, DatabaseSettings},
    telemetry::{get_subscriber, init_subscriber},
};

static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber)
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber)
    };
});

pub struct TestApplication {
    pub address: String,
    pub port: u16,
    pub db_pool: PgPool,
    pub daemon: TestDaemon,
}

impl TestApplication {
    pub async fn get_servers(&self, page: Option<i64>) -> reqwest::Response {
        let mut client = reqwest::Client::new().get(&format!("{}/servers", &self.address));

        if let Some(page) = page {
            client = client.query(&[("page", page)]);
        }

        client.send().await.expect("Failed to execute request.")
    }

    pub async fn post_create_server(&self, body: serde_json::Value) -> reqwest::Response {
        reqwest::Client::new()
            .post(&format!("{}/servers", &self.address))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_server(&self, server_id: String, fields: Option<String>) -> reqwest::Response {
        let mut client =
            reqwest::Client::new().get(&format!("{}/servers/{}", &self.address, server_id));

        if let Some(fields) = fields {
            client = client.query(&[("fields", fields)]);
        }

        client.send().await.expect("Failed to execute request.")
    }

    pub async fn post_suspend_server(&self, server_id: String) -> reqwest::Response {
        reqwest::Client::new()
            .post(&format!("{}/servers/{}/suspend", &self.address, server_id))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_unsuspend_server(&self, server_id: String) -> reqwest::Response {
        reqwest::Client::new()
            .post(&format!(
                "{}/servers/{}/unsuspend",
                &self.address, server_id
            ))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn delete_server(&self, server_id: String) -> reqwest::Response {
        reqwest::Client::new()
            .delete(&format!("{}/servers/{}", &self.address, server_id))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn delete_server_with_modifier(
        &self,
        server_id: String,
        modifier: String,
    ) -> reqwest::Response {
        reqwest::Client::new()
            .delete(&format!(
                "{}/servers/{}/{}",
                &self.address, server_id, modifier
            ))
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

pub async fn spawn_app() -> TestApplication {
    Lazy::force(&TRACING);

    let daemon = spawn_daemon_stub().await;

    let settings = {
        let mut settings = get_settings().expect("Failed to read settings");

        settings.database.database_name = Uuid::new_v4().to_string();
        settings.application.port = 0;
        settings.daemon.base_url = daemon.base_url();

        settings
    };

    configure_database(&settings.database).await;

    let application = Application::build(settings.clone())
        .await
        .expect("Failed to build application");

    let application_port = application.port();

    let _ = tokio::spawn(application.run_until_stopped());

    TestApplication {
        address: format!("http://localhost:{}", application_port),
        port: application_port,
        db_pool: get_db_pool(&settings.database)
            .await
            .expect("Failed to connect to database"),
        daemon,
    }
}

async fn configure_database(settings: &DatabaseSettings) -> PgPool {
    let mut connection = PgConnection::connect_with(&settings.without_db())
        .await
        .expect("Failed to connect to Postgres");
    connection
        .execute(&*format!(
            r#"CREATE DATABASE "{}";"#,
            settings.database_name
        ))
        .await
        .expect("Failed to create database.");

    let connection_pool = PgPool::connect_with(settings.with_db())
        .await
        .expect("Failed to connect to Postgres.");
    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate the database");

    connection_pool
}

///
/// In-process stand-in for the remote daemon.
///
/// Records every request it receives and can be switched into a failing
/// mode to exercise the daemon-unavailable paths.
///
#[derive(Clone)]
pub struct TestDaemon {
    port: u16,
    requests: Arc<Mutex<Vec<String>>>,
    failing: Arc<AtomicBool>,
}

impl TestDaemon {
    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn received_requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

async fn daemon_stub_handler(
    request: HttpRequest,
    daemon: web::Data<TestDaemon>,
) -> HttpResponse {
    daemon
        .requests
        .lock()
        .unwrap()
        .push(format!("{} {}", request.method(), request.path()));

    if daemon.failing.load(Ordering::SeqCst) {
        HttpResponse::InternalServerError().finish()
    } else {
        HttpResponse::NoContent().finish()
    }
}

async fn spawn_daemon_stub() -> TestDaemon {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind daemon stub address.");
    let port = listener.local_addr().unwrap().port();

    let daemon = TestDaemon {
        port,
        requests: Arc::new(Mutex::new(Vec::new())),
        failing: Arc::new(AtomicBool::new(false)),
    };

    let handler_state = daemon.clone();

    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(handler_state.clone()))
            .default_service(web::route().to(daemon_stub_handler))
    })
    .listen(listener)
    .expect("Failed to listen on the daemon stub address.")
    .run();

    let _ = tokio::spawn(server);

    daemon
}

#[derive(Debug, Clone)]
pub struct TestServer {
    pub id: Uuid,
    pub name: String,
}

impl TestServer {
    pub fn generate() -> Self {
        Self {
            id: Uuid::new_v4(),
            name: Uuid::new_v4().to_string(),
        }
    }

    pub async fn store(&self, pool: &PgPool, suspended: bool) {
        sqlx::query(
            "INSERT INTO servers (id, name, memory, disk, cpu, suspended) VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(self.id)
        .bind(&self.name)
        .bind(1024_i64)
        .bind(4096_i64)
        .bind(200_i64)
        .bind(suspended)
        .execute(pool)
        .await
        .expect("Failed to store test server.");
    }
}

pub async fn seed_server(pool: &PgPool) -> TestServer {
    let server = TestServer::generate();
    server.store(pool, false).await;

    server
}

pub async fn seed_suspended_server(pool: &PgPool) -> TestServer {
    let server = TestServer::generate();
    server.store(pool, true).await;

    server
}
