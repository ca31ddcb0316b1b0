use sqlx::{types::Uuid, Row};

use crate::helpers::{seed_server, seed_suspended_server, spawn_app};

#[tokio::test]
async fn unsuspend_server_returns_204_for_a_valid_request() {
    // Arrange
    let app = spawn_app().await;
    let server = seed_suspended_server(&app.db_pool).await;

    // Act
    let response = app.post_unsuspend_server(server.id.to_string()).await;

    // Assert
    assert_eq!(204, response.status().as_u16());
}

#[tokio::test]
async fn unsuspend_server_marks_the_server_as_running() {
    // Arrange
    let app = spawn_app().await;
    let server = seed_suspended_server(&app.db_pool).await;

    // Act
    app.post_unsuspend_server(server.id.to_string()).await;

    // Assert
    let saved = sqlx::query("SELECT suspended FROM servers WHERE id = $1")
        .bind(server.id)
        .fetch_one(&app.db_pool)
        .await
        .expect("Failed to fetch saved server.");

    assert_eq!(false, saved.get::<bool, _>("suspended"));
}

#[tokio::test]
async fn unsuspend_server_notifies_the_daemon() {
    // Arrange
    let app = spawn_app().await;
    let server = seed_suspended_server(&app.db_pool).await;

    // Act
    app.post_unsuspend_server(server.id.to_string()).await;

    // Assert
    assert_eq!(
        vec![format!("POST /servers/{}/unsuspend", server.id)],
        app.daemon.received_requests()
    );
}

#[tokio::test]
async fn unsuspend_server_returns_404_when_no_server_with_that_id_exists() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let response = app.post_unsuspend_server(Uuid::new_v4().to_string()).await;

    // Assert
    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
async fn unsuspend_server_returns_400_when_the_server_is_not_suspended() {
    // Arrange
    let app = spawn_app().await;
    let server = seed_server(&app.db_pool).await;

    // Act
    let response = app.post_unsuspend_server(server.id.to_string()).await;

    // Assert
    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn unsuspend_server_returns_503_and_keeps_the_server_suspended_when_the_daemon_fails() {
    // Arrange
    let app = spawn_app().await;
    let server = seed_suspended_server(&app.db_pool).await;
    app.daemon.set_failing(true);

    // Act
    let response = app.post_unsuspend_server(server.id.to_string()).await;

    // Assert
    assert_eq!(503, response.status().as_u16());

    let saved = sqlx::query("SELECT suspended FROM servers WHERE id = $1")
        .bind(server.id)
        .fetch_one(&app.db_pool)
        .await
        .expect("Failed to fetch saved server.");

    assert_eq!(true, saved.get::<bool, _>("suspended"));
}
