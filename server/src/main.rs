use actix_cors::Cors;
use actix_web::{App, HttpServer};

use server::handlers;
use server::server::spawn_server;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let port = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse::<u16>().ok())
        .unwrap_or(8080);

    let srv_tx = spawn_server();

    log::info!("Server started on port: {}", port);
    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .data(srv_tx.clone())
            .configure(handlers::root)
    })
    .bind(("127.0.0.1", port))?
    .run()
    .await
}
