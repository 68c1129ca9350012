use actix_web::{error, web, HttpResponse, Responder, Result};

use crate::server::{ServerCommand, ServerTx};

pub fn configure_metrics_handlers(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/metrics").route(web::get().to(metrics)));
}

async fn metrics(srv_tx: web::Data<ServerTx>) -> Result<impl Responder> {
    let (tx, rx) = tokio::sync::oneshot::channel::<String>();

    srv_tx
        .get_ref()
        .clone()
        .send(ServerCommand::RenderMetrics { tx })
        .await
        .map_err(|_| error::ErrorInternalServerError("Internal Server Error"))?;

    let body = rx
        .await
        .map_err(|_| error::ErrorInternalServerError("Receiver await error"))?;

    Ok(HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(body))
}
