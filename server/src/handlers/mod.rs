use crate::connection::ws_index;
use crate::handlers::metrics::configure_metrics_handlers;
use actix_web::web;

mod metrics;

pub fn root(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/ws/").route(web::get().to(ws_index)));

    configure_metrics_handlers(cfg);
}
