use actix_web::{web, HttpServer};
use clap::Parser;
use error_stack::{Result, ResultExt};
use std::net::IpAddr;
use std::num::NonZeroUsize;
use thiserror::Error;
use tracing_actix_web::TracingLogger;

use helpdesk::config::Server as Config;
use helpdesk::http::{self, middleware::QuieterRootSpanBuilder};
use helpdesk::App;

#[derive(Debug, Error)]
#[error("Could not start the HTTP server")]
pub struct StartServerError;

/// Expose the helpdesk REST API over HTTP
#[derive(Debug, Parser)]
pub struct ServerCommand {
    #[clap(long)]
    pub address: Option<IpAddr>,
    #[clap(long)]
    pub port: Option<u16>,
    #[clap(long)]
    pub workers: Option<NonZeroUsize>,
}

pub fn run(args: ServerCommand) -> Result<(), StartServerError> {
    let mut config = Config::load().change_context(StartServerError)?;
    args.override_config(&mut config);

    helpdesk::logging::init(&config.logging).change_context(StartServerError)?;
    actix_web::rt::System::new().block_on(serve(config))
}

async fn serve(config: Config) -> Result<(), StartServerError> {
    let workers = config
        .workers
        .or_else(|| std::thread::available_parallelism().ok())
        .map_or(1, NonZeroUsize::get);

    let address = (config.ip, config.port);
    let app = App::new(config).await.change_context(StartServerError)?;
    let data = web::Data::new(app);

    tracing::info!(?address, workers, "starting HTTP server");
    HttpServer::new(move || {
        actix_web::App::new()
            .wrap(TracingLogger::<QuieterRootSpanBuilder>::new())
            .configure(http::configure(data.clone()))
    })
    .workers(workers)
    .bind(address)
    .change_context(StartServerError)
    .attach_printable_lazy(|| format!("could not bind to {}:{}", address.0, address.1))?
    .run()
    .await
    .change_context(StartServerError)
}

impl ServerCommand {
    fn override_config(&self, config: &mut Config) {
        // override server configurations if set by the cli
        if let Some(address) = self.address {
            config.ip = address;
        }

        if let Some(port) = self.port {
            config.port = port;
        }

        if let Some(workers) = self.workers {
            config.workers = Some(workers);
        }
    }
}
