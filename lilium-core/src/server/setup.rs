use crate::conf::LiliumConfig;
use crate::proxy::{GatewaySettings, LiliumGateway};
use anyhow::{Context, Error, Result};
use pingora::prelude::*;
use pingora::server::Server;
use pingora::server::configuration::ServerConf;

/// Run the Pingora server with the given configuration. Blocks forever.
pub fn run(config: LiliumConfig) -> Result<()> {
    let server = build_pingora_server(&config)?;

    tracing::info!(
        listen = %config.server.listen,
        tls = config.server.tls.is_some(),
        upgrade_insecure = config.upstream.upgrade_insecure,
        "lilium started"
    );

    server.run_forever();
}

/// Build the Pingora server.
pub fn build_pingora_server(config: &LiliumConfig) -> Result<Server, Error> {
    let mut server = if let Some(threads) = config.server.threads {
        tracing::debug!(
            threads,
            "Creating Pingora server with overridden worker threads"
        );
        let mut conf =
            ServerConf::new().context("could not construct pingora server configuration")?;
        conf.threads = threads;
        Server::new_with_opt_and_conf(None, conf)
    } else {
        // "None" is required here to truly tell Pingora to use its default settings.
        Server::new(None)?
    };

    server.bootstrap();

    let gateway = LiliumGateway::new(GatewaySettings::from_config(config));

    let mut svc = http_proxy_service(&server.configuration, gateway);
    if let Some(tls) = &config.server.tls {
        svc.add_tls(&config.server.listen, &tls.cert, &tls.key)?;
    } else {
        svc.add_tcp(&config.server.listen);
    }

    server.add_service(svc);

    Ok(server)
}
