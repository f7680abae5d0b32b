use std::fs;
use std::sync::Arc;
use tokio::signal;
use user_soap::api;
use user_soap::logger::*;
use user_soap::server::*;
use user_soap::settings::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let logger = Logger::new_bootstrap();

    let project_settings = parse_settings(cli.settings.as_deref())?;
    info!(?project_settings);
    logger.reload_from_config(&LogConfig::from(&project_settings.log))?;

    let address: std::net::SocketAddr = project_settings.http.address.parse()?;
    let tls = match (&project_settings.http.cert_path, &project_settings.http.key_path) {
        (Some(cert_path), Some(key_path)) => {
            for path in [cert_path, key_path] {
                if !fs::metadata(path)?.is_file() {
                    return Err(anyhow::anyhow!("TLS file is not a regular file: {:?}", path));
                }
            }
            Some((cert_path.clone(), key_path.clone()))
        }
        _ => None,
    };

    let server = Arc::new(Server::try_new(&project_settings).await?);

    let service = api::service(server.clone(), project_settings.http.allowed_origin.clone());
    let shutdown = async {
        signal::ctrl_c().await.expect("Could not register SIGINT");
    };

    info!(%address, tls = tls.is_some(), "listening");
    match tls {
        Some((cert_path, key_path)) => {
            // The TLS server only has a panicking bind, so check the address first.
            ensure_bindable(address).await?;
            let (_, serving) = warp::serve(service)
                .tls()
                .cert_path(cert_path)
                .key_path(key_path)
                .bind_with_graceful_shutdown(address, shutdown);
            serving.await;
        }
        None => {
            let (_, serving) = warp::serve(service)
                .try_bind_with_graceful_shutdown(address, shutdown)
                .map_err(|e| anyhow::anyhow!("cannot bind {}: {}", address, e))?;
            serving.await;
        }
    }

    let shutdown_timeout = std::time::Duration::from_secs(30);
    match tokio::time::timeout(shutdown_timeout, server.shutdown()).await {
        Ok(_) => info!("server shutdown successfully"),
        Err(_) => error!("server shutdown timed out"),
    }

    Ok(())
}
