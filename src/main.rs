use ::log::info;
use orders_rs::{
    app::{AppState, router},
    config::{ENV, log},
    notify::{TwilioNotifier, twilio::TWILIO_BASE_URL},
    store::{FirestoreStore, firestore::FIRESTORE_BASE_URL},
    util::{
        gcloud::Credentials,
        governor_conf, governor_err, shutdown,
    },
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::{net::TcpListener, time};
use tower_governor::GovernorLayer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    log::setup()?;

    let (base_url, credentials) = match ENV.firestore_emulator_host.as_deref() {
        Some(host) if !host.is_empty() => {
            info!("[firestore] using emulator at {}", host);
            (format!("http://{}", host), Credentials::Emulator)
        }
        _ => (
            FIRESTORE_BASE_URL.to_string(),
            Credentials::from_base64_key(ENV.gcloud_srv.as_deref().unwrap_or_default())?,
        ),
    };
    let store = FirestoreStore::new(
        &base_url,
        &ENV.firebase_project_id,
        &*ENV.firestore_collection,
        credentials,
    );
    let notifier = TwilioNotifier::new(
        TWILIO_BASE_URL,
        ENV.twilio_account_sid.clone(),
        ENV.twilio_auth_token.clone(),
        &ENV.twilio_phone_number,
    );
    let state = AppState::new(Arc::new(store), Arc::new(notifier));

    let governor_conf = governor_conf()?;
    let governor_limiter = governor_conf.limiter().clone();
    tokio::spawn(async move {
        let mut interval = time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            info!(
                "[Governor] limiting storage size : {}",
                governor_limiter.len()
            );
            governor_limiter.retain_recent();
        }
    });
    let governor_layer = GovernorLayer::new(governor_conf).error_handler(governor_err);

    let app = router(state, &ENV.allowed_origins).layer(governor_layer);

    info!("up and running on : {}", &ENV.port);
    axum::serve(
        TcpListener::bind(&format!("0.0.0.0:{}", &ENV.port)).await?,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown())
    .await?;

    anyhow::Ok(())
}
