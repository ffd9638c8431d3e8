use std::{sync::Arc, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    config,
    error::Error,
    error, info,
    management::TokenManager,
    pipeline::{Pipeline, PipelineOutcome},
    setlist,
    spotify::{client::SpotifyClient, session::Session},
    success, warning,
};

pub async fn playlist(url: String, name: Option<String>, use_proxies: bool, audit: bool) {
    let token_mgr = match TokenManager::load().await {
        Ok(t) => t,
        Err(e) => error!("Failed to load token. Please run setlistify auth\n Error: {}", e),
    };

    let session = Arc::new(Session::new(Arc::new(token_mgr)));
    let client = SpotifyClient::from_config(session);

    let owner_id = match config::spotify_user() {
        Some(user) => user,
        None => match client.current_user().await {
            Ok(user) => user.id,
            Err(e) => error!("Cannot determine Spotify user: {}", e),
        },
    };

    let source = match setlist::from_config(use_proxies).await {
        Ok(source) => source,
        Err(e) => error!("Cannot set up setlist source: {}", e),
    };

    let pipeline = Pipeline::new(source, &client, &client)
        .with_audit(audit || config::match_audit_enabled());

    let pb = spinner("Matching setlist songs and creating playlist...");
    let result = pipeline.run(&url, &owner_id, name.as_deref()).await;
    pb.finish_and_clear();

    let PipelineOutcome {
        event,
        tracks,
        playlist,
        audit,
    } = match result {
        Ok(outcome) => outcome,
        Err(Error::Append {
            playlist_id,
            appended,
            source,
        }) => {
            warning!(
                "Playlist {} was created but only holds the first {} tracks",
                playlist_id,
                appended
            );
            if let Error::AuthFailure(_) = *source {
                error!(
                    "Spotify rejected the login while adding tracks. Please run setlistify auth\n Error: {}",
                    source
                );
            }
            error!("Failed to add tracks to playlist: {}", source);
        }
        Err(e) => error!("Failed to create playlist: {}", e),
    };

    info!("{} - {} - {}", event.artist, event.date, event.location);

    if let Some(report) = audit {
        let rate = report.success_rate() * 100.0;
        let unsure = report.rows.iter().filter(|r| !r.same).count();
        info!(
            "Successful tracks: {} / {} ({} unsure). Success rate: {:.1}%",
            report.matched, report.requested, unsure, rate
        );
        println!("{}", Table::new(report.rows));
    }

    let missing = event.setlist.len().saturating_sub(tracks.len());
    if missing > 0 {
        warning!("{} songs could not be found on Spotify", missing);
    }

    success!(
        "Playlist '{}' created with {} of {} songs.",
        playlist.name,
        tracks.len(),
        event.setlist.len()
    );
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}
